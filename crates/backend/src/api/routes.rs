use std::sync::Arc;

use axum::{routing::get, Router};

use super::handlers;
use super::state::AppState;

/// Dashboard API; CORS and request logging are layered on by the caller
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/filters", get(handlers::filters::get_filter_options))
        // D400 Overview
        .route("/api/d400/overview", get(handlers::d400_overview::get_overview))
        // D401 Customers
        .route(
            "/api/d401/customers",
            get(handlers::d401_customers::get_customers),
        )
        .route(
            "/api/d401/customers/:code/sales",
            get(handlers::d401_customers::get_customer_sales),
        )
        // D402 Products
        .route("/api/d402/products", get(handlers::d402_products::get_products))
        // D403 Regional
        .route("/api/d403/regional", get(handlers::d403_regional::get_regional))
        .route(
            "/api/d403/regional/detail",
            get(handlers::d403_regional::get_location_detail),
        )
        .with_state(state)
}
