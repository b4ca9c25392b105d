use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use contracts::dashboards::d402_products::ProductsResponse;
use contracts::shared::filters::SalesFilter;

use crate::api::error::{check_month, check_year, ApiError};
use crate::api::state::AppState;
use crate::dashboards::d402_products::service;
use crate::system::access::{AccessScope, CurrentRole};

/// GET /api/d402/products?year=2025&month=3&team=TODAS
pub async fn get_products(
    State(state): State<Arc<AppState>>,
    CurrentRole(role): CurrentRole,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<ProductsResponse>, ApiError> {
    check_year(filter.year)?;
    check_month(filter.month)?;
    tracing::info!(
        "D402 Dashboard: Getting products for {} team {}",
        filter.period(),
        filter.team
    );

    let scope = AccessScope::for_role(role);
    let response = service::get_products(&state.store, &scope, &filter).await?;
    Ok(Json(response))
}
