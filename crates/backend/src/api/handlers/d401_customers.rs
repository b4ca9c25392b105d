use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Datelike;
use contracts::dashboards::d401_customers::{
    CustomerSalesRequest, CustomerSalesResponse, CustomersRequest, CustomersResponse,
};

use crate::api::error::{check_year, ApiError};
use crate::api::state::AppState;
use crate::dashboards::d401_customers::{history, service};
use crate::shared::dates::current_year;
use crate::system::access::{AccessScope, CurrentRole};

/// GET /api/d401/customers?year=2025&category=LINHA%20VAREJO&status=at_risk
pub async fn get_customers(
    State(state): State<Arc<AppState>>,
    CurrentRole(role): CurrentRole,
    Query(request): Query<CustomersRequest>,
) -> Result<Json<CustomersResponse>, ApiError> {
    if let Some(year) = request.year.or(request.reference_date.map(|d| d.year())) {
        check_year(year)?;
    }
    tracing::info!(
        "D401 Dashboard: Getting customers (year {:?}, category {:?}) as {:?}",
        request.year,
        request.category,
        role
    );

    let scope = AccessScope::for_role(role);
    let response = service::get_customers(&state.store, &scope, request).await?;
    tracing::info!(
        "D401 Dashboard: Returning {} customers ({} at risk, {} churned)",
        response.customers.len(),
        response.churn.at_risk.count,
        response.churn.churned.count
    );
    Ok(Json(response))
}

/// GET /api/d401/customers/501/sales?year=2025
pub async fn get_customer_sales(
    State(state): State<Arc<AppState>>,
    CurrentRole(role): CurrentRole,
    Path(code): Path<i64>,
    Query(request): Query<CustomerSalesRequest>,
) -> Result<Json<CustomerSalesResponse>, ApiError> {
    let year = request.year.unwrap_or_else(current_year);
    check_year(year)?;
    tracing::info!(
        "D401 Dashboard: Getting sales of customer {} for {} as {:?}",
        code,
        year,
        role
    );

    let scope = AccessScope::for_role(role);
    let response = history::get_customer_sales(&state.store, &scope, code, year)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("customer not found: {}", code)))?;
    tracing::info!(
        "D401 Dashboard: Returning {} lines of customer {}",
        response.lines.len(),
        code
    );
    Ok(Json(response))
}
