use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use contracts::dashboards::d403_regional::{LocationDetail, RegionalDetailRequest, RegionalResponse};
use contracts::shared::filters::SalesFilter;

use crate::api::error::{check_month, check_year, ApiError};
use crate::api::state::AppState;
use crate::dashboards::d403_regional::service;
use crate::system::access::{AccessScope, CurrentRole};

/// GET /api/d403/regional?year=2025&month=3&team=TODAS
pub async fn get_regional(
    State(state): State<Arc<AppState>>,
    CurrentRole(role): CurrentRole,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<RegionalResponse>, ApiError> {
    check_year(filter.year)?;
    check_month(filter.month)?;
    tracing::info!(
        "D403 Dashboard: Getting regional totals for {} team {}",
        filter.period(),
        filter.team
    );

    let scope = AccessScope::for_role(role);
    let response = service::get_regional(&state.store, &scope, &filter).await?;
    tracing::info!(
        "D403 Dashboard: Returning {} states in {} regions",
        response.by_state.len(),
        response.by_region.len()
    );
    Ok(Json(response))
}

/// GET /api/d403/regional/detail?year=2025&month=3&granularity=state&location=SP
pub async fn get_location_detail(
    State(state): State<Arc<AppState>>,
    CurrentRole(role): CurrentRole,
    Query(request): Query<RegionalDetailRequest>,
) -> Result<Json<LocationDetail>, ApiError> {
    check_year(request.year)?;
    check_month(request.month)?;
    if request.location.trim().is_empty() {
        return Err(ApiError::BadRequest("location is required".to_string()));
    }
    tracing::info!(
        "D403 Dashboard: Getting detail of {:?} {} for {}-{:02}",
        request.granularity,
        request.location,
        request.year,
        request.month
    );

    let scope = AccessScope::for_role(role);
    let response = service::get_location_detail(&state.store, &scope, &request).await?;
    Ok(Json(response))
}
