use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use contracts::dashboards::d400_overview::OverviewResponse;
use contracts::shared::filters::SalesFilter;

use crate::api::error::{check_month, check_year, ApiError};
use crate::api::state::AppState;
use crate::dashboards::d400_overview::service;
use crate::system::access::{AccessScope, CurrentRole};

/// GET /api/d400/overview?year=2025&month=3&team=TODAS
pub async fn get_overview(
    State(state): State<Arc<AppState>>,
    CurrentRole(role): CurrentRole,
    Query(filter): Query<SalesFilter>,
) -> Result<Json<OverviewResponse>, ApiError> {
    check_year(filter.year)?;
    check_month(filter.month)?;
    tracing::info!(
        "D400 Dashboard: Getting overview for {} team {} as {:?}",
        filter.period(),
        filter.team,
        role
    );

    let scope = AccessScope::for_role(role);
    let response = service::get_overview(&state.store, &scope, &filter).await?;
    tracing::info!(
        "D400 Dashboard: Returning {} channels, {} top products",
        response.channel_share.len(),
        response.top_products.len()
    );
    Ok(Json(response))
}
