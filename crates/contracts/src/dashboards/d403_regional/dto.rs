use serde::{Deserialize, Serialize};

use crate::shared::aggregates::{GroupTotals, TopItem};
use crate::shared::filters::ALL_TEAMS;

/// Geographic level of the regional views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// Brazilian state (UF)
    #[default]
    State,
    /// Macro-region (Norte, Sul, ...)
    Region,
}

/// Totals of one state together with its macro-region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateTotals {
    pub state: String,
    pub region: String,
    #[serde(flatten)]
    pub totals: GroupTotals,
}

/// Response for the regional dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    pub team: String,
    pub by_state: Vec<StateTotals>,
    pub by_region: Vec<GroupTotals>,
    /// Gross revenue of lines whose state code is invalid, left out of the map
    pub excluded_revenue: f64,
    pub excluded_lines: usize,
}

fn default_team() -> String {
    ALL_TEAMS.to_string()
}

/// Drill-down request for one state or macro-region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionalDetailRequest {
    pub year: i32,
    pub month: u32,
    #[serde(default = "default_team")]
    pub team: String,
    #[serde(default)]
    pub granularity: Granularity,
    /// State code or region name
    pub location: String,
}

/// Drill-down of one state or macro-region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationDetail {
    pub location: String,
    pub granularity: Granularity,
    pub totals: Option<GroupTotals>,
    pub top_products: Vec<TopItem>,
    pub top_customers: Vec<TopItem>,
    pub channels: Vec<GroupTotals>,
    /// Gross revenue change against the previous month
    pub month_over_month: f64,
    /// Gross revenue change against the same month of the previous year
    pub year_over_year: f64,
}
