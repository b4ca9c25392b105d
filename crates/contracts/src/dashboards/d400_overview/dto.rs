use serde::{Deserialize, Serialize};

use crate::shared::aggregates::{GroupTotals, TopItem};

/// Headline figures of a period.
///
/// Gross and net are kept apart: `net_revenue = gross_billed - returned`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Sum of sale lines
    pub gross_billed: f64,
    /// Absolute sum of return lines
    pub returned: f64,
    pub net_revenue: f64,
    pub cost_of_goods: f64,
    pub margin: f64,
    /// `margin / net_revenue * 100`
    pub margin_percent: f64,
    /// `net_revenue / invoice_count`
    pub average_ticket: f64,
    pub invoice_count: usize,
    /// Number of return lines
    pub return_lines: usize,
}

/// One point of the 12-month revenue series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub month_name: String,
    pub gross: f64,
    pub net: f64,
    pub year: i32,
}

/// Share of gross revenue per channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelShare {
    pub channel: String,
    pub gross_revenue: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMargin {
    pub channel: String,
    pub margin: f64,
    pub margin_percent: f64,
    pub gross_revenue: f64,
}

/// Percentage change of the headline figures against a comparison period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodVariance {
    pub net_revenue: f64,
    pub margin: f64,
}

/// Response for the overview dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    pub team: String,
    pub kpis: Kpis,
    pub kpis_same_month_last_year: Kpis,
    pub kpis_previous_month: Kpis,
    /// Against the same month of the previous year
    pub year_over_year: PeriodVariance,
    /// Against the previous month (December of the previous year for January)
    pub month_over_month: PeriodVariance,
    pub monthly_current: Vec<MonthlyRevenue>,
    pub monthly_previous: Vec<MonthlyRevenue>,
    pub channel_share: Vec<ChannelShare>,
    pub channel_margin: Vec<ChannelMargin>,
    pub top_products: Vec<TopItem>,
    pub top_salespeople: Vec<TopItem>,
    pub top_customers: Vec<TopItem>,
    pub revenue_by_region: Vec<GroupTotals>,
}
