use serde::{Deserialize, Serialize};

/// Totals of one dimension key (month, channel, state, product, ...).
///
/// `gross_revenue` is the sum of sale lines, `returned` the absolute sum of
/// return lines and `net_revenue = gross_revenue - returned`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupTotals {
    pub key: String,
    pub gross_revenue: f64,
    pub returned: f64,
    pub net_revenue: f64,
    pub margin: f64,
    /// `margin / gross_revenue * 100`, 0 when there is no revenue
    pub margin_percent: f64,
    pub cost: f64,
    pub quantity: f64,
    /// Distinct invoices among the sale lines
    pub invoice_count: usize,
    /// `gross_revenue / invoice_count`, 0 when there are no invoices
    pub average_ticket: f64,
}

/// Ranked entry for "top N" lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub name: String,
    pub gross_revenue: f64,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub invoice_count: Option<usize>,
}

/// Percentage change of one key between two snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedVariance {
    pub key: String,
    pub current: f64,
    pub previous: f64,
    /// Percent; +100 when the key is new, 0 when both sides are 0
    pub variance: f64,
}
