use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub name: String,
    pub gross_revenue: f64,
    pub margin: f64,
    pub margin_percent: f64,
    pub quantity: f64,
}

/// Best-selling products of one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelProducts {
    pub channel: String,
    pub products: Vec<ProductSummary>,
}

/// Revenue change of a product against the comparison period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductGrowth {
    pub name: String,
    pub current_revenue: f64,
    pub previous_revenue: f64,
    /// Percent
    pub variance: f64,
    pub absolute_change: f64,
}

/// Response for the products dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductsResponse {
    /// Period in format "YYYY-MM"
    pub period: String,
    pub team: String,
    pub top_by_channel: Vec<ChannelProducts>,
    pub margin_by_product: Vec<ProductSummary>,
    /// Compared with the same month of the previous year
    pub growth: Vec<ProductGrowth>,
    pub decline: Vec<ProductGrowth>,
}
