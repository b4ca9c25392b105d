use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::a001_sale::aggregate::Movement;
use crate::domain::a002_customer::aggregate::Situation;

/// Activity status derived from the days since the last purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    /// Bought within the last 90 days
    Active,
    /// 91 to 180 days without buying
    AtRisk,
    /// More than 180 days, or never
    Inactive,
}

impl CustomerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "Ativo",
            CustomerStatus::AtRisk => "Em Risco",
            CustomerStatus::Inactive => "Inativo",
        }
    }
}

/// Customer master entry merged with its sale aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerAnalysis {
    pub code: i64,
    pub name: String,
    pub gross_revenue: f64,
    pub invoice_count: usize,
    pub average_ticket: f64,
    pub margin: f64,
    pub margin_percent: f64,
    pub activity: String,
    pub region: String,
    pub category: Option<String>,
    pub state: String,
    pub city: String,
    pub email: String,
    pub last_purchase: Option<NaiveDate>,
    pub registered_on: Option<NaiveDate>,
    pub situation: Situation,
    pub status: CustomerStatus,
    /// `i64::MAX` when the customer has no parseable last purchase
    pub days_since_purchase: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub customers: Vec<CustomerAnalysis>,
    pub count: usize,
}

/// Partition of a customer list by activity status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBuckets {
    pub active: StatusBucket,
    pub at_risk: StatusBucket,
    pub inactive: StatusBucket,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub active: usize,
    pub at_risk: usize,
    pub inactive: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnEntry {
    pub customer: CustomerAnalysis,
    pub days_since_purchase: i64,
    pub last_purchase: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChurnBucket {
    /// Most overdue first
    pub customers: Vec<ChurnEntry>,
    pub count: usize,
    pub revenue_at_risk: f64,
}

/// Active customers whose last purchase is 3 or 6+ months old
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChurnAnalysis {
    /// 91 to 180 days
    pub at_risk: ChurnBucket,
    /// More than 180 days
    pub churned: ChurnBucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    New,
    Recurring,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortTotals {
    pub customers: usize,
    pub gross_revenue: f64,
    pub customer_share_percent: f64,
    pub revenue_share_percent: f64,
}

/// New vs recurring customers among the buyers of a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortSplit {
    pub new: CohortTotals,
    pub recurring: CohortTotals,
    pub total_customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBucket {
    pub label: String,
    pub customers: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseFrequency {
    pub buckets: Vec<FrequencyBucket>,
    /// Invoices per buying customer
    pub mean_repurchase_rate: f64,
}

/// Request for the customers dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomersRequest {
    /// Sales year for revenue figures; defaults to the reference date's year
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub team: Option<String>,
    /// Category filter; `TODAS` or absent means every permitted category
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<CustomerStatus>,
    /// Defaults to today
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

/// Response for the customers dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomersResponse {
    pub reference_date: NaiveDate,
    pub year: i32,
    /// Selectable categories, starting with `TODAS`
    pub categories: Vec<String>,
    pub status_counts: StatusCounts,
    pub churn: ChurnAnalysis,
    pub cohort: CohortSplit,
    pub frequency: PurchaseFrequency,
    /// Customers of the requested status (all when absent), by revenue
    pub customers: Vec<CustomerAnalysis>,
}

/// Request for one customer's sales history
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSalesRequest {
    /// Defaults to the current year; the year before it is included too
    #[serde(default)]
    pub year: Option<i32>,
}

/// One invoice line of a customer's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSaleLine {
    pub date: Option<NaiveDate>,
    pub invoice_id: String,
    pub movement: Movement,
    pub product_code: String,
    pub product_name: String,
    pub quantity: f64,
    pub merchandise_value: f64,
    pub margin_value: f64,
    /// `margin_value / merchandise_value * 100`
    pub margin_percent: f64,
}

/// Sales history of one customer, newest line first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSalesResponse {
    pub code: i64,
    pub name: String,
    pub category: Option<String>,
    pub year: i32,
    pub lines: Vec<CustomerSaleLine>,
    pub merchandise_total: f64,
    pub margin_total: f64,
}
