use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::domain::a002_customer::aggregate::CustomerRecord;

use super::error::FetchError;

/// Remote origin of sale lines and the customer master.
///
/// Implementations return already normalized records; nothing past this trait
/// sees the wire format.
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Sale lines issued between `from` and `to`, both inclusive
    async fn fetch_sales(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<SaleRecord>, FetchError>;

    async fn fetch_customers(&self) -> Result<Vec<CustomerRecord>, FetchError>;
}
