use std::sync::Arc;

use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::domain::a002_customer::aggregate::CustomerRecord;
use tokio::task::JoinSet;

use super::cache::SnapshotCache;
use super::error::FetchError;
use super::source::SalesSource;
use crate::shared::config::CacheConfig;
use crate::shared::dates::month_bounds;
use crate::shared::format::format_number;

/// Sale lines of a selected year and of the year before it
#[derive(Debug, Clone)]
pub struct YearSnapshot {
    pub year: i32,
    pub current: Arc<Vec<SaleRecord>>,
    pub previous: Arc<Vec<SaleRecord>>,
}

/// Cached access to the remote data.
///
/// A year is loaded once and then served from memory until its TTL runs out;
/// month and team filters are applied by the callers on the snapshot.
pub struct DataStore {
    source: Arc<dyn SalesSource>,
    sales: SnapshotCache<i32, Arc<Vec<SaleRecord>>>,
    customers: SnapshotCache<(), Arc<Vec<CustomerRecord>>>,
}

impl DataStore {
    pub fn new(source: Arc<dyn SalesSource>, config: &CacheConfig) -> Self {
        Self {
            source,
            sales: SnapshotCache::new(config.sales_ttl()),
            customers: SnapshotCache::new(config.customers_ttl()),
        }
    }

    /// The selected year and the previous one, loaded concurrently
    pub async fn snapshot(&self, year: i32) -> Result<YearSnapshot, FetchError> {
        let previous_year = year
            .checked_sub(1)
            .ok_or_else(|| FetchError::Api(format!("invalid year {}", year)))?;
        let (current, previous) = tokio::try_join!(
            self.sales_for_year(year),
            self.sales_for_year(previous_year)
        )?;
        Ok(YearSnapshot {
            year,
            current,
            previous,
        })
    }

    pub async fn sales_for_year(&self, year: i32) -> Result<Arc<Vec<SaleRecord>>, FetchError> {
        if let Some(cached) = self.sales.fresh(&year) {
            return Ok(cached);
        }

        let ticket = self.sales.begin(year);
        let records = Arc::new(fetch_year(self.source.clone(), year).await?);
        tracing::info!(
            "Loaded {} sale lines for {}",
            format_number(records.len()),
            year
        );
        self.sales.complete(ticket, records.clone());
        Ok(records)
    }

    pub async fn customers(&self) -> Result<Arc<Vec<CustomerRecord>>, FetchError> {
        if let Some(cached) = self.customers.fresh(&()) {
            return Ok(cached);
        }

        let ticket = self.customers.begin(());
        let records = Arc::new(self.source.fetch_customers().await?);
        self.customers.complete(ticket, records.clone());
        Ok(records)
    }
}

/// Fetch a whole year as 12 concurrent monthly shards.
///
/// The shards are merged in month order only when all of them succeeded; the
/// first failure aborts the remaining shards and discards what was fetched.
async fn fetch_year(source: Arc<dyn SalesSource>, year: i32) -> Result<Vec<SaleRecord>, FetchError> {
    let mut shards = JoinSet::new();
    for month in 1..=12u32 {
        let (from, to) = month_bounds(year, month)
            .ok_or_else(|| FetchError::Api(format!("invalid period {}-{:02}", year, month)))?;
        let source = source.clone();
        shards.spawn(async move { (month, source.fetch_sales(from, to).await) });
    }

    let mut by_month: Vec<Option<Vec<SaleRecord>>> = vec![None; 12];
    while let Some(joined) = shards.join_next().await {
        let (month, result) = match joined {
            Ok(shard) => shard,
            Err(e) => {
                shards.abort_all();
                return Err(FetchError::Join(e.to_string()));
            }
        };
        match result {
            Ok(records) => by_month[(month - 1) as usize] = Some(records),
            Err(e) => {
                shards.abort_all();
                tracing::error!("Sales shard {}-{:02} failed: {}", year, month, e);
                return Err(e);
            }
        }
    }

    Ok(by_month.into_iter().flatten().flatten().collect())
}
