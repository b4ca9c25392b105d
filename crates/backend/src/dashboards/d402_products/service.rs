use std::cmp::Ordering;

use contracts::dashboards::d402_products::{
    ChannelProducts, ProductGrowth, ProductSummary, ProductsResponse,
};
use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::shared::filters::SalesFilter;

use crate::shared::aggregation::{
    aggregate, aggregate_by, in_month, scoped_by_team, top_n, Dimension, Group, SortKey,
};
use crate::shared::data_source::{DataStore, FetchError, YearSnapshot};
use crate::shared::variance::{gross_by_key, keyed_variance};
use crate::system::access::AccessScope;

pub const PRODUCTS_PER_CHANNEL: usize = 10;
pub const MARGIN_LIMIT: usize = 20;
pub const GROWTH_LIMIT: usize = 10;
/// Products below this gross revenue in both periods are left out of the growth ranking
pub const MIN_GROWTH_REVENUE: f64 = 1000.0;

pub async fn get_products(
    store: &DataStore,
    scope: &AccessScope,
    filter: &SalesFilter,
) -> Result<ProductsResponse, FetchError> {
    let snapshot = store.snapshot(filter.year).await?;
    Ok(build_products(&snapshot, scope, filter))
}

fn summary(group: &Group) -> ProductSummary {
    ProductSummary {
        name: group.key.clone(),
        gross_revenue: group.acc.gross_revenue,
        margin: group.acc.margin,
        margin_percent: group.acc.margin_percent(),
        quantity: group.acc.quantity,
    }
}

/// Best sellers of every channel; channels are ranked by the revenue of their
/// listed products, not of the whole channel
pub fn top_products_by_channel<'a, I>(records: I, per_channel: usize) -> Vec<ChannelProducts>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let records: Vec<&SaleRecord> = records.into_iter().collect();
    let channels = aggregate_by(records.iter().copied(), |r| Dimension::Channel.key(r));

    let mut result: Vec<(f64, ChannelProducts)> = channels
        .iter()
        .map(|channel| {
            let lines = records
                .iter()
                .copied()
                .filter(|r| Dimension::Channel.key(r) == channel.key);
            let products = top_n(
                aggregate(lines, Dimension::Product, SortKey::GrossRevenue),
                per_channel,
            );
            let listed: f64 = products.iter().map(|p| p.acc.gross_revenue).sum();
            (
                listed,
                ChannelProducts {
                    channel: channel.key.clone(),
                    products: products.iter().map(summary).collect(),
                },
            )
        })
        .collect();

    result.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    result.into_iter().map(|(_, c)| c).collect()
}

pub fn margin_by_product<'a, I>(records: I, limit: usize) -> Vec<ProductSummary>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    top_n(aggregate(records, Dimension::Product, SortKey::GrossRevenue), limit)
        .iter()
        .map(summary)
        .collect()
}

/// Products with the largest rise and the largest fall in gross revenue.
///
/// Returns `(growth, decline)`: growth sorted by variance descending, decline
/// ascending, each truncated to `limit`.
pub fn product_growth<'a, I, J>(
    current: I,
    previous: J,
    limit: usize,
    min_revenue: f64,
) -> (Vec<ProductGrowth>, Vec<ProductGrowth>)
where
    I: IntoIterator<Item = &'a SaleRecord>,
    J: IntoIterator<Item = &'a SaleRecord>,
{
    let current = gross_by_key(&aggregate(current, Dimension::Product, SortKey::GrossRevenue));
    let previous = gross_by_key(&aggregate(previous, Dimension::Product, SortKey::GrossRevenue));

    let compared: Vec<ProductGrowth> = keyed_variance(&current, &previous)
        .into_iter()
        .filter(|kv| kv.current >= min_revenue || kv.previous >= min_revenue)
        .map(|kv| ProductGrowth {
            absolute_change: kv.current - kv.previous,
            name: kv.key,
            current_revenue: kv.current,
            previous_revenue: kv.previous,
            variance: kv.variance,
        })
        .collect();

    let mut growth: Vec<ProductGrowth> =
        compared.iter().filter(|p| p.variance > 0.0).cloned().collect();
    growth.sort_by(|a, b| b.variance.partial_cmp(&a.variance).unwrap_or(Ordering::Equal));
    growth.truncate(limit);

    let mut decline: Vec<ProductGrowth> =
        compared.into_iter().filter(|p| p.variance < 0.0).collect();
    decline.sort_by(|a, b| a.variance.partial_cmp(&b.variance).unwrap_or(Ordering::Equal));
    decline.truncate(limit);

    (growth, decline)
}

pub fn build_products(
    snapshot: &YearSnapshot,
    scope: &AccessScope,
    filter: &SalesFilter,
) -> ProductsResponse {
    let current_year = scoped_by_team(snapshot.current.iter(), &scope.teams, &filter.team);
    let previous_year = scoped_by_team(snapshot.previous.iter(), &scope.teams, &filter.team);
    let month = in_month(current_year.iter().copied(), filter.month);
    let same_month_last_year = in_month(previous_year.iter().copied(), filter.month);

    let (growth, decline) = product_growth(
        month.iter().copied(),
        same_month_last_year.iter().copied(),
        GROWTH_LIMIT,
        MIN_GROWTH_REVENUE,
    );

    tracing::info!(
        "D402 Products {} ({}): {} lines, {} growing, {} declining",
        filter.period(),
        filter.team,
        month.len(),
        growth.len(),
        decline.len()
    );

    ProductsResponse {
        period: filter.period(),
        team: filter.team.clone(),
        top_by_channel: top_products_by_channel(month.iter().copied(), PRODUCTS_PER_CHANNEL),
        margin_by_product: margin_by_product(month.iter().copied(), MARGIN_LIMIT),
        growth,
        decline,
    }
}
