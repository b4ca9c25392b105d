use contracts::dashboards::d400_overview::{
    ChannelMargin, ChannelShare, Kpis, MonthlyRevenue, OverviewResponse, PeriodVariance,
};
use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::shared::aggregates::TopItem;
use contracts::shared::filters::SalesFilter;

use crate::shared::aggregation::{
    aggregate, aggregate_by, in_month, ratio_percent, scoped_by_team, sort_groups, top_n, totals,
    Dimension, SortKey,
};
use crate::shared::data_source::{DataStore, FetchError, YearSnapshot};
use crate::shared::dates::{month_name, previous_month};
use crate::shared::format::format_brl;
use crate::shared::variance::variance;
use crate::system::access::AccessScope;

pub const TOP_LIMIT: usize = 10;

pub async fn get_overview(
    store: &DataStore,
    scope: &AccessScope,
    filter: &SalesFilter,
) -> Result<OverviewResponse, FetchError> {
    let snapshot = store.snapshot(filter.year).await?;
    Ok(build_overview(&snapshot, scope, filter))
}

/// Headline figures of a set of lines.
///
/// Margin percent and average ticket are taken over net revenue here, unlike
/// the per-key rollups which use gross revenue.
pub fn kpis<'a, I>(records: I) -> Kpis
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let records: Vec<&SaleRecord> = records.into_iter().collect();
    let acc = totals(records.iter().copied());
    let net = acc.net_revenue();
    let invoices = acc.invoice_count();
    Kpis {
        gross_billed: acc.gross_revenue,
        returned: acc.returned,
        net_revenue: net,
        cost_of_goods: acc.cost_of_goods(),
        margin: acc.margin,
        margin_percent: ratio_percent(acc.margin, net),
        average_ticket: if invoices > 0 { net / invoices as f64 } else { 0.0 },
        invoice_count: invoices,
        return_lines: records.iter().filter(|r| r.is_return()).count(),
    }
}

pub fn period_variance(current: &Kpis, previous: &Kpis) -> PeriodVariance {
    PeriodVariance {
        net_revenue: variance(current.net_revenue, previous.net_revenue),
        margin: variance(current.margin, previous.margin),
    }
}

/// Twelve points, January to December; months without lines are zero
pub fn monthly_series<'a, I>(records: I, year: i32) -> Vec<MonthlyRevenue>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let groups = aggregate_by(records, |r| Dimension::Month.key(r));
    (1..=12u32)
        .map(|month| {
            let key = format!("{:02}", month);
            let acc = groups.iter().find(|g| g.key == key).map(|g| &g.acc);
            MonthlyRevenue {
                month,
                month_name: month_name(month).to_string(),
                gross: acc.map(|a| a.gross_revenue).unwrap_or(0.0),
                net: acc.map(|a| a.net_revenue()).unwrap_or(0.0),
                year,
            }
        })
        .collect()
}

pub fn channel_share<'a, I>(records: I) -> Vec<ChannelShare>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let groups = aggregate(records, Dimension::Channel, SortKey::GrossRevenue);
    let total: f64 = groups.iter().map(|g| g.acc.gross_revenue).sum();
    groups
        .iter()
        .map(|g| ChannelShare {
            channel: g.key.clone(),
            gross_revenue: g.acc.gross_revenue,
            percent: ratio_percent(g.acc.gross_revenue, total),
        })
        .collect()
}

pub fn channel_margin<'a, I>(records: I) -> Vec<ChannelMargin>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    aggregate(records, Dimension::Channel, SortKey::Margin)
        .iter()
        .map(|g| ChannelMargin {
            channel: g.key.clone(),
            margin: g.acc.margin,
            margin_percent: g.acc.margin_percent(),
            gross_revenue: g.acc.gross_revenue,
        })
        .collect()
}

/// Ranked entries of a dimension, keeping only the figures that dimension shows
pub fn top_items<'a, I>(records: I, dimension: Dimension, limit: usize) -> Vec<TopItem>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut groups = aggregate_by(records, |r| dimension.key(r));
    sort_groups(&mut groups, SortKey::GrossRevenue);
    top_n(groups, limit)
        .iter()
        .map(|g| {
            let item = g.to_top_item();
            match dimension {
                Dimension::Product => TopItem {
                    invoice_count: None,
                    ..item
                },
                Dimension::Customer => TopItem {
                    quantity: None,
                    margin: None,
                    ..item
                },
                _ => TopItem {
                    quantity: None,
                    margin: None,
                    invoice_count: None,
                    ..item
                },
            }
        })
        .collect()
}

pub fn build_overview(
    snapshot: &YearSnapshot,
    scope: &AccessScope,
    filter: &SalesFilter,
) -> OverviewResponse {
    let current_year = scoped_by_team(snapshot.current.iter(), &scope.teams, &filter.team);
    let previous_year = scoped_by_team(snapshot.previous.iter(), &scope.teams, &filter.team);

    let month = in_month(current_year.iter().copied(), filter.month);
    let same_month_last_year = in_month(previous_year.iter().copied(), filter.month);
    let (_, prev_month) = previous_month(filter.year, filter.month);
    let previous_month_lines = if filter.month == 1 {
        in_month(previous_year.iter().copied(), prev_month)
    } else {
        in_month(current_year.iter().copied(), prev_month)
    };

    let kpis_month = kpis(month.iter().copied());
    let kpis_last_year = kpis(same_month_last_year.iter().copied());
    let kpis_prev_month = kpis(previous_month_lines.iter().copied());

    tracing::info!(
        "D400 Overview {} ({}): gross {}, returned {}, net {}, {} invoices",
        filter.period(),
        filter.team,
        format_brl(kpis_month.gross_billed),
        format_brl(kpis_month.returned),
        format_brl(kpis_month.net_revenue),
        kpis_month.invoice_count
    );

    OverviewResponse {
        period: filter.period(),
        team: filter.team.clone(),
        year_over_year: period_variance(&kpis_month, &kpis_last_year),
        month_over_month: period_variance(&kpis_month, &kpis_prev_month),
        kpis: kpis_month,
        kpis_same_month_last_year: kpis_last_year,
        kpis_previous_month: kpis_prev_month,
        monthly_current: monthly_series(current_year.iter().copied(), snapshot.year),
        monthly_previous: monthly_series(previous_year.iter().copied(), snapshot.year - 1),
        channel_share: channel_share(month.iter().copied()),
        channel_margin: channel_margin(month.iter().copied()),
        top_products: top_items(month.iter().copied(), Dimension::Product, TOP_LIMIT),
        top_salespeople: top_items(month.iter().copied(), Dimension::Salesperson, TOP_LIMIT),
        top_customers: top_items(month.iter().copied(), Dimension::Customer, TOP_LIMIT),
        revenue_by_region: aggregate(month.iter().copied(), Dimension::Region, SortKey::GrossRevenue)
            .iter()
            .map(|g| g.to_totals())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_sale::aggregate::Movement;
    use contracts::shared::filters::ALL_TEAMS;
    use contracts::system::access::AppRole;
    use std::sync::Arc;

    fn line(month: u32, movement: Movement, invoice: &str, value: f64) -> SaleRecord {
        SaleRecord {
            invoice_id: invoice.to_string(),
            movement,
            gross_value: value,
            margin_value: if movement == Movement::Sale { value * 0.2 } else { 0.0 },
            channel: "REVENDA".to_string(),
            product_name: "ANEL O-RING".to_string(),
            customer_name: "CLIENTE A".to_string(),
            salesperson: "JOAO".to_string(),
            region: "SUL".to_string(),
            team: "VAREJO".to_string(),
            month,
            ..Default::default()
        }
    }

    #[test]
    fn test_kpis_gross_and_net() {
        let records = vec![
            line(1, Movement::Sale, "NF1", 600.0),
            line(1, Movement::Sale, "NF2", 400.0),
            line(1, Movement::Return, "NF3", -200.0),
        ];
        let k = kpis(&records);

        assert_eq!(k.gross_billed, 1000.0);
        assert_eq!(k.returned, 200.0);
        assert_eq!(k.net_revenue, 800.0);
        assert_eq!(k.invoice_count, 2);
        assert_eq!(k.return_lines, 1);
        assert_eq!(k.average_ticket, 400.0);
        assert_eq!(k.margin_percent, 25.0);
    }

    #[test]
    fn test_monthly_series_has_twelve_points() {
        let records = vec![
            line(3, Movement::Sale, "A", 100.0),
            line(3, Movement::Return, "B", -40.0),
        ];
        let series = monthly_series(&records, 2025);
        assert_eq!(series.len(), 12);
        assert_eq!(series[2].gross, 100.0);
        assert_eq!(series[2].net, 60.0);
        assert_eq!(series[2].month_name, "Mar");
        assert_eq!(series[0].gross, 0.0);
    }

    #[test]
    fn test_january_compares_with_previous_december() {
        let snapshot = YearSnapshot {
            year: 2025,
            current: Arc::new(vec![line(1, Movement::Sale, "J", 300.0)]),
            previous: Arc::new(vec![
                line(12, Movement::Sale, "D", 200.0),
                line(1, Movement::Sale, "Y", 150.0),
            ]),
        };
        let scope = AccessScope::for_role(AppRole::Admin);
        let overview = build_overview(&snapshot, &scope, &SalesFilter::new(2025, 1, ALL_TEAMS));

        assert_eq!(overview.kpis_previous_month.net_revenue, 200.0);
        assert_eq!(overview.month_over_month.net_revenue, 50.0);
        assert_eq!(overview.kpis_same_month_last_year.net_revenue, 150.0);
        assert_eq!(overview.year_over_year.net_revenue, 100.0);
        assert_eq!(overview.top_customers[0].invoice_count, Some(1));
        assert_eq!(overview.top_customers[0].quantity, None);
        assert_eq!(overview.channel_share[0].percent, 100.0);
        assert_eq!(overview.period, "2025-01");
    }

    #[test]
    fn test_other_sector_team_is_empty() {
        let snapshot = YearSnapshot {
            year: 2025,
            current: Arc::new(vec![line(5, Movement::Sale, "A", 300.0)]),
            previous: Arc::new(vec![]),
        };
        let scope = AccessScope::for_role(AppRole::Industria);
        let overview = build_overview(&snapshot, &scope, &SalesFilter::new(2025, 5, ALL_TEAMS));
        assert_eq!(overview.kpis.gross_billed, 0.0);
        assert!(overview.top_products.is_empty());
    }
}
