use contracts::dashboards::d403_regional::{
    Granularity, LocationDetail, RegionalDetailRequest, RegionalResponse, StateTotals,
};
use contracts::domain::a001_sale::aggregate::{Movement, SaleRecord};
use contracts::shared::aggregates::{GroupTotals, TopItem};
use contracts::shared::filters::SalesFilter;

use super::states::{normalize_state, region_of, INVALID_STATE};
use crate::shared::aggregation::{
    aggregate, aggregate_by, in_month, regroup, scoped_by_team, sort_groups, top_n, totals,
    Dimension, Group, SortKey,
};
use crate::shared::data_source::{DataStore, FetchError, YearSnapshot};
use crate::shared::dates::previous_month;
use crate::shared::format::format_brl;
use crate::shared::variance::variance;
use crate::system::access::AccessScope;

pub const DETAIL_LIMIT: usize = 5;

pub async fn get_regional(
    store: &DataStore,
    scope: &AccessScope,
    filter: &SalesFilter,
) -> Result<RegionalResponse, FetchError> {
    let snapshot = store.snapshot(filter.year).await?;
    Ok(build_regional(&snapshot, scope, filter))
}

pub async fn get_location_detail(
    store: &DataStore,
    scope: &AccessScope,
    request: &RegionalDetailRequest,
) -> Result<LocationDetail, FetchError> {
    let snapshot = store.snapshot(request.year).await?;
    Ok(location_detail(&snapshot, scope, request))
}

/// State rollup split into valid states and the invalid bucket
pub struct StateRollup {
    pub states: Vec<Group>,
    pub excluded: Option<Group>,
    pub excluded_lines: usize,
}

/// Aggregate by state; lines with an unknown state code are collected under
/// `XX` and kept out of `states`
pub fn rollup_by_state<'a, I>(records: I) -> StateRollup
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let records: Vec<&SaleRecord> = records.into_iter().collect();
    let excluded_lines = records
        .iter()
        .filter(|r| r.movement != Movement::Unknown && normalize_state(&r.state) == INVALID_STATE)
        .count();

    let mut groups = aggregate_by(records.iter().copied(), |r| normalize_state(&r.state));
    sort_groups(&mut groups, SortKey::GrossRevenue);

    let (excluded, states): (Vec<Group>, Vec<Group>) =
        groups.into_iter().partition(|g| g.key == INVALID_STATE);
    let excluded = excluded.into_iter().next();

    if let Some(invalid) = &excluded {
        tracing::warn!(
            "D403: {} lines with an invalid state left out of the map ({} gross)",
            excluded_lines,
            format_brl(invalid.acc.gross_revenue)
        );
    }

    StateRollup {
        states,
        excluded,
        excluded_lines,
    }
}

/// Merge state groups into their macro-regions
pub fn rollup_by_region(states: Vec<Group>) -> Vec<Group> {
    let mut regions = regroup(states, |uf| region_of(uf).to_string());
    sort_groups(&mut regions, SortKey::GrossRevenue);
    regions
}

pub fn build_regional(
    snapshot: &YearSnapshot,
    scope: &AccessScope,
    filter: &SalesFilter,
) -> RegionalResponse {
    let current_year = scoped_by_team(snapshot.current.iter(), &scope.teams, &filter.team);
    let month = in_month(current_year.iter().copied(), filter.month);

    let rollup = rollup_by_state(month.iter().copied());
    let by_state = rollup
        .states
        .iter()
        .map(|g| StateTotals {
            state: g.key.clone(),
            region: region_of(&g.key).to_string(),
            totals: g.to_totals(),
        })
        .collect();
    let by_region = rollup_by_region(rollup.states)
        .iter()
        .map(Group::to_totals)
        .collect();

    RegionalResponse {
        period: filter.period(),
        team: filter.team.clone(),
        by_state,
        by_region,
        excluded_revenue: rollup
            .excluded
            .map(|g| g.acc.gross_revenue)
            .unwrap_or(0.0),
        excluded_lines: rollup.excluded_lines,
    }
}

fn at_location(record: &SaleRecord, granularity: Granularity, location: &str) -> bool {
    match granularity {
        Granularity::State => normalize_state(&record.state) == location.trim().to_uppercase(),
        Granularity::Region => {
            normalize_state(&record.state) != INVALID_STATE
                && region_of(&record.state).eq_ignore_ascii_case(location.trim())
        }
    }
}

fn local_lines<'a>(
    records: &'a [SaleRecord],
    scope: &AccessScope,
    request: &RegionalDetailRequest,
) -> Vec<&'a SaleRecord> {
    scoped_by_team(records.iter(), &scope.teams, &request.team)
        .into_iter()
        .filter(|r| at_location(r, request.granularity, &request.location))
        .collect()
}

fn ranked(records: &[&SaleRecord], dimension: Dimension) -> Vec<TopItem> {
    top_n(aggregate(records.iter().copied(), dimension, SortKey::GrossRevenue), DETAIL_LIMIT)
        .iter()
        .map(|g| TopItem {
            name: g.key.clone(),
            gross_revenue: g.acc.gross_revenue,
            quantity: None,
            margin: None,
            invoice_count: None,
        })
        .collect()
}

/// Drill-down of one state or macro-region for the selected month
pub fn location_detail(
    snapshot: &YearSnapshot,
    scope: &AccessScope,
    request: &RegionalDetailRequest,
) -> LocationDetail {
    let current_year = local_lines(&snapshot.current, scope, request);
    let previous_year = local_lines(&snapshot.previous, scope, request);

    let month = in_month(current_year.iter().copied(), request.month);
    let same_month_last_year = in_month(previous_year.iter().copied(), request.month);
    let (_, prev_month) = previous_month(request.year, request.month);
    let previous_month_lines = if request.month == 1 {
        in_month(previous_year.iter().copied(), prev_month)
    } else {
        in_month(current_year.iter().copied(), prev_month)
    };

    let month_totals = totals(month.iter().copied());
    let gross = month_totals.gross_revenue;
    let location_totals: Option<GroupTotals> = if month.is_empty() {
        None
    } else {
        Some(
            Group {
                key: request.location.trim().to_string(),
                acc: month_totals,
            }
            .to_totals(),
        )
    };

    LocationDetail {
        location: request.location.trim().to_string(),
        granularity: request.granularity,
        totals: location_totals,
        top_products: ranked(&month, Dimension::Product),
        top_customers: ranked(&month, Dimension::Customer),
        channels: aggregate(month.iter().copied(), Dimension::Channel, SortKey::GrossRevenue)
            .iter()
            .map(Group::to_totals)
            .collect(),
        month_over_month: variance(gross, totals_gross(&previous_month_lines)),
        year_over_year: variance(gross, totals_gross(&same_month_last_year)),
    }
}

fn totals_gross(records: &[&SaleRecord]) -> f64 {
    totals(records.iter().copied()).gross_revenue
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::filters::ALL_TEAMS;
    use contracts::system::access::AppRole;
    use std::sync::Arc;

    fn line(state: &str, invoice: &str, value: f64, month: u32) -> SaleRecord {
        SaleRecord {
            state: state.to_string(),
            invoice_id: invoice.to_string(),
            movement: Movement::Sale,
            gross_value: value,
            product_name: format!("PROD {}", invoice),
            customer_name: format!("CLI {}", state),
            channel: "REVENDA".to_string(),
            team: "VAREJO".to_string(),
            month,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_states_are_excluded() {
        let records = vec![
            line("SP", "1", 100.0, 1),
            line("rj", "2", 50.0, 1),
            line("", "3", 30.0, 1),
            line("Sao Paulo", "4", 20.0, 1),
        ];
        let rollup = rollup_by_state(&records);

        let keys: Vec<&str> = rollup.states.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["SP", "RJ"]);
        assert_eq!(rollup.excluded_lines, 2);
        assert_eq!(rollup.excluded.map(|g| g.acc.gross_revenue), Some(50.0));
    }

    #[test]
    fn test_regions_union_invoices() {
        let records = vec![
            line("SP", "NF1", 100.0, 1),
            line("RJ", "NF1", 40.0, 1),
            line("RS", "NF2", 300.0, 1),
            line("EX", "NF3", 10.0, 1),
        ];
        let regions = rollup_by_region(rollup_by_state(&records).states);

        let keys: Vec<&str> = regions.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["Sul", "Sudeste", "Exterior"]);
        assert_eq!(regions[1].acc.gross_revenue, 140.0);
        assert_eq!(regions[1].acc.invoice_count(), 1);
    }

    fn snapshot() -> YearSnapshot {
        YearSnapshot {
            year: 2025,
            current: Arc::new(vec![
                line("SP", "A", 200.0, 3),
                line("MG", "B", 100.0, 3),
                line("SP", "C", 100.0, 2),
                line("XX", "D", 999.0, 3),
            ]),
            previous: Arc::new(vec![line("SP", "E", 400.0, 3)]),
        }
    }

    #[test]
    fn test_build_regional() {
        let scope = AccessScope::for_role(AppRole::Admin);
        let response = build_regional(&snapshot(), &scope, &SalesFilter::new(2025, 3, ALL_TEAMS));

        assert_eq!(response.by_state.len(), 2);
        assert_eq!(response.by_state[0].region, "Sudeste");
        assert_eq!(response.by_region.len(), 1);
        assert_eq!(response.by_region[0].gross_revenue, 300.0);
        assert_eq!(response.excluded_revenue, 999.0);
        assert_eq!(response.excluded_lines, 1);
    }

    #[test]
    fn test_state_detail_variances() {
        let scope = AccessScope::for_role(AppRole::Admin);
        let request = RegionalDetailRequest {
            year: 2025,
            month: 3,
            team: ALL_TEAMS.to_string(),
            granularity: Granularity::State,
            location: "sp".to_string(),
        };
        let detail = location_detail(&snapshot(), &scope, &request);

        assert_eq!(detail.totals.as_ref().map(|t| t.gross_revenue), Some(200.0));
        assert_eq!(detail.top_products.len(), 1);
        assert_eq!(detail.top_customers[0].name, "CLI SP");
        assert_eq!(detail.month_over_month, 100.0);
        assert_eq!(detail.year_over_year, -50.0);
    }

    #[test]
    fn test_unknown_region_skips_invalid_states() {
        let scope = AccessScope::for_role(AppRole::Admin);
        let request = RegionalDetailRequest {
            year: 2025,
            month: 3,
            team: ALL_TEAMS.to_string(),
            granularity: Granularity::Region,
            location: "Outros".to_string(),
        };
        let detail = location_detail(&snapshot(), &scope, &request);

        assert!(detail.totals.is_none());
        assert!(detail.top_customers.is_empty());
    }

    #[test]
    fn test_region_detail_without_sales() {
        let scope = AccessScope::for_role(AppRole::Admin);
        let request = RegionalDetailRequest {
            year: 2025,
            month: 3,
            team: ALL_TEAMS.to_string(),
            granularity: Granularity::Region,
            location: "Norte".to_string(),
        };
        let detail = location_detail(&snapshot(), &scope, &request);

        assert!(detail.totals.is_none());
        assert!(detail.channels.is_empty());
        assert_eq!(detail.month_over_month, 0.0);
    }
}
