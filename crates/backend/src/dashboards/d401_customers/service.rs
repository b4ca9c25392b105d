use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, NaiveDate};
use contracts::dashboards::d401_customers::{CustomersRequest, CustomersResponse};
use contracts::domain::a002_customer::aggregate::CustomerRecord;
use contracts::shared::filters::ALL_TEAMS;

use super::analysis::{analyze_customers, sales_by_customer};
use super::churn::churn_analysis;
use super::classification::{counts, partition};
use super::cohort::cohort_split;
use super::frequency::purchase_frequency;
use crate::shared::aggregation::{scoped_by_team, scoped_customers, CategoryScope, NO_CATEGORY};
use crate::shared::data_source::{DataStore, FetchError, YearSnapshot};
use crate::shared::dates::today;
use crate::system::access::AccessScope;

/// Load the customer master and the sales of the requested year, then build
/// the dashboard
pub async fn get_customers(
    store: &DataStore,
    scope: &AccessScope,
    request: CustomersRequest,
) -> Result<CustomersResponse, FetchError> {
    let reference = request.reference_date.unwrap_or_else(today);
    let year = request.year.unwrap_or_else(|| reference.year());

    let (customers, snapshot) = tokio::try_join!(store.customers(), store.snapshot(year))?;
    Ok(build_customers(&customers, &snapshot, scope, &request, reference))
}

/// Selectable categories of the customers in scope, `TODAS` first
pub fn category_options(customers: &[CustomerRecord], scope: &CategoryScope) -> Vec<String> {
    let distinct: BTreeSet<String> = customers
        .iter()
        .filter(|c| scope.permits(c.category.as_deref()))
        .map(|c| match c.category.as_deref().map(str::trim) {
            Some(cat) if !cat.is_empty() => cat.to_string(),
            _ => NO_CATEGORY.to_string(),
        })
        .collect();

    std::iter::once(ALL_TEAMS.to_string()).chain(distinct).collect()
}

/// Build the customers dashboard from loaded data.
///
/// Revenue figures of the customer list cover both loaded years; the cohort
/// split and the purchase frequency only look at the selected year.
pub fn build_customers(
    customers: &[CustomerRecord],
    snapshot: &YearSnapshot,
    scope: &AccessScope,
    request: &CustomersRequest,
    reference: NaiveDate,
) -> CustomersResponse {
    let team = request.team.as_deref().unwrap_or(ALL_TEAMS);
    let current = scoped_by_team(snapshot.current.iter(), &scope.teams, team);
    let previous = scoped_by_team(snapshot.previous.iter(), &scope.teams, team);

    let selected = request.category.as_deref();
    let permitted = scoped_customers(customers, &scope.categories, selected);

    let window_totals = sales_by_customer(current.iter().chain(previous.iter()).copied());
    let analysis = analyze_customers(permitted.iter().copied(), &window_totals, reference);

    let status_counts = counts(&partition(analysis.clone()));
    let churn = churn_analysis(&analysis, reference);

    let mut buyers = sales_by_customer(current.iter().copied());
    let restricted = scope.categories != CategoryScope::All
        || selected.map(|s| s.trim() != ALL_TEAMS).unwrap_or(false);
    if restricted {
        let codes: HashSet<i64> = permitted.iter().map(|c| c.code).collect();
        buyers.retain(|code, _| codes.contains(code));
    }
    let cohort = cohort_split(&buyers, customers, snapshot.year);
    let frequency = purchase_frequency(&buyers);

    let listed: Vec<_> = match request.status {
        Some(status) => analysis.into_iter().filter(|c| c.status == status).collect(),
        None => analysis,
    };

    tracing::debug!(
        "D401: {} customers in scope, {} buyers in {}",
        status_counts.total,
        cohort.total_customers,
        snapshot.year
    );

    CustomersResponse {
        reference_date: reference,
        year: snapshot.year,
        categories: category_options(customers, &scope.categories),
        status_counts,
        churn,
        cohort,
        frequency,
        customers: listed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d401_customers::CustomerStatus;
    use contracts::domain::a001_sale::aggregate::{Movement, SaleRecord};
    use contracts::domain::a002_customer::aggregate::Situation;
    use contracts::system::access::AppRole;
    use std::sync::Arc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn customer(code: i64, category: &str, last: NaiveDate, registered: NaiveDate) -> CustomerRecord {
        CustomerRecord {
            code,
            name: format!("CLIENTE {}", code),
            category: Some(category.to_string()),
            last_purchase: Some(last),
            registered_on: Some(registered),
            situation: Situation::Active,
            ..Default::default()
        }
    }

    fn sale(code: i64, team: &str, invoice: &str, value: f64, year: i32) -> SaleRecord {
        SaleRecord {
            customer_code: code,
            team: team.to_string(),
            invoice_id: invoice.to_string(),
            movement: Movement::Sale,
            gross_value: value,
            year,
            month: 3,
            ..Default::default()
        }
    }

    fn fixture() -> (Vec<CustomerRecord>, YearSnapshot) {
        let customers = vec![
            customer(1, "LINHA VAREJO", d(2025, 6, 1), d(2025, 1, 15)),
            customer(2, "LINHA INDUSTRIAL", d(2024, 12, 1), d(2018, 5, 5)),
            customer(3, "LINHA MISTA", d(2024, 6, 1), d(2020, 5, 5)),
        ];
        let snapshot = YearSnapshot {
            year: 2025,
            current: Arc::new(vec![
                sale(1, "VAREJO", "A", 100.0, 2025),
                sale(1, "VAREJO", "B", 100.0, 2025),
                sale(2, "INDUSTRIAL", "C", 500.0, 2025),
            ]),
            previous: Arc::new(vec![sale(3, "VAREJO", "D", 50.0, 2024)]),
        };
        (customers, snapshot)
    }

    #[test]
    fn test_admin_sees_everything() {
        let (customers, snapshot) = fixture();
        let scope = AccessScope::for_role(AppRole::Admin);
        let response = build_customers(
            &customers,
            &snapshot,
            &scope,
            &CustomersRequest::default(),
            d(2025, 6, 30),
        );

        assert_eq!(response.status_counts.total, 3);
        assert_eq!(response.status_counts.active, 1);
        assert_eq!(response.status_counts.inactive, 2);
        assert_eq!(response.customers[0].code, 2);
        assert_eq!(response.customers[2].gross_revenue, 50.0);
        assert_eq!(response.cohort.new.customers, 1);
        assert_eq!(response.cohort.recurring.customers, 1);
        assert_eq!(response.churn.churned.count, 2);
        assert_eq!(
            response.categories,
            vec!["TODAS", "LINHA INDUSTRIAL", "LINHA MISTA", "LINHA VAREJO"]
        );
    }

    #[test]
    fn test_sector_role_is_scoped() {
        let (customers, snapshot) = fixture();
        let scope = AccessScope::for_role(AppRole::Varejo);
        let request = CustomersRequest {
            status: Some(CustomerStatus::Active),
            ..Default::default()
        };
        let response = build_customers(&customers, &snapshot, &scope, &request, d(2025, 6, 30));

        assert_eq!(response.status_counts.total, 2);
        assert_eq!(response.customers.len(), 1);
        assert_eq!(response.customers[0].code, 1);
        assert_eq!(response.cohort.total_customers, 1);
        assert_eq!(response.frequency.mean_repurchase_rate, 2.0);
        assert_eq!(response.categories, vec!["TODAS", "LINHA MISTA", "LINHA VAREJO"]);
    }
}
