use std::collections::HashMap;

use chrono::Datelike;
use contracts::dashboards::d401_customers::{Cohort, CohortSplit, CohortTotals};
use contracts::domain::a002_customer::aggregate::CustomerRecord;

use crate::shared::aggregation::{ratio_percent, Accumulator};

/// `New` when the customer was registered in `year`; a missing master entry or
/// registration date counts as recurring.
pub fn cohort_of(customer: Option<&CustomerRecord>, year: i32) -> Cohort {
    match customer.and_then(|c| c.registered_on) {
        Some(date) if date.year() == year => Cohort::New,
        _ => Cohort::Recurring,
    }
}

/// New vs recurring split among the customers that bought in the period.
///
/// `buyers` holds the period's sale totals per customer code; only customers
/// with gross revenue or invoices in the period are counted.
pub fn cohort_split(
    buyers: &HashMap<i64, Accumulator>,
    customers: &[CustomerRecord],
    year: i32,
) -> CohortSplit {
    let master: HashMap<i64, &CustomerRecord> = customers.iter().map(|c| (c.code, c)).collect();

    let mut new = CohortTotals::default();
    let mut recurring = CohortTotals::default();

    for (code, acc) in buyers {
        if acc.gross_revenue <= 0.0 && acc.invoice_count() == 0 {
            continue;
        }
        let totals = match cohort_of(master.get(code).copied(), year) {
            Cohort::New => &mut new,
            Cohort::Recurring => &mut recurring,
        };
        totals.customers += 1;
        totals.gross_revenue += acc.gross_revenue;
    }

    let total_customers = new.customers + recurring.customers;
    let total_revenue = new.gross_revenue + recurring.gross_revenue;
    for totals in [&mut new, &mut recurring] {
        totals.customer_share_percent = ratio_percent(totals.customers as f64, total_customers as f64);
        totals.revenue_share_percent = ratio_percent(totals.gross_revenue, total_revenue);
    }

    CohortSplit {
        new,
        recurring,
        total_customers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn registered(code: i64, date: Option<NaiveDate>) -> CustomerRecord {
        CustomerRecord {
            code,
            registered_on: date,
            ..Default::default()
        }
    }

    fn bought(revenue: f64) -> Accumulator {
        Accumulator {
            gross_revenue: revenue,
            ..Default::default()
        }
    }

    #[test]
    fn test_registration_year_decides() {
        let this_year = registered(1, NaiveDate::from_ymd_opt(2025, 2, 10));
        let older = registered(2, NaiveDate::from_ymd_opt(2019, 2, 10));
        let undated = registered(3, None);

        assert_eq!(cohort_of(Some(&this_year), 2025), Cohort::New);
        assert_eq!(cohort_of(Some(&older), 2025), Cohort::Recurring);
        assert_eq!(cohort_of(Some(&undated), 2025), Cohort::Recurring);
        assert_eq!(cohort_of(None, 2025), Cohort::Recurring);
    }

    #[test]
    fn test_split_shares() {
        let customers = vec![
            registered(1, NaiveDate::from_ymd_opt(2025, 2, 10)),
            registered(2, NaiveDate::from_ymd_opt(2020, 1, 1)),
        ];
        let buyers: HashMap<i64, Accumulator> = [
            (1, bought(100.0)),
            (2, bought(300.0)),
            (77, bought(600.0)),
            (5, bought(0.0)),
        ]
        .into_iter()
        .collect();

        let split = cohort_split(&buyers, &customers, 2025);
        assert_eq!(split.total_customers, 3);
        assert_eq!(split.new.customers, 1);
        assert_eq!(split.recurring.customers, 2);
        assert_eq!(split.new.revenue_share_percent, 10.0);
        assert_eq!(split.recurring.gross_revenue, 900.0);
        assert!((split.new.customer_share_percent - 100.0 / 3.0).abs() < 1e-9);
    }
}
