//! Activity status of a customer from the date of its last purchase.
//!
//! Distances are whole calendar days between local dates:
//! `0..=90` active, `91..=180` at risk, anything older (or no purchase at all)
//! inactive. A last purchase after the reference date is still active.

use chrono::NaiveDate;
use contracts::dashboards::d401_customers::{
    CustomerAnalysis, CustomerStatus, StatusBucket, StatusBuckets, StatusCounts,
};

use crate::shared::dates::days_between;

pub const ACTIVE_MAX_DAYS: i64 = 90;
pub const AT_RISK_MAX_DAYS: i64 = 180;
/// Distance reported for customers without a parseable last purchase
pub const NEVER_PURCHASED_DAYS: i64 = i64::MAX;

pub fn days_since_purchase(last_purchase: Option<NaiveDate>, reference: NaiveDate) -> i64 {
    match last_purchase {
        Some(date) => days_between(date, reference),
        None => NEVER_PURCHASED_DAYS,
    }
}

pub fn status_for_days(days: i64) -> CustomerStatus {
    if days <= ACTIVE_MAX_DAYS {
        CustomerStatus::Active
    } else if days <= AT_RISK_MAX_DAYS {
        CustomerStatus::AtRisk
    } else {
        CustomerStatus::Inactive
    }
}

/// Status and distance in days for one last-purchase date
pub fn classify(last_purchase: Option<NaiveDate>, reference: NaiveDate) -> (CustomerStatus, i64) {
    let days = days_since_purchase(last_purchase, reference);
    (status_for_days(days), days)
}

/// Split analyzed customers by status, each bucket ordered by days ascending
pub fn partition(customers: Vec<CustomerAnalysis>) -> StatusBuckets {
    let total = customers.len();
    let mut active = Vec::new();
    let mut at_risk = Vec::new();
    let mut inactive = Vec::new();

    for customer in customers {
        match customer.status {
            CustomerStatus::Active => active.push(customer),
            CustomerStatus::AtRisk => at_risk.push(customer),
            CustomerStatus::Inactive => inactive.push(customer),
        }
    }

    StatusBuckets {
        active: bucket(active),
        at_risk: bucket(at_risk),
        inactive: bucket(inactive),
        total,
    }
}

fn bucket(mut customers: Vec<CustomerAnalysis>) -> StatusBucket {
    customers.sort_by_key(|c| c.days_since_purchase);
    StatusBucket {
        count: customers.len(),
        customers,
    }
}

pub fn counts(buckets: &StatusBuckets) -> StatusCounts {
    StatusCounts {
        active: buckets.active.count,
        at_risk: buckets.at_risk.count,
        inactive: buckets.inactive.count,
        total: buckets.total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d401_customers::analysis::tests::analyzed;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_boundaries() {
        let reference = d(2025, 12, 31);
        let days_ago = |n: i64| Some(reference - chrono::Duration::days(n));

        assert_eq!(classify(days_ago(0), reference).0, CustomerStatus::Active);
        assert_eq!(classify(days_ago(90), reference).0, CustomerStatus::Active);
        assert_eq!(classify(days_ago(91), reference).0, CustomerStatus::AtRisk);
        assert_eq!(classify(days_ago(180), reference).0, CustomerStatus::AtRisk);
        assert_eq!(classify(days_ago(181), reference).0, CustomerStatus::Inactive);
        assert_eq!(
            classify(None, reference),
            (CustomerStatus::Inactive, NEVER_PURCHASED_DAYS)
        );
    }

    #[test]
    fn test_future_purchase_is_active() {
        let (status, days) = classify(Some(d(2026, 1, 10)), d(2025, 12, 31));
        assert_eq!(status, CustomerStatus::Active);
        assert_eq!(days, -10);
    }

    #[test]
    fn test_partition_is_total() {
        let reference = d(2025, 6, 30);
        let customers = vec![
            analyzed(1, Some(d(2025, 6, 1)), 0.0, reference),
            analyzed(2, Some(d(2024, 1, 1)), 0.0, reference),
            analyzed(3, None, 0.0, reference),
            analyzed(4, Some(d(2025, 2, 1)), 0.0, reference),
            analyzed(5, Some(d(2025, 6, 20)), 0.0, reference),
        ];
        let buckets = partition(customers);

        assert_eq!(buckets.total, 5);
        assert_eq!(
            buckets.active.count + buckets.at_risk.count + buckets.inactive.count,
            buckets.total
        );
        assert_eq!(buckets.active.count, 2);
        assert_eq!(buckets.at_risk.count, 1);
        assert_eq!(buckets.inactive.count, 2);
        // most recent first within a bucket
        assert_eq!(buckets.active.customers[0].code, 5);
        assert_eq!(buckets.inactive.customers[1].code, 3);
    }
}
