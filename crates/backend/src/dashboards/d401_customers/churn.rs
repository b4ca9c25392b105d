use chrono::NaiveDate;
use contracts::dashboards::d401_customers::{
    ChurnAnalysis, ChurnBucket, ChurnEntry, CustomerAnalysis,
};
use contracts::domain::a002_customer::aggregate::Situation;

use super::classification::{ACTIVE_MAX_DAYS, AT_RISK_MAX_DAYS};
use crate::shared::dates::days_between;

/// Active customers that stopped buying.
///
/// Customers flagged inactive in the master, without a last purchase, or with
/// a last purchase after `reference` are left out. The rest fall into
/// `at_risk` (91 to 180 days) or `churned` (more than 180 days), most overdue
/// first.
pub fn churn_analysis(customers: &[CustomerAnalysis], reference: NaiveDate) -> ChurnAnalysis {
    let mut at_risk: Vec<ChurnEntry> = Vec::new();
    let mut churned: Vec<ChurnEntry> = Vec::new();

    for customer in customers {
        if customer.situation == Situation::Inactive {
            continue;
        }
        let Some(last_purchase) = customer.last_purchase else {
            continue;
        };
        if last_purchase > reference {
            continue;
        }

        let days = days_between(last_purchase, reference);
        let entry = ChurnEntry {
            customer: customer.clone(),
            days_since_purchase: days,
            last_purchase,
        };
        if days > AT_RISK_MAX_DAYS {
            churned.push(entry);
        } else if days > ACTIVE_MAX_DAYS {
            at_risk.push(entry);
        }
    }

    ChurnAnalysis {
        at_risk: churn_bucket(at_risk),
        churned: churn_bucket(churned),
    }
}

fn churn_bucket(mut entries: Vec<ChurnEntry>) -> ChurnBucket {
    entries.sort_by(|a, b| b.days_since_purchase.cmp(&a.days_since_purchase));
    ChurnBucket {
        count: entries.len(),
        revenue_at_risk: entries.iter().map(|e| e.customer.gross_revenue).sum(),
        customers: entries,
    }
}
