use std::collections::HashMap;

use chrono::NaiveDate;
use contracts::dashboards::d401_customers::CustomerAnalysis;
use contracts::domain::a001_sale::aggregate::SaleRecord;
use contracts::domain::a002_customer::aggregate::CustomerRecord;

use super::classification::classify;
use crate::shared::aggregation::{aggregate_by, Accumulator};

/// Sale totals per customer code
pub fn sales_by_customer<'a, I>(sales: I) -> HashMap<i64, Accumulator>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    aggregate_by(sales, |r| r.customer_code.to_string())
        .into_iter()
        .filter_map(|g| g.key.parse::<i64>().ok().map(|code| (code, g.acc)))
        .collect()
}

/// Merge the customer master with sale totals and classify every customer.
///
/// Customers without sales keep zero revenue. The result is ordered by gross
/// revenue, highest first; ties keep the master order.
pub fn analyze_customers<'a, C>(
    customers: C,
    totals: &HashMap<i64, Accumulator>,
    reference: NaiveDate,
) -> Vec<CustomerAnalysis>
where
    C: IntoIterator<Item = &'a CustomerRecord>,
{
    let empty = Accumulator::default();
    let mut result: Vec<CustomerAnalysis> = customers
        .into_iter()
        .map(|customer| {
            let acc = totals.get(&customer.code).unwrap_or(&empty);
            let (status, days) = classify(customer.last_purchase, reference);
            CustomerAnalysis {
                code: customer.code,
                name: customer.name.clone(),
                gross_revenue: acc.gross_revenue,
                invoice_count: acc.invoice_count(),
                average_ticket: acc.average_ticket(),
                margin: acc.margin,
                margin_percent: acc.margin_percent(),
                activity: customer.activity.clone(),
                region: customer.region.clone(),
                category: customer.category.clone(),
                state: customer.state.clone(),
                city: customer.city.clone(),
                email: customer.email.clone(),
                last_purchase: customer.last_purchase,
                registered_on: customer.registered_on,
                situation: customer.situation,
                status,
                days_since_purchase: days,
            }
        })
        .collect();

    result.sort_by(|a, b| {
        b.gross_revenue
            .partial_cmp(&a.gross_revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use contracts::dashboards::d401_customers::CustomerStatus;
    use contracts::domain::a001_sale::aggregate::Movement;
    use contracts::domain::a002_customer::aggregate::Situation;

    pub(crate) fn customer(code: i64, last_purchase: Option<NaiveDate>) -> CustomerRecord {
        CustomerRecord {
            code,
            name: format!("CLIENTE {}", code),
            last_purchase,
            situation: Situation::Active,
            ..Default::default()
        }
    }

    /// Analyzed customer carrying `revenue` as its gross revenue
    pub(crate) fn analyzed(
        code: i64,
        last_purchase: Option<NaiveDate>,
        revenue: f64,
        reference: NaiveDate,
    ) -> CustomerAnalysis {
        let mut totals = HashMap::new();
        let mut acc = Accumulator::default();
        acc.gross_revenue = revenue;
        totals.insert(code, acc);
        analyze_customers([&customer(code, last_purchase)], &totals, reference)
            .pop()
            .unwrap()
    }

    fn sale(code: i64, invoice: &str, value: f64) -> SaleRecord {
        SaleRecord {
            customer_code: code,
            invoice_id: invoice.to_string(),
            movement: Movement::Sale,
            gross_value: value,
            margin_value: value / 4.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_with_sales() {
        let reference = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let customers = vec![
            customer(1, NaiveDate::from_ymd_opt(2025, 6, 1)),
            customer(2, None),
            customer(3, NaiveDate::from_ymd_opt(2025, 3, 1)),
        ];
        let sales = vec![
            sale(3, "A", 100.0),
            sale(3, "B", 300.0),
            sale(1, "C", 50.0),
            sale(99, "D", 1000.0),
        ];
        let totals = sales_by_customer(&sales);
        let analysis = analyze_customers(&customers, &totals, reference);

        let codes: Vec<i64> = analysis.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec![3, 1, 2]);
        assert_eq!(analysis[0].gross_revenue, 400.0);
        assert_eq!(analysis[0].invoice_count, 2);
        assert_eq!(analysis[0].average_ticket, 200.0);
        assert_eq!(analysis[0].margin_percent, 25.0);
        assert_eq!(analysis[0].status, CustomerStatus::AtRisk);
        assert_eq!(analysis[2].gross_revenue, 0.0);
        assert_eq!(analysis[2].status, CustomerStatus::Inactive);
    }
}
