use std::collections::HashMap;

use contracts::dashboards::d401_customers::{FrequencyBucket, PurchaseFrequency};

use crate::shared::aggregation::{ratio_percent, Accumulator};

const BUCKETS: [(&str, usize, usize); 3] = [
    ("1 compra", 1, 1),
    ("2-3 compras", 2, 3),
    ("4+ compras", 4, usize::MAX),
];

/// Distribution of buying customers by distinct invoices in the period
pub fn purchase_frequency(buyers: &HashMap<i64, Accumulator>) -> PurchaseFrequency {
    let mut counts = [0usize; 3];
    let mut buying = 0usize;
    let mut invoices = 0usize;

    for acc in buyers.values() {
        let n = acc.invoice_count();
        if n == 0 {
            continue;
        }
        buying += 1;
        invoices += n;
        if let Some(i) = BUCKETS.iter().position(|(_, lo, hi)| n >= *lo && n <= *hi) {
            counts[i] += 1;
        }
    }

    let buckets = BUCKETS
        .iter()
        .zip(counts)
        .map(|((label, _, _), customers)| FrequencyBucket {
            label: label.to_string(),
            customers,
            percent: ratio_percent(customers as f64, buying as f64),
        })
        .collect();

    PurchaseFrequency {
        buckets,
        mean_repurchase_rate: if buying > 0 {
            invoices as f64 / buying as f64
        } else {
            0.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_invoices(n: usize) -> Accumulator {
        let mut acc = Accumulator::default();
        for i in 0..n {
            acc.invoices.insert(format!("NF{}", i));
        }
        acc
    }

    #[test]
    fn test_buckets() {
        let buyers: HashMap<i64, Accumulator> = [
            (1, with_invoices(1)),
            (2, with_invoices(2)),
            (3, with_invoices(3)),
            (4, with_invoices(6)),
            (5, with_invoices(0)),
        ]
        .into_iter()
        .collect();

        let freq = purchase_frequency(&buyers);
        let counts: Vec<usize> = freq.buckets.iter().map(|b| b.customers).collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert_eq!(freq.buckets[1].percent, 50.0);
        assert_eq!(freq.mean_repurchase_rate, 3.0);
    }

    #[test]
    fn test_no_buyers() {
        let freq = purchase_frequency(&HashMap::new());
        assert_eq!(freq.mean_repurchase_rate, 0.0);
        assert!(freq.buckets.iter().all(|b| b.customers == 0 && b.percent == 0.0));
    }
}
