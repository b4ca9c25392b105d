use std::collections::{HashMap, HashSet};

use contracts::shared::aggregates::KeyedVariance;

use crate::shared::aggregation::Group;

/// Percentage change from `previous` to `current`.
///
/// A key that did not exist before (`previous <= 0`) counts as +100% when it
/// has revenue now; two empty sides are 0%.
pub fn variance(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Per-key variance over the union of keys of two snapshots.
///
/// Keys of `current` come first in their order, then keys only present in
/// `previous`. A side without the key counts as 0.
pub fn keyed_variance(current: &[(String, f64)], previous: &[(String, f64)]) -> Vec<KeyedVariance> {
    let previous_by_key: HashMap<&str, f64> =
        previous.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    let current_keys: HashSet<&str> = current.iter().map(|(k, _)| k.as_str()).collect();

    let mut result: Vec<KeyedVariance> = current
        .iter()
        .map(|(key, cur)| {
            let prev = previous_by_key.get(key.as_str()).copied().unwrap_or(0.0);
            KeyedVariance {
                key: key.clone(),
                current: *cur,
                previous: prev,
                variance: variance(*cur, prev),
            }
        })
        .collect();

    result.extend(
        previous
            .iter()
            .filter(|(k, _)| !current_keys.contains(k.as_str()))
            .map(|(key, prev)| KeyedVariance {
                key: key.clone(),
                current: 0.0,
                previous: *prev,
                variance: variance(0.0, *prev),
            }),
    );

    result
}

/// `(key, gross revenue)` pairs of aggregated groups
pub fn gross_by_key(groups: &[Group]) -> Vec<(String, f64)> {
    groups
        .iter()
        .map(|g| (g.key.clone(), g.acc.gross_revenue))
        .collect()
}
