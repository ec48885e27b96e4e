//! Ordering aggregates into chart series.
//!
//! Entries are always materialized into a list before sorting so the
//! result only depends on the input order, never on map iteration order.

use justice_metrics_models::{Aggregate, RatePoint, Series};

/// Sorts `(label, value)` entries by descending `key`, keeping the input
/// order among equal keys.
#[must_use]
pub fn sort_descending_by<V, K: Ord>(
    entries: impl IntoIterator<Item = (String, V)>,
    key: impl Fn(&V) -> K,
) -> Series<V> {
    let mut entries: Vec<(String, V)> = entries.into_iter().collect();
    // `sort_by` is stable.
    entries.sort_by(|a, b| key(&b.1).cmp(&key(&a.1)));
    entries.into_iter().collect()
}

/// Sorts an aggregate by descending count.
#[must_use]
pub fn sort_counts(aggregate: &Aggregate) -> Series<u64> {
    sort_descending_by(
        aggregate.iter().map(|(k, v)| (k.to_string(), v)),
        |v| *v,
    )
}

/// Sorts rates by descending percentage.
#[must_use]
pub fn sort_rates(rates: &[(String, RatePoint)]) -> Series<RatePoint> {
    sort_descending_by(rates.iter().cloned(), |p| p.rate)
}
