//! Percentage rates between two aggregates.

use justice_metrics_models::{Aggregate, Rate, RatePoint};

/// Computes `100 * numerator / denominator` to two decimals.
///
/// Rounds half up on the exact quotient. A zero or missing numerator or
/// denominator yields [`Rate::ZERO`] (`"0.00"`) rather than an error,
/// which covers small categories with no population on record.
#[must_use]
pub fn percentage(numerator: Option<u64>, denominator: Option<u64>) -> Rate {
    match (numerator, denominator) {
        (Some(num), Some(den)) if num > 0 && den > 0 => {
            let num = u128::from(num);
            let den = u128::from(den);
            // hundredths = round(10_000 * num / den), half up
            let hundredths = (num * 20_000 + den) / (den * 2);
            Rate::from_hundredths(u64::try_from(hundredths).unwrap_or(u64::MAX))
        }
        _ => Rate::ZERO,
    }
}

/// Builds a [`RatePoint`] from optional counts, treating missing counts
/// as zero.
#[must_use]
pub fn rate_point(numerator: Option<u64>, denominator: Option<u64>) -> RatePoint {
    RatePoint {
        rate: percentage(numerator, denominator),
        numerator: numerator.unwrap_or(0),
        denominator: denominator.unwrap_or(0),
    }
}

/// Computes a rate for every key of `numerator`, in its entry order.
///
/// Keys only present in `denominator` are ignored; keys missing from it
/// get the zero guard.
#[must_use]
pub fn compute_rates(numerator: &Aggregate, denominator: &Aggregate) -> Vec<(String, RatePoint)> {
    numerator
        .iter()
        .map(|(key, count)| (key.to_string(), rate_point(Some(count), denominator.get(key))))
        .collect()
}
