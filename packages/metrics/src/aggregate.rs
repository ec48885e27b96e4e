//! Grouping rows into per-category sums.

use std::borrow::Cow;

use justice_metrics_models::{ALL_SENTINEL, Aggregate, Row};
use serde_json::Value;

/// Coerces a measure value to a non-negative count.
///
/// Never fails: anything that does not start with a non-negative integer
/// contributes `0`.
///
/// * numbers are truncated toward zero
/// * strings parse their leading digits after trimming (`"12abc"` is 12,
///   `"10.7"` is 10, `"abc"` is 0)
/// * negatives, null, booleans, arrays, objects and missing values are 0
#[must_use]
pub fn coerce_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f > 0.0)
                // Float-to-int casts saturate, which is what we want here.
                .map_or(0, |f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let truncated = f.trunc() as u64;
                    truncated
                })
        }),
        Some(Value::String(s)) => leading_integer(s),
        _ => 0,
    }
}

fn leading_integer(s: &str) -> u64 {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(s.len(), |(i, _)| i);
    let digits = &s[..end];

    if digits.is_empty() {
        return 0;
    }

    // Only digits remain, so the sole failure mode is overflow.
    digits.parse::<u64>().unwrap_or(u64::MAX)
}

/// Returns the category value of `row` under `field` as text.
///
/// Strings are returned as-is and other scalars as text. Floats with no
/// fractional part read as integers (`7.0` is `"7"`), so a numeric
/// category groups the same however the API encoded it. Missing, null and
/// structured values cannot name a category and return `None`.
#[must_use]
pub fn category_of<'a>(row: &'a Row, field: &str) -> Option<Cow<'a, str>> {
    match row.get(field)? {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        })),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Returns `true` if every `(field, value)` filter matches `row` exactly.
#[must_use]
pub fn matches_all(row: &Row, filters: &[(&str, &str)]) -> bool {
    filters
        .iter()
        .all(|(field, expected)| category_of(row, field).is_some_and(|v| v == *expected))
}

/// Sums `measure_field` per `category_field`, dropping the
/// [`ALL_SENTINEL`] total row.
///
/// # Example
///
/// ```rust
/// use justice_metrics::aggregate::aggregate;
/// use justice_metrics_models::Row;
///
/// let rows: Vec<Row> = vec![
///     [("district", "A"), ("population_count", "10")].into_iter().collect(),
///     [("district", "ALL"), ("population_count", "10")].into_iter().collect(),
/// ];
/// let by_district = aggregate(&rows, "district", "population_count");
/// assert_eq!(by_district.get("A"), Some(10));
/// assert!(!by_district.contains_key("ALL"));
/// ```
#[must_use]
pub fn aggregate(rows: &[Row], category_field: &str, measure_field: &str) -> Aggregate {
    aggregate_with(rows, category_field, measure_field, Some(ALL_SENTINEL), &[])
}

/// Like [`aggregate`], but only over rows matching every filter.
#[must_use]
pub fn aggregate_where(
    rows: &[Row],
    category_field: &str,
    measure_field: &str,
    filters: &[(&str, &str)],
) -> Aggregate {
    aggregate_with(
        rows,
        category_field,
        measure_field,
        Some(ALL_SENTINEL),
        filters,
    )
}

/// General form of [`aggregate`].
///
/// `sentinel` names a category to drop from the output (`None` keeps
/// every category). Rows without a usable category are skipped. The input
/// is never modified.
#[must_use]
pub fn aggregate_with(
    rows: &[Row],
    category_field: &str,
    measure_field: &str,
    sentinel: Option<&str>,
    filters: &[(&str, &str)],
) -> Aggregate {
    let mut result = Aggregate::new();
    let mut skipped = 0_usize;

    for row in rows.iter().filter(|row| matches_all(row, filters)) {
        let Some(category) = category_of(row, category_field) else {
            skipped += 1;
            continue;
        };
        result.add(&category, coerce_count(row.get(measure_field)));
    }

    if skipped > 0 {
        log::trace!("aggregate: skipped {skipped} row(s) without a '{category_field}' value");
    }

    if let Some(sentinel) = sentinel
        && let Some(total) = result.remove(sentinel)
    {
        log::trace!("aggregate: excluded '{sentinel}' row(s) totalling {total}");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn coerces_numeric_strings() {
        assert_eq!(coerce_count(Some(&Value::from("10"))), 10);
        assert_eq!(coerce_count(Some(&Value::from(" 42 "))), 42);
        assert_eq!(coerce_count(Some(&Value::from("+7"))), 7);
        assert_eq!(coerce_count(Some(&Value::from("10.7"))), 10);
        assert_eq!(coerce_count(Some(&Value::from("12abc"))), 12);
    }

    #[test]
    fn coerces_malformed_to_zero() {
        assert_eq!(coerce_count(Some(&Value::from("abc"))), 0);
        assert_eq!(coerce_count(Some(&Value::from(""))), 0);
        assert_eq!(coerce_count(Some(&Value::from("-5"))), 0);
        assert_eq!(coerce_count(Some(&Value::Null)), 0);
        assert_eq!(coerce_count(Some(&Value::Bool(true))), 0);
        assert_eq!(coerce_count(Some(&serde_json::json!([1, 2]))), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn coerces_json_numbers() {
        assert_eq!(coerce_count(Some(&Value::from(15))), 15);
        assert_eq!(coerce_count(Some(&Value::from(3.9))), 3);
        assert_eq!(coerce_count(Some(&Value::from(-3))), 0);
        assert_eq!(coerce_count(Some(&Value::from(-3.5))), 0);
    }

    #[test]
    fn coerces_overflow_to_max() {
        let huge = Value::from("99999999999999999999999");
        assert_eq!(coerce_count(Some(&huge)), u64::MAX);
    }

    #[test]
    fn excludes_all_sentinel() {
        let rows = vec![
            row(&[("district", "A".into()), ("population_count", "10".into())]),
            row(&[("district", "B".into()), ("population_count", "5".into())]),
            row(&[("district", "ALL".into()), ("population_count", "15".into())]),
        ];
        let result = aggregate(&rows, "district", "population_count");
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![("A", 10), ("B", 5)]);
    }

    #[test]
    fn sums_repeated_categories() {
        let rows = vec![
            row(&[("district", "A".into()), ("population_count", "10".into())]),
            row(&[("district", "B".into()), ("population_count", "abc".into())]),
            row(&[("district", "A".into()), ("population_count", 4.into())]),
            row(&[("district", "B".into())]),
        ];
        let result = aggregate(&rows, "district", "population_count");
        assert_eq!(result.get("A"), Some(14));
        assert_eq!(result.get("B"), Some(0));
    }

    #[test]
    fn skips_rows_without_category() {
        let rows = vec![
            row(&[("population_count", "10".into())]),
            row(&[("district", Value::Null), ("population_count", "3".into())]),
            row(&[("district", 7.into()), ("population_count", "2".into())]),
        ];
        let result = aggregate(&rows, "district", "population_count");
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![("7", 2)]);
    }

    #[test]
    fn integral_float_categories_match_integers() {
        let rows = vec![
            row(&[("district", 7.into()), ("population_count", "2".into())]),
            row(&[("district", 7.0_f64.into()), ("population_count", "3".into())]),
            row(&[("district", 2.5_f64.into()), ("population_count", "1".into())]),
        ];
        let result = aggregate(&rows, "district", "population_count");
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![("7", 5), ("2.5", 1)]);
    }

    #[test]
    fn filters_rows() {
        let rows = vec![
            row(&[
                ("race", "WHITE".into()),
                ("risk_level", "LOW".into()),
                ("population_count", "2".into()),
            ]),
            row(&[
                ("race", "BLACK".into()),
                ("risk_level", "LOW".into()),
                ("population_count", "3".into()),
            ]),
            row(&[
                ("race", "WHITE".into()),
                ("risk_level", "HIGH".into()),
                ("population_count", "4".into()),
            ]),
        ];
        let result = aggregate_where(&rows, "risk_level", "population_count", &[("race", "WHITE")]);
        assert_eq!(result.iter().collect::<Vec<_>>(), vec![("LOW", 2), ("HIGH", 4)]);
    }

    #[test]
    fn keeps_sentinel_when_disabled() {
        let rows = vec![row(&[("month", "ALL".into()), ("count", "1".into())])];
        let result = aggregate_with(&rows, "month", "count", None, &[]);
        assert_eq!(result.get("ALL"), Some(1));
    }

    #[test]
    fn does_not_mutate_input() {
        let rows = vec![row(&[("district", "ALL".into()), ("population_count", "1".into())])];
        let before = rows.clone();
        let _ = aggregate(&rows, "district", "population_count");
        assert_eq!(rows, before);
    }
}
