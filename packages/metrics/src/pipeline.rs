//! The full aggregate → rate → sort → highlight chain for a breakdown
//! chart.

use justice_metrics_models::{DataPoint, Emphasis, MetricMode, Row, Series};

use crate::{aggregate::aggregate_with, highlight::highlight, rate::compute_rates, sort};

/// Inputs of a per-category breakdown.
#[derive(Debug, Clone, Copy)]
pub struct BreakdownInput<'a> {
    /// Numerator rows.
    pub rows: &'a [Row],
    /// Field to group by (e.g. `district`).
    pub category_field: &'a str,
    /// Field summed in count mode and used as the rate numerator.
    pub measure_field: &'a str,
    /// Denominator rows and field for rate mode.
    pub denominator: Option<Denominator<'a>>,
    /// Category value dropped from the breakdown, usually `ALL`.
    pub sentinel: Option<&'a str>,
}

/// Denominator population for rate mode.
#[derive(Debug, Clone, Copy)]
pub struct Denominator<'a> {
    /// Denominator rows, grouped by the same category field.
    pub rows: &'a [Row],
    /// Field summed as the denominator.
    pub measure_field: &'a str,
}

/// A sorted breakdown plus the per-bar emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakdown {
    /// Sorted labels and values.
    pub series: Series<DataPoint>,
    /// Emphasis per label, parallel to the series.
    pub emphasis: Vec<Emphasis>,
}

/// Runs the breakdown pipeline for `mode`.
///
/// In rate mode without a denominator every rate is guarded to `0.00`.
#[must_use]
pub fn breakdown(input: &BreakdownInput<'_>, mode: MetricMode, current: Option<&str>) -> Breakdown {
    let numerator = aggregate_with(
        input.rows,
        input.category_field,
        input.measure_field,
        input.sentinel,
        &[],
    );

    let series = match mode {
        MetricMode::Counts => sort::sort_counts(&numerator).map_values(DataPoint::Count),
        MetricMode::Rates => {
            let denominator = input
                .denominator
                .map(|d| {
                    aggregate_with(
                        d.rows,
                        input.category_field,
                        d.measure_field,
                        input.sentinel,
                        &[],
                    )
                })
                .unwrap_or_default();
            let rates = compute_rates(&numerator, &denominator);
            sort::sort_rates(&rates).map_values(DataPoint::Rate)
        }
    };

    let emphasis = highlight(series.labels(), current);

    Breakdown { series, emphasis }
}

#[cfg(test)]
mod tests {
    use justice_metrics_models::ALL_SENTINEL;

    use super::*;

    fn rows(field: &str, measure: &str, data: &[(&str, &str)]) -> Vec<Row> {
        data.iter()
            .map(|(cat, value)| [(field, *cat), (measure, *value)].into_iter().collect())
            .collect()
    }

    fn revocations() -> Vec<Row> {
        rows(
            "district",
            "population_count",
            &[("A", "10"), ("B", "5"), ("ALL", "15"), ("C", "x")],
        )
    }

    fn supervision() -> Vec<Row> {
        rows(
            "district",
            "total_population",
            &[("A", "200"), ("B", "20"), ("ALL", "220")],
        )
    }

    fn input<'a>(numerator: &'a [Row], denominator: &'a [Row]) -> BreakdownInput<'a> {
        BreakdownInput {
            rows: numerator,
            category_field: "district",
            measure_field: "population_count",
            denominator: Some(Denominator {
                rows: denominator,
                measure_field: "total_population",
            }),
            sentinel: Some(ALL_SENTINEL),
        }
    }

    #[test]
    fn count_mode() {
        let (num, den) = (revocations(), supervision());
        let result = breakdown(&input(&num, &den), MetricMode::Counts, Some("b"));

        assert_eq!(result.series.labels(), ["A", "B", "C"]);
        assert_eq!(
            result.series.values(),
            [DataPoint::Count(10), DataPoint::Count(5), DataPoint::Count(0)]
        );
        assert_eq!(
            result.emphasis,
            vec![Emphasis::Normal, Emphasis::Emphasized, Emphasis::Normal]
        );
    }

    #[test]
    fn rate_mode() {
        let (num, den) = (revocations(), supervision());
        let result = breakdown(&input(&num, &den), MetricMode::Rates, None);

        let rendered: Vec<String> = result.series.values().iter().map(ToString::to_string).collect();
        assert_eq!(result.series.labels(), ["B", "A", "C"]);
        assert_eq!(rendered, ["25.00", "5.00", "0.00"]);
        assert!(result.emphasis.iter().all(|e| *e == Emphasis::Normal));
    }

    #[test]
    fn rate_mode_without_denominator() {
        let num = revocations();
        let input = BreakdownInput {
            denominator: None,
            ..input(&num, &[])
        };
        let result = breakdown(&input, MetricMode::Rates, None);
        assert!(
            result
                .series
                .values()
                .iter()
                .all(|v| v.to_string() == "0.00")
        );
    }

    #[test]
    fn idempotent() {
        let (num, den) = (revocations(), supervision());
        for mode in [MetricMode::Counts, MetricMode::Rates] {
            let first = breakdown(&input(&num, &den), mode, Some("A"));
            let second = breakdown(&input(&num, &den), mode, Some("A"));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn empty_rows_give_empty_breakdown() {
        let result = breakdown(&input(&[], &[]), MetricMode::Rates, Some("A"));
        assert!(result.series.is_empty());
        assert!(result.emphasis.is_empty());
    }
}
