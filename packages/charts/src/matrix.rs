//! Grouped rate bars (e.g. revocation rates by race and risk level).
//!
//! Every group gets its own dataset. Its first bar is the group's overall
//! rate, followed by one bar per configured column. Groups and columns
//! always render in their configured order, even when a value has no rows.

use justice_metrics::{
    aggregate::{aggregate_with, category_of, coerce_count, matches_all},
    labels::nested_rate_tooltip,
    rate::rate_point,
};
use justice_metrics_charts_models::{ChartType, DatasetBundle, DatasetPayload, RateMatrixDefinition};
use justice_metrics_models::{DataPoint, RatePoint, Row};

use crate::view::ChartBody;

pub(crate) fn build(
    def: &RateMatrixDefinition,
    bundle: &DatasetBundle,
    sentinel: Option<&str>,
) -> ChartBody {
    let rows = bundle.rows(&def.dataset);

    let labels = std::iter::once(def.overall_label.clone())
        .chain(def.columns.iter().map(|c| c.label.clone()))
        .collect();

    let datasets = def
        .groups
        .iter()
        .map(|group| {
            let points = group_points(def, rows, &group.value, sentinel);
            DatasetPayload {
                label: group.label.clone(),
                tooltips: points
                    .iter()
                    .map(|p| nested_rate_tooltip(&group.label, p))
                    .collect(),
                colors: vec![group.color.clone(); points.len()],
                border_color: None,
                data: points.into_iter().map(DataPoint::Rate).collect(),
            }
        })
        .collect();

    ChartBody {
        chart_type: ChartType::Bar,
        labels,
        datasets,
        x_axis_label: Some(def.x_axis_label.clone()),
        y_axis_label: def.y_axis_label.clone(),
        goal: None,
    }
}

/// Overall rate of `group` followed by one rate per column.
fn group_points(
    def: &RateMatrixDefinition,
    rows: &[Row],
    group: &str,
    sentinel: Option<&str>,
) -> Vec<RatePoint> {
    let filter = [(def.group_field.as_str(), group)];
    let numerators = aggregate_with(rows, &def.column_field, &def.numerator_field, sentinel, &filter);
    let denominators =
        aggregate_with(rows, &def.column_field, &def.denominator_field, sentinel, &filter);

    let overall = rate_point(
        Some(group_total(rows, def, &filter, &def.numerator_field, sentinel)),
        Some(group_total(rows, def, &filter, &def.denominator_field, sentinel)),
    );

    std::iter::once(overall)
        .chain(def.columns.iter().map(|column| {
            rate_point(
                numerators.get(&column.value),
                denominators.get(&column.value),
            )
        }))
        .collect()
}

/// Sum of `measure_field` over every row of the group, whatever its
/// column value. Pre-aggregated sentinel column rows are skipped so they
/// are not counted on top of their constituents.
fn group_total(
    rows: &[Row],
    def: &RateMatrixDefinition,
    filter: &[(&str, &str)],
    measure_field: &str,
    sentinel: Option<&str>,
) -> u64 {
    rows.iter()
        .filter(|row| matches_all(row, filter))
        .filter(|row| {
            sentinel.is_none_or(|s| category_of(row, &def.column_field).is_none_or(|c| c != s))
        })
        .fold(0_u64, |acc, row| {
            acc.saturating_add(coerce_count(row.get(measure_field)))
        })
}

#[cfg(test)]
mod tests {
    use justice_metrics_charts_models::{GroupDefinition, LabeledValue};

    use super::*;

    fn definition() -> RateMatrixDefinition {
        RateMatrixDefinition {
            dataset: "revocations".to_string(),
            group_field: "race".to_string(),
            column_field: "risk_level".to_string(),
            numerator_field: "population_count".to_string(),
            denominator_field: "total_supervision_count".to_string(),
            overall_label: "Overall".to_string(),
            columns: vec![
                LabeledValue {
                    value: "LOW".to_string(),
                    label: "Low Risk".to_string(),
                },
                LabeledValue {
                    value: "HIGH".to_string(),
                    label: "High Risk".to_string(),
                },
            ],
            groups: vec![
                GroupDefinition {
                    value: "WHITE".to_string(),
                    label: "Caucasian".to_string(),
                    color: "#039be5".to_string(),
                },
                GroupDefinition {
                    value: "ASIAN".to_string(),
                    label: "Asian".to_string(),
                    color: "#4fc3f7".to_string(),
                },
            ],
            x_axis_label: "Race/ethnicity and risk level".to_string(),
            y_axis_label: "Revocation rate".to_string(),
        }
    }

    fn row(race: &str, risk: &str, revoked: &str, supervised: &str) -> Row {
        [
            ("race", race),
            ("risk_level", risk),
            ("population_count", revoked),
            ("total_supervision_count", supervised),
        ]
        .into_iter()
        .collect()
    }

    fn bundle() -> DatasetBundle {
        let mut bundle = DatasetBundle::new();
        bundle.insert(
            "revocations",
            vec![
                row("WHITE", "LOW", "1", "8"),
                row("WHITE", "HIGH", "3", "12"),
                row("WHITE", "MEDIUM", "1", "20"),
                row("WHITE", "ALL", "5", "40"),
                row("BLACK", "LOW", "5", "10"),
            ],
        );
        bundle
    }

    #[test]
    fn builds_one_dataset_per_group() {
        let body = build(&definition(), &bundle(), Some("ALL"));

        assert_eq!(body.labels, ["Overall", "Low Risk", "High Risk"]);
        assert_eq!(body.datasets.len(), 2);

        let white = &body.datasets[0];
        let rendered: Vec<String> = white.data.iter().map(ToString::to_string).collect();
        // overall 5/40, low 1/8, high 3/12
        assert_eq!(rendered, ["12.50", "12.50", "25.00"]);
        assert_eq!(white.tooltips[0], "Caucasian: 12.50% (5/40)");
        assert_eq!(white.colors, ["#039be5", "#039be5", "#039be5"]);
    }

    #[test]
    fn group_without_rows_is_zero_guarded() {
        let body = build(&definition(), &bundle(), Some("ALL"));

        let asian = &body.datasets[1];
        let rendered: Vec<String> = asian.data.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["0.00", "0.00", "0.00"]);
        assert_eq!(asian.tooltips[1], "Asian: 0.00% (0/0)");
    }

    #[test]
    fn empty_bundle_keeps_layout() {
        let body = build(&definition(), &DatasetBundle::new(), Some("ALL"));
        assert_eq!(body.labels.len(), 3);
        assert!(body.datasets.iter().all(|d| d.data.len() == 3));
    }
}
