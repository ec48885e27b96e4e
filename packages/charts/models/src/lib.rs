#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart definition, dataset and render payload types.
//!
//! A [`ChartDefinition`] is deserialized from TOML and says which API
//! dataset a chart reads, which fields it groups and sums, and how it is
//! labelled. A [`DatasetBundle`] holds the API response for one view, and
//! a [`ChartPayload`] is what a chart hands to the renderer and to export.

use std::collections::BTreeMap;

use justice_metrics_models::{DataPoint, MetricMode, ModeLabels, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// A chart, deserialized from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDefinition {
    /// Unique chart identifier (e.g. `"revocations_by_district"`).
    pub id: String,
    /// Heading shown above the chart.
    pub title: String,
    /// Which kind of chart this is and how it reads its data.
    pub kind: ChartKind,
}

impl ChartDefinition {
    /// Returns `true` if the chart offers the count/rate toggle.
    #[must_use]
    pub const fn supports_mode_toggle(&self) -> bool {
        matches!(
            &self.kind,
            ChartKind::CategoryBreakdown(BreakdownDefinition {
                denominator: Some(_),
                ..
            })
        )
    }

    /// Keys of every dataset the chart reads.
    #[must_use]
    pub fn dataset_keys(&self) -> Vec<&str> {
        match &self.kind {
            ChartKind::CategoryBreakdown(def) => std::iter::once(def.dataset.as_str())
                .chain(def.denominator.as_ref().map(|d| d.dataset.as_str()))
                .collect(),
            ChartKind::RateMatrix(def) => vec![def.dataset.as_str()],
            ChartKind::CountsOverTime(def) => vec![def.dataset.as_str()],
        }
    }
}

/// The three chart layouts a dashboard uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    /// One bar per category, sorted by count or rate.
    CategoryBreakdown(BreakdownDefinition),
    /// Grouped bars of rates: one dataset per group, one bar per column
    /// plus an overall bar.
    RateMatrix(RateMatrixDefinition),
    /// A line of counts per period, in the order periods first appear.
    CountsOverTime(OverTimeDefinition),
}

/// How a category breakdown reads its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownDefinition {
    /// Dataset key of the numerator rows.
    pub dataset: String,
    /// Field to group by.
    pub category_field: String,
    /// Field to sum.
    pub measure_field: String,
    /// Population to divide by in rate mode. Without it the chart is
    /// count-only.
    pub denominator: Option<DenominatorDefinition>,
    /// X axis title.
    pub x_axis_label: String,
    /// Y axis title per mode.
    pub y_axis_label: ModeLabels,
    /// Dataset (legend/tooltip) label per mode.
    pub dataset_label: ModeLabels,
}

/// Denominator of a breakdown's rate mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominatorDefinition {
    /// Dataset key of the denominator rows.
    pub dataset: String,
    /// Field to sum.
    pub measure_field: String,
}

/// How a rate matrix reads its data.
///
/// Both numerator and denominator come from the same rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateMatrixDefinition {
    /// Dataset key.
    pub dataset: String,
    /// Field identifying the group (one dataset per group), e.g. `race`.
    pub group_field: String,
    /// Field identifying the column within a group, e.g. `risk_level`.
    pub column_field: String,
    /// Field summed as the numerator.
    pub numerator_field: String,
    /// Field summed as the denominator.
    pub denominator_field: String,
    /// Label of the leading all-columns bar.
    #[serde(default = "default_overall_label")]
    pub overall_label: String,
    /// Columns in display order.
    pub columns: Vec<LabeledValue>,
    /// Groups in display order.
    pub groups: Vec<GroupDefinition>,
    /// X axis title.
    pub x_axis_label: String,
    /// Y axis title.
    pub y_axis_label: String,
}

fn default_overall_label() -> String {
    "Overall".to_string()
}

/// A raw data value and its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledValue {
    /// Value as it appears in the rows (e.g. `"VERY_HIGH"`).
    pub value: String,
    /// Display label (e.g. `"Very High Risk"`).
    pub label: String,
}

/// One group of a rate matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    /// Value as it appears in the rows.
    pub value: String,
    /// Legend label.
    pub label: String,
    /// Bar color.
    pub color: String,
}

/// How a counts-over-time line reads its data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverTimeDefinition {
    /// Dataset key.
    pub dataset: String,
    /// Field holding the period label (e.g. `"2019-04"`).
    pub period_field: String,
    /// Field to sum per period.
    pub measure_field: String,
    /// Legend label.
    pub dataset_label: String,
    /// Y axis title.
    pub y_axis_label: String,
    /// Optional horizontal goal line.
    pub goal: Option<u64>,
}

/// Colors shared by every chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Bar color of the selected category.
    pub highlight: String,
    /// Bar color of every other category.
    pub base: String,
    /// Line color of time series.
    pub line: String,
    /// Point color of time series.
    pub point: String,
    /// Goal line color.
    pub goal: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            highlight: "#03a9f4".to_string(),
            base: "#ff9800".to_string(),
            line: "#9e9e9e".to_string(),
            point: "#616161".to_string(),
            goal: "red".to_string(),
        }
    }
}

/// Renderer chart type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartType {
    /// Bar chart.
    Bar,
    /// Line chart.
    Line,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPayload {
    /// Chart identifier.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Metric period subtitle.
    pub subtitle: String,
    /// Active toggle mode, for charts that have one.
    pub mode: Option<MetricMode>,
    /// Renderer chart type.
    pub chart_type: ChartType,
    /// X axis labels.
    pub labels: Vec<String>,
    /// One or more datasets parallel to `labels`.
    pub datasets: Vec<DatasetPayload>,
    /// X axis title.
    pub x_axis_label: Option<String>,
    /// Y axis title.
    pub y_axis_label: String,
    /// Horizontal goal line.
    pub goal: Option<GoalLine>,
}

/// One dataset of a chart. All vectors are parallel to the chart labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetPayload {
    /// Legend label.
    pub label: String,
    /// Values.
    pub data: Vec<DataPoint>,
    /// Color per value.
    pub colors: Vec<String>,
    /// Stroke color of a line dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    /// Tooltip text per value.
    pub tooltips: Vec<String>,
}

/// A horizontal reference line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalLine {
    /// Y value.
    pub value: u64,
    /// Line color.
    pub color: String,
}

/// Export document formats.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ExportFormat {
    /// Comma-separated values, one row per label.
    Csv,
    /// JSON document.
    Json,
}

/// The API response for one view: dataset key to rows.
///
/// Lenient by construction. Entries that are not arrays become empty
/// datasets and array elements that are not objects are dropped, so a
/// partial response still renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetBundle {
    datasets: BTreeMap<String, Vec<Row>>,
}

impl DatasetBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a dataset.
    pub fn insert(&mut self, key: impl Into<String>, rows: Vec<Row>) {
        self.datasets.insert(key.into(), rows);
    }

    /// Builds a bundle from a parsed JSON response.
    ///
    /// A top-level value that is not an object gives an empty bundle.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = value else {
            log::warn!("Dataset response is not a JSON object, treating it as empty");
            return Self::default();
        };

        let datasets = map
            .into_iter()
            .map(|(key, value)| {
                let rows = match value {
                    Value::Array(items) => items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(fields) => Some(Row::from(fields)),
                            _ => None,
                        })
                        .collect(),
                    _ => {
                        log::warn!("Dataset '{key}' is not an array, treating it as empty");
                        Vec::new()
                    }
                };
                (key, rows)
            })
            .collect();

        Self { datasets }
    }

    /// Parses a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json).map(Self::from_value)
    }

    /// Rows of `key`, or an empty slice if the dataset is absent.
    #[must_use]
    pub fn rows(&self, key: &str) -> &[Row] {
        self.datasets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.datasets.contains_key(key)
    }

    /// Dataset keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_is_lenient() {
        let bundle = DatasetBundle::from_json_str(
            r#"{
                "revocations": [{"district": "A", "population_count": "3"}, 7, null],
                "broken": {"district": "A"}
            }"#,
        )
        .unwrap();

        assert_eq!(bundle.rows("revocations").len(), 1);
        assert!(bundle.contains("broken"));
        assert!(bundle.rows("broken").is_empty());
        assert!(bundle.rows("missing").is_empty());
        assert_eq!(bundle.keys().collect::<Vec<_>>(), vec!["broken", "revocations"]);
    }

    #[test]
    fn non_object_response_is_empty() {
        let bundle = DatasetBundle::from_json_str("[1, 2]").unwrap();
        assert_eq!(bundle, DatasetBundle::new());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(DatasetBundle::from_json_str("{").is_err());
    }

    #[test]
    fn parses_breakdown_definition() {
        let def: ChartDefinition = toml::from_str(
            r#"
            id = "by_district"
            title = "By district"

            [kind]
            type = "category_breakdown"
            dataset = "revocations_by_district"
            category_field = "district"
            measure_field = "population_count"
            x_axis_label = "District"
            y_axis_label = { counts = "Count", rates = "Rate" }
            dataset_label = { counts = "Revocations", rates = "Revocation rate" }

            [kind.denominator]
            dataset = "supervision_population_by_district"
            measure_field = "total_population"
            "#,
        )
        .unwrap();

        assert!(def.supports_mode_toggle());
        assert_eq!(
            def.dataset_keys(),
            vec!["revocations_by_district", "supervision_population_by_district"]
        );
    }

    #[test]
    fn parses_matrix_with_default_overall_label() {
        let def: ChartDefinition = toml::from_str(
            r##"
            id = "matrix"
            title = "Matrix"

            [kind]
            type = "rate_matrix"
            dataset = "rows"
            group_field = "race"
            column_field = "risk_level"
            numerator_field = "population_count"
            denominator_field = "total_supervision_count"
            x_axis_label = "Race"
            y_axis_label = "Rate"
            columns = [{ value = "LOW", label = "Low Risk" }]
            groups = [{ value = "WHITE", label = "Caucasian", color = "#000" }]
            "##,
        )
        .unwrap();

        let ChartKind::RateMatrix(matrix) = &def.kind else {
            panic!("expected rate matrix");
        };
        assert_eq!(matrix.overall_label, "Overall");
        assert!(!def.supports_mode_toggle());
    }

    #[test]
    fn palette_fills_missing_fields() {
        let palette: Palette = toml::from_str(r##"highlight = "#123456""##).unwrap();
        assert_eq!(palette.highlight, "#123456");
        assert_eq!(palette.base, Palette::default().base);
    }

    #[test]
    fn export_format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
