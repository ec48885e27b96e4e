//! Category breakdown bars (e.g. revocations by district).

use justice_metrics::{
    labels::tooltip,
    pipeline::{BreakdownInput, Denominator, breakdown},
};
use justice_metrics_charts_models::{
    BreakdownDefinition, ChartType, DatasetBundle, DatasetPayload, Palette,
};
use justice_metrics_models::{Emphasis, MetricMode};

use crate::view::ChartBody;

pub(crate) fn build(
    def: &BreakdownDefinition,
    bundle: &DatasetBundle,
    mode: MetricMode,
    current: Option<&str>,
    palette: &Palette,
    sentinel: Option<&str>,
) -> ChartBody {
    let input = BreakdownInput {
        rows: bundle.rows(&def.dataset),
        category_field: &def.category_field,
        measure_field: &def.measure_field,
        denominator: def.denominator.as_ref().map(|d| Denominator {
            rows: bundle.rows(&d.dataset),
            measure_field: &d.measure_field,
        }),
        sentinel,
    };

    let result = breakdown(&input, mode, current);
    let dataset_label = def.dataset_label.for_mode(mode);

    let colors = result
        .emphasis
        .iter()
        .map(|emphasis| match emphasis {
            Emphasis::Emphasized => palette.highlight.clone(),
            Emphasis::Normal => palette.base.clone(),
        })
        .collect();
    let tooltips = result
        .series
        .values()
        .iter()
        .map(|point| tooltip(dataset_label, point))
        .collect();
    let (labels, data) = result.series.into_parts();

    ChartBody {
        chart_type: ChartType::Bar,
        labels,
        datasets: vec![DatasetPayload {
            label: dataset_label.to_string(),
            data,
            colors,
            border_color: None,
            tooltips,
        }],
        x_axis_label: Some(def.x_axis_label.clone()),
        y_axis_label: def.y_axis_label.for_mode(mode).to_string(),
        goal: None,
    }
}
