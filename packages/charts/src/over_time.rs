//! Counts per period as a line.
//!
//! Periods keep the order in which they first appear in the rows; the API
//! already returns them chronologically.

use justice_metrics::{aggregate::aggregate_with, labels::tooltip};
use justice_metrics_charts_models::{
    ChartType, DatasetBundle, DatasetPayload, GoalLine, OverTimeDefinition, Palette,
};
use justice_metrics_models::{DataPoint, Series};

use crate::view::ChartBody;

pub(crate) fn build(
    def: &OverTimeDefinition,
    bundle: &DatasetBundle,
    palette: &Palette,
) -> ChartBody {
    let counts = aggregate_with(
        bundle.rows(&def.dataset),
        &def.period_field,
        &def.measure_field,
        None,
        &[],
    );
    let series: Series<DataPoint> = counts
        .iter()
        .map(|(period, count)| (period, DataPoint::Count(count)))
        .collect();

    let tooltips = series
        .values()
        .iter()
        .map(|point| tooltip(&def.dataset_label, point))
        .collect();
    let colors = vec![palette.point.clone(); series.len()];
    let (labels, data) = series.into_parts();

    ChartBody {
        chart_type: ChartType::Line,
        labels,
        datasets: vec![DatasetPayload {
            label: def.dataset_label.clone(),
            data,
            colors,
            border_color: Some(palette.line.clone()),
            tooltips,
        }],
        x_axis_label: None,
        y_axis_label: def.y_axis_label.clone(),
        goal: def.goal.map(|value| GoalLine {
            value,
            color: palette.goal.clone(),
        }),
    }
}
