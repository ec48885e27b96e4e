//! A chart together with its transient view state.
//!
//! The view state is the count/rate toggle (initially counts), the
//! selected category and the metric period. Nothing here is persisted:
//! a view is built when a dashboard opens and dropped when it closes.
//! Every state change is followed by a fresh [`ChartView::payload`] call,
//! which re-runs the whole pipeline from the raw rows.

use chrono::NaiveDate;
use justice_metrics::labels::period_subtitle;
use justice_metrics_charts_models::{
    ChartDefinition, ChartKind, ChartPayload, ChartType, DatasetBundle, DatasetPayload, GoalLine,
};
use justice_metrics_models::{MetricMode, MetricPeriod};

use crate::config::DashboardConfig;

/// Renderer-facing part of a payload produced by a chart kind's builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChartBody {
    pub chart_type: ChartType,
    pub labels: Vec<String>,
    pub datasets: Vec<DatasetPayload>,
    pub x_axis_label: Option<String>,
    pub y_axis_label: String,
    pub goal: Option<GoalLine>,
}

/// One chart on a dashboard and its view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartView {
    definition: ChartDefinition,
    mode: MetricMode,
    current: Option<String>,
    period: MetricPeriod,
}

impl ChartView {
    /// Creates a view in count mode with no selected category.
    #[must_use]
    pub fn new(definition: ChartDefinition, period: MetricPeriod) -> Self {
        Self {
            definition,
            mode: MetricMode::Counts,
            current: None,
            period,
        }
    }

    /// The chart definition.
    #[must_use]
    pub const fn definition(&self) -> &ChartDefinition {
        &self.definition
    }

    /// Active toggle mode.
    #[must_use]
    pub const fn mode(&self) -> MetricMode {
        self.mode
    }

    /// Selected category, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Active metric period.
    #[must_use]
    pub const fn period(&self) -> MetricPeriod {
        self.period
    }

    /// Switches the toggle. Returns `true` if the mode changed.
    ///
    /// Charts without a rate mode stay in count mode.
    pub fn set_mode(&mut self, mode: MetricMode) -> bool {
        if mode == MetricMode::Rates && !self.definition.supports_mode_toggle() {
            log::debug!(
                "Chart {} has no rate mode, staying in counts",
                self.definition.id
            );
            return false;
        }
        let changed = self.mode != mode;
        self.mode = mode;
        changed
    }

    /// Switches the toggle from a mode control value (`"counts"` or
    /// `"rates"`). Returns `true` if the mode changed.
    pub fn select_mode(&mut self, control_value: &str) -> bool {
        self.set_mode(MetricMode::from_control_value(control_value))
    }

    /// Selects the category to highlight.
    pub fn set_current(&mut self, current: Option<String>) {
        self.current = current;
    }

    /// Selects the metric period.
    pub const fn set_period(&mut self, period: MetricPeriod) {
        self.period = period;
    }

    /// Builds the render payload from `bundle`.
    ///
    /// Missing datasets produce an empty chart.
    #[must_use]
    pub fn payload(
        &self,
        bundle: &DatasetBundle,
        config: &DashboardConfig,
        today: NaiveDate,
    ) -> ChartPayload {
        let sentinel = Some(config.sentinel.as_str());

        let body = match &self.definition.kind {
            ChartKind::CategoryBreakdown(def) => crate::breakdown::build(
                def,
                bundle,
                self.mode,
                self.current.as_deref(),
                &config.palette,
                sentinel,
            ),
            ChartKind::RateMatrix(def) => crate::matrix::build(def, bundle, sentinel),
            ChartKind::CountsOverTime(def) => crate::over_time::build(def, bundle, &config.palette),
        };

        log::debug!(
            "Built chart {} ({} mode): {} label(s), {} dataset(s)",
            self.definition.id,
            self.mode,
            body.labels.len(),
            body.datasets.len()
        );

        ChartPayload {
            id: self.definition.id.clone(),
            title: self.definition.title.clone(),
            subtitle: period_subtitle(self.period, today),
            mode: self.definition.supports_mode_toggle().then_some(self.mode),
            chart_type: body.chart_type,
            labels: body.labels,
            datasets: body.datasets,
            x_axis_label: body.x_axis_label,
            y_axis_label: body.y_axis_label,
            goal: body.goal,
        }
    }
}
