#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard charts for justice metrics.
//!
//! Charts are defined as TOML files embedded at compile time (see
//! [`registry`]). A [`view::ChartView`] pairs a definition with its
//! transient view state (count/rate toggle, selected category, metric
//! period) and rebuilds a [`ChartPayload`] from a view's datasets on
//! demand. [`export`] serializes the same payload for download.
//!
//! [`ChartPayload`]: justice_metrics_charts_models::ChartPayload

mod breakdown;
pub mod config;
pub mod export;
mod matrix;
mod over_time;
pub mod registry;
pub mod view;

use thiserror::Error;

/// Errors that can occur outside the (infallible) chart pipeline.
#[derive(Debug, Error)]
pub enum ChartError {
    /// No chart with this id is registered.
    #[error("Unknown chart: {id}")]
    UnknownChart {
        /// The requested chart id.
        id: String,
    },

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Reading input failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An export document could not be produced.
    #[error("Export error: {message}")]
    Export {
        /// Description of what went wrong.
        message: String,
    },
}
