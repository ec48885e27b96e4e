//! Dashboard-wide settings loaded from an optional TOML file.

use std::path::Path;

use justice_metrics_charts_models::Palette;
use justice_metrics_models::{ALL_SENTINEL, MetricPeriod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a [`DashboardConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings shared by every chart on a dashboard.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Category value of pre-aggregated total rows, dropped from
    /// breakdowns.
    pub sentinel: String,
    /// Metric period selected when a view opens.
    pub default_period: MetricPeriod,
    /// Chart colors.
    pub palette: Palette,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sentinel: ALL_SENTINEL.to_string(),
            default_period: MetricPeriod::default(),
            palette: Palette::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not a valid config.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::debug!("Loaded dashboard config from {}", path.display());
        Ok(config)
    }
}
