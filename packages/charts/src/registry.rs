//! Compile-time registry of dashboard charts.
//!
//! Each entry is a `(name, toml_content)` pair embedded via `include_str!`.
//! Adding a chart requires creating a TOML file in `definitions/` and
//! adding a corresponding entry here.

use justice_metrics_charts_models::ChartDefinition;

use crate::ChartError;

/// Number of registered charts. Enforced by a test.
#[cfg(test)]
const EXPECTED_CHART_COUNT: usize = 6;

/// Embedded TOML chart definitions.
const CHART_TOMLS: &[(&str, &str)] = &[
    (
        "revocations_by_district",
        include_str!("../definitions/revocations_by_district.toml"),
    ),
    (
        "revocations_by_race",
        include_str!("../definitions/revocations_by_race.toml"),
    ),
    (
        "reincarceration_count_over_time",
        include_str!("../definitions/reincarceration_count_over_time.toml"),
    ),
    (
        "ftr_referral_count_by_month",
        include_str!("../definitions/ftr_referral_count_by_month.toml"),
    ),
    (
        "ftr_referrals_by_race",
        include_str!("../definitions/ftr_referrals_by_race.toml"),
    ),
    (
        "ftr_referrals_by_gender",
        include_str!("../definitions/ftr_referrals_by_gender.toml"),
    ),
];

/// Returns all registered charts in registry order.
///
/// # Panics
///
/// Panics if any embedded TOML file fails to parse. Since these are
/// compile-time constants, parse failures indicate a development error
/// and are caught by the tests below.
#[must_use]
pub fn all_charts() -> Vec<ChartDefinition> {
    CHART_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            toml::de::from_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse chart definition '{name}': {e}"))
        })
        .collect()
}

/// Looks up a chart by id.
///
/// # Errors
///
/// Returns [`ChartError::UnknownChart`] if no chart has this id.
pub fn find_chart(id: &str) -> Result<ChartDefinition, ChartError> {
    all_charts()
        .into_iter()
        .find(|chart| chart.id == id)
        .ok_or_else(|| ChartError::UnknownChart { id: id.to_string() })
}
