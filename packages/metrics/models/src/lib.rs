#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Core data types for justice metrics charts.
//!
//! Raw API observations arrive as [`Row`]s, are grouped into
//! [`Aggregate`]s, and leave as ordered [`Series`] ready for a chart
//! renderer. The remaining types describe the small amount of transient
//! view state a chart carries: the [`MetricMode`] toggle, the
//! [`MetricPeriod`] window and per-bar [`Emphasis`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap as _};
use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

/// Category value marking a pre-aggregated total row.
///
/// Per-category breakdowns must drop it, otherwise the total is counted
/// alongside its constituents.
pub const ALL_SENTINEL: &str = "ALL";

/// One observation from the metrics API: field name to scalar value.
///
/// Measure fields usually arrive as numeric strings (`"10"`), category
/// fields as plain strings. Nothing is validated at this level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(serde_json::Map<String, Value>);

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value of `field`, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Number of fields in this row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Map<String, Value>> for Row {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Summed measure per category key.
///
/// Entries are kept in first-seen order so that every consumer (sorting,
/// export) sees the same order regardless of how the keys hash. Keys are
/// unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    entries: Vec<(String, u64)>,
    index: BTreeMap<String, usize>,
}

impl Aggregate {
    /// Creates an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `amount` to the running sum for `key`, creating the entry if
    /// needed. Sums saturate at `u64::MAX`.
    pub fn add(&mut self, key: &str, amount: u64) {
        if let Some(&i) = self.index.get(key) {
            let slot = &mut self.entries[i].1;
            *slot = slot.saturating_add(amount);
        } else {
            self.index.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), amount));
        }
    }

    /// Returns the sum for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<u64> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    /// Returns `true` if `key` has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Removes `key`, returning its sum. Remaining entries keep their
    /// relative order.
    pub fn remove(&mut self, key: &str) -> Option<u64> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(key, sum)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: AsRef<str>> FromIterator<(K, u64)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut aggregate = Self::new();
        for (key, value) in iter {
            aggregate.add(key.as_ref(), value);
        }
        aggregate
    }
}

impl Serialize for Aggregate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parallel chart labels and values.
///
/// Only constructible from `(label, value)` pairs, so `labels()[i]` always
/// belongs to `values()[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Series<V> {
    labels: Vec<String>,
    values: Vec<V>,
}

impl<V> Default for Series<V> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<V> Series<V> {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a point.
    pub fn push(&mut self, label: impl Into<String>, value: V) {
        self.labels.push(label.into());
        self.values.push(value);
    }

    /// Category labels in display order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Values, parallel to [`Self::labels`].
    #[must_use]
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if the series has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Transforms every value while keeping the label order.
    #[must_use]
    pub fn map_values<U>(self, f: impl FnMut(V) -> U) -> Series<U> {
        Series {
            labels: self.labels,
            values: self.values.into_iter().map(f).collect(),
        }
    }

    /// Splits the series into its label and value vectors.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<V>) {
        (self.labels, self.values)
    }
}

impl<L: Into<String>, V> FromIterator<(L, V)> for Series<V> {
    fn from_iter<I: IntoIterator<Item = (L, V)>>(iter: I) -> Self {
        let mut series = Self::new();
        for (label, value) in iter {
            series.push(label, value);
        }
        series
    }
}

/// A percentage held as an integer number of hundredths.
///
/// Renders with exactly two decimals (`25.00`), which is also how it
/// serializes, since chart consumers expect a numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rate {
    hundredths: u64,
}

impl Rate {
    /// The guarded rate for missing or zero inputs.
    pub const ZERO: Self = Self { hundredths: 0 };

    /// Creates a rate from hundredths of a percent (`2500` is `25.00`).
    #[must_use]
    pub const fn from_hundredths(hundredths: u64) -> Self {
        Self { hundredths }
    }

    /// Returns the rate in hundredths of a percent.
    #[must_use]
    pub const fn hundredths(self) -> u64 {
        self.hundredths
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

impl Serialize for Rate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A rate together with the raw counts it was computed from, kept for
/// tooltips such as `12.50% (1/8)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePoint {
    /// Computed percentage.
    pub rate: Rate,
    /// Numerator count (0 when missing).
    pub numerator: u64,
    /// Denominator count (0 when missing).
    pub denominator: u64,
}

/// A single chart value in either toggle mode.
///
/// Counts serialize as numbers, rates as two-decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataPoint {
    /// Summed count.
    Count(u64),
    /// Percentage with its numerator and denominator.
    Rate(RatePoint),
}

impl std::fmt::Display for DataPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Count(count) => write!(f, "{count}"),
            Self::Rate(point) => write!(f, "{}", point.rate),
        }
    }
}

impl Serialize for DataPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Count(count) => serializer.serialize_u64(*count),
            Self::Rate(point) => point.rate.serialize(serializer),
        }
    }
}

/// Count-vs-rate toggle carried by a chart as transient view state.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MetricMode {
    /// Raw counts (initial state).
    #[default]
    Counts,
    /// Percentage rates against a denominator population.
    Rates,
}

impl MetricMode {
    /// Interprets the value of a mode control.
    ///
    /// Only a value that lowercases to `counts` selects [`Self::Counts`];
    /// every other value selects [`Self::Rates`].
    #[must_use]
    pub fn from_control_value(value: &str) -> Self {
        if value.to_lowercase() == "counts" {
            Self::Counts
        } else {
            Self::Rates
        }
    }
}

/// A label that differs between the two toggle modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeLabels {
    /// Label shown in count mode.
    pub counts: String,
    /// Label shown in rate mode.
    pub rates: String,
}

impl ModeLabels {
    /// Returns the label for `mode`.
    #[must_use]
    pub fn for_mode(&self, mode: MetricMode) -> &str {
        match mode {
            MetricMode::Counts => &self.counts,
            MetricMode::Rates => &self.rates,
        }
    }
}

/// Trailing window the upstream metrics were computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MetricPeriod {
    /// The current month only.
    OneMonth = 1,
    /// The last 3 months.
    ThreeMonths = 3,
    /// The last 6 months.
    SixMonths = 6,
    /// The last 12 months.
    #[default]
    TwelveMonths = 12,
    /// The last 36 months.
    ThirtySixMonths = 36,
}

impl MetricPeriod {
    /// Number of months in the window.
    #[must_use]
    pub const fn months(self) -> u32 {
        self as u32
    }

    /// Short description of the window, e.g. "Last 6 months".
    #[must_use]
    pub const fn trailing_label(self) -> &'static str {
        match self {
            Self::OneMonth => "Current month",
            Self::ThreeMonths => "Last 3 months",
            Self::SixMonths => "Last 6 months",
            Self::TwelveMonths => "Last 12 months",
            Self::ThirtySixMonths => "Last 3 years",
        }
    }

    /// Returns all variants in ascending order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::OneMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::TwelveMonths,
            Self::ThirtySixMonths,
        ]
    }
}

impl TryFrom<u32> for MetricPeriod {
    type Error = InvalidMetricPeriodError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        match months {
            1 => Ok(Self::OneMonth),
            3 => Ok(Self::ThreeMonths),
            6 => Ok(Self::SixMonths),
            12 => Ok(Self::TwelveMonths),
            36 => Ok(Self::ThirtySixMonths),
            _ => Err(InvalidMetricPeriodError { months }),
        }
    }
}

impl From<MetricPeriod> for u32 {
    fn from(period: MetricPeriod) -> Self {
        period.months()
    }
}

/// Error returned when a month count is not one of the supported windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidMetricPeriodError {
    /// The rejected month count.
    pub months: u32,
}

impl std::fmt::Display for InvalidMetricPeriodError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid metric period {} months: expected 1, 3, 6, 12 or 36",
            self.months
        )
    }
}

impl std::error::Error for InvalidMetricPeriodError {}

/// Visual weight of a single bar.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Emphasis {
    /// The currently selected category.
    Emphasized,
    /// Every other category.
    Normal,
}
