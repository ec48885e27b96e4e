#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart data pipeline for justice metrics.
//!
//! Turns flat API rows into chart-ready series in four pure steps:
//!
//! 1. [`aggregate`] groups rows by a category and sums a measure.
//! 2. [`rate`] divides a numerator aggregate by a denominator aggregate.
//! 3. [`sort`] orders the result by descending value.
//! 4. [`highlight`] marks the currently selected category.
//!
//! [`pipeline`] chains them for a count/rate breakdown chart and
//! [`labels`] builds the text that goes around a chart.
//!
//! None of these functions can fail. Malformed or missing measures count
//! as zero so a dashboard always renders, if possibly undercounted.

pub mod aggregate;
pub mod highlight;
pub mod labels;
pub mod pipeline;
pub mod rate;
pub mod sort;
