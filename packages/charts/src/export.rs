//! Data export of a rendered chart.
//!
//! Exports serialize exactly the payload the chart renders, so a download
//! always matches what is on screen. Image export belongs to the renderer.

use justice_metrics_charts_models::{ChartPayload, ExportFormat};
use justice_metrics_models::DataPoint;
use serde::Serialize;

use crate::ChartError;

/// JSON export document.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    chart_id: &'a str,
    title: &'a str,
    period: &'a str,
    labels: &'a [String],
    datasets: Vec<ExportDataset<'a>>,
}

#[derive(Debug, Serialize)]
struct ExportDataset<'a> {
    label: &'a str,
    data: &'a [DataPoint],
}

/// Serializes `payload` in `format`.
///
/// # Errors
///
/// Returns [`ChartError`] if serialization fails.
pub fn export(payload: &ChartPayload, format: ExportFormat) -> Result<String, ChartError> {
    log::debug!("Exporting chart {} as {format}", payload.id);
    match format {
        ExportFormat::Csv => to_csv(payload),
        ExportFormat::Json => to_json(payload),
    }
}

/// Suggested download file name, e.g. `revocations_by_district.csv`.
#[must_use]
pub fn file_name(payload: &ChartPayload, format: ExportFormat) -> String {
    format!("{}.{format}", payload.id)
}

/// Writes one CSV record per chart label: the label, then each dataset's
/// value for it.
///
/// # Errors
///
/// Returns [`ChartError`] if a record cannot be written.
pub fn to_csv(payload: &ChartPayload) -> Result<String, ChartError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(
        std::iter::once("label").chain(payload.datasets.iter().map(|d| d.label.as_str())),
    )?;

    for (i, label) in payload.labels.iter().enumerate() {
        let values = payload.datasets.iter().map(|dataset| {
            dataset
                .data
                .get(i)
                .map(ToString::to_string)
                .unwrap_or_default()
        });
        writer.write_record(std::iter::once(label.clone()).chain(values))?;
    }

    let bytes = writer.into_inner().map_err(|e| ChartError::Export {
        message: format!("Failed to flush CSV: {e}"),
    })?;

    String::from_utf8(bytes).map_err(|e| ChartError::Export {
        message: format!("CSV is not valid UTF-8: {e}"),
    })
}

/// Writes a pretty-printed JSON document of the chart data.
///
/// # Errors
///
/// Returns [`ChartError::Json`] if serialization fails.
pub fn to_json(payload: &ChartPayload) -> Result<String, ChartError> {
    let document = ExportDocument {
        chart_id: &payload.id,
        title: &payload.title,
        period: &payload.subtitle,
        labels: &payload.labels,
        datasets: payload
            .datasets
            .iter()
            .map(|d| ExportDataset {
                label: &d.label,
                data: &d.data,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}
