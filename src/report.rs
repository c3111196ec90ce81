//! # Report Formatting
//!
//! Pure [`TideReport`] → `String` conversions for stdout: pretty JSON with
//! sorted keys, or a fixed-width text summary.

use crate::{TideError, TideReport};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const JSON_TIME_FORMAT: &str = "%H:%M";
const TEXT_TIME_FORMAT: &str = "%-I:%M %p";

/// Report output mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = TideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            other => Err(TideError::InvalidInput(format!(
                "unknown output format '{other}' (expected json or text)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        })
    }
}

// JSON shapes. Fields are declared in key order so the output is sorted.

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportJson {
    pub date: String,
    #[serde(rename = "highLow")]
    pub high_low: Vec<HighLowJson>,
    pub predictions: Vec<PredictionJson>,
    pub station: StationJson,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct StationJson {
    pub id: String,
    pub name: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionJson {
    pub height: f64,
    pub time: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct HighLowJson {
    pub height: f64,
    pub time: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&TideReport> for ReportJson {
    fn from(report: &TideReport) -> Self {
        ReportJson {
            date: report.date.clone(),
            high_low: report
                .extrema
                .iter()
                .map(|point| HighLowJson {
                    height: point.height,
                    time: point.time.format(JSON_TIME_FORMAT).to_string(),
                    kind: point.kind.as_str().to_string(),
                })
                .collect(),
            predictions: report
                .samples
                .iter()
                .map(|sample| PredictionJson {
                    height: sample.height,
                    time: sample.time.format(JSON_TIME_FORMAT).to_string(),
                })
                .collect(),
            station: StationJson {
                id: report.station_id.clone(),
                name: report.station_name.clone(),
            },
        }
    }
}

/// Format a report in the requested mode.
pub fn format_report(report: &TideReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(report),
        OutputFormat::Text => format_text(report),
    }
}

/// Pretty-printed JSON with sorted keys and `HH:MM` times.
///
/// The output structs hold only strings and floats, which always serialize.
pub fn format_json(report: &TideReport) -> String {
    serde_json::to_string_pretty(&ReportJson::from(report))
        .expect("tide report is always serializable")
}

/// Fixed-width summary: header, extrema table, sample count and height range.
pub fn format_text(report: &TideReport) -> String {
    let mut lines = vec![
        format!(
            "Tide Predictions for {} (Station {})",
            report.station_name, report.station_id
        ),
        format!("Date: {}", report.date),
        String::new(),
        "High/Low Tides:".to_string(),
        format!("  {:<10}  {:<6}  {}", "Time", "Type", "Height (ft)"),
        format!("  {}", "-".repeat(36)),
    ];

    for point in &report.extrema {
        lines.push(format!(
            "  {:<10}  {:<6}  {:.2}",
            point.time.format(TEXT_TIME_FORMAT).to_string(),
            point.kind.word(),
            point.height
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "Total 6-minute predictions: {}",
        report.samples.len()
    ));
    if let Some((min, max)) = report.height_range() {
        lines.push(format!("Range: {min:.2} ft to {max:.2} ft"));
    }

    lines.join("\n")
}
