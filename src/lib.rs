//! # Tide Chart Core Library
//!
//! This library turns raw tide-prediction time series into a text or JSON report
//! and a rendered PNG chart. Everything in here is synchronous and deterministic
//! apart from the final chart file write and the concurrent provider join in
//! [`tide_data::fetch_report`].
//!
//! ## Data Flow
//! 1. **Locate**: pick the nearest [`Station`] to a coordinate ([`stations`])
//! 2. **Fetch**: predictions and hi/lo extrema arrive from a [`tide_data::TideProvider`]
//! 3. **Parse**: malformed records are dropped one by one, the rest become a [`TideReport`]
//! 4. **Output**: [`report`] formats text/JSON, [`renderer`] draws the chart
//!
//! ## Core Types
//! - [`Station`]: a prediction station as listed by the data provider
//! - [`TideSample`]: one 6-minute prediction point
//! - [`ExtremumPoint`]: a high or low water event
//! - [`TideReport`]: one station, one day, both series

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

// Module declarations
pub mod canvas;
pub mod config;
pub mod logging;
pub mod renderer;
pub mod report;
pub mod stations;
pub mod theme;
pub mod tide_data;

pub use tide_data::TideError;

/// A tide prediction station.
///
/// Deserializes straight from the provider's station-list entries
/// (`{id, name, lat, lng, state?}`).
///
/// # Example
/// ```
/// use tide_chart_lib::Station;
///
/// let json = r#"{"id":"8418150","name":"Portland","lat":43.658,"lng":-70.244,"state":"ME"}"#;
/// let station: Station = serde_json::from_str(json).unwrap();
/// assert_eq!(station.id, "8418150");
/// assert_eq!(station.region.as_deref(), Some("ME"));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Region code (US state for NOAA stations)
    #[serde(rename = "state", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// A single tide prediction.
///
/// Timestamps are naive local wall-clock times exactly as the provider
/// reports them; no time zone conversion ever happens.
///
/// # Example
/// ```
/// use chrono::NaiveDateTime;
/// use tide_chart_lib::TideSample;
///
/// let time = NaiveDateTime::parse_from_str("2026-02-24 06:30", "%Y-%m-%d %H:%M").unwrap();
/// let sample = TideSample { time, height: 4.2 };
/// assert_eq!(sample.minutes_of_day(), 390.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideSample {
    /// Local wall-clock time of the prediction
    pub time: NaiveDateTime,
    /// Height in feet above MLLW
    pub height: f64,
}

impl TideSample {
    /// Minutes since local midnight; date and seconds are ignored.
    pub fn minutes_of_day(&self) -> f64 {
        minutes_of_day(&self.time)
    }
}

/// High or low water.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtremumKind {
    High,
    Low,
}

impl ExtremumKind {
    /// Map the provider's type code (`"H"` / `"L"`). Anything else is `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "H" => Some(ExtremumKind::High),
            "L" => Some(ExtremumKind::Low),
            _ => None,
        }
    }

    /// Single letter used on chart labels
    pub fn code(self) -> &'static str {
        match self {
            ExtremumKind::High => "H",
            ExtremumKind::Low => "L",
        }
    }

    /// Lowercase name used in JSON output
    pub fn as_str(self) -> &'static str {
        match self {
            ExtremumKind::High => "high",
            ExtremumKind::Low => "low",
        }
    }

    /// Capitalized word used in the text report
    pub fn word(self) -> &'static str {
        match self {
            ExtremumKind::High => "High",
            ExtremumKind::Low => "Low",
        }
    }
}

/// A local maximum or minimum reported by the provider.
///
/// Extremum times need not coincide with any [`TideSample`] time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtremumPoint {
    /// Local wall-clock time of the turn of the tide
    pub time: NaiveDateTime,
    /// Height in feet above MLLW
    pub height: f64,
    pub kind: ExtremumKind,
}

impl ExtremumPoint {
    /// Minutes since local midnight, as for [`TideSample::minutes_of_day`].
    ///
    /// ```
    /// use chrono::NaiveDateTime;
    /// use tide_chart_lib::{ExtremumKind, ExtremumPoint};
    ///
    /// let time = NaiveDateTime::parse_from_str("2026-02-24 15:31", "%Y-%m-%d %H:%M").unwrap();
    /// let high = ExtremumPoint { time, height: 4.9, kind: ExtremumKind::High };
    /// assert_eq!(high.minutes_of_day(), 931.0);
    /// ```
    pub fn minutes_of_day(&self) -> f64 {
        minutes_of_day(&self.time)
    }
}

/// Everything known about one station for one day.
///
/// A report is only meaningful with at least one sample; the constructors in
/// [`tide_data`] refuse to build an empty one and the renderer refuses to
/// draw one. Extrema may be empty.
///
/// # Example
/// ```
/// use tide_chart_lib::TideReport;
///
/// let report = TideReport {
///     station_id: "S1".into(),
///     station_name: "Somewhere".into(),
///     date: "2026-02-24".into(),
///     samples: vec![],
///     extrema: vec![],
/// };
/// assert!(!report.is_valid());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideReport {
    pub station_id: String,
    pub station_name: String,
    /// Display-only date label, never parsed back
    pub date: String,
    /// Predictions in provider order (already time-sorted)
    pub samples: Vec<TideSample>,
    pub extrema: Vec<ExtremumPoint>,
}

impl TideReport {
    /// True when the report has at least one sample.
    pub fn is_valid(&self) -> bool {
        !self.samples.is_empty()
    }

    /// Lowest and highest sample heights, `None` for an empty report.
    pub fn height_range(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        Some(
            self.samples
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), sample| {
                    (min.min(sample.height), max.max(sample.height))
                }),
        )
    }
}

fn minutes_of_day(time: &NaiveDateTime) -> f64 {
    (time.hour() * 60 + time.minute()) as f64
}
