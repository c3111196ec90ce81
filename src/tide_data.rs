//! # Tide Data Decoding and Report Assembly
//!
//! This module sits between the tide-data provider and the rest of the crate.
//! It decodes provider payloads, filters raw records into typed samples, and
//! assembles [`TideReport`]s.
//!
//! ## Provider Payloads
//!
//! The provider answers every predictions or hi/lo request with one of two
//! JSON shapes:
//! ```json
//! {"predictions": [{"t": "2026-02-24 00:00", "v": "3.012"}, ...]}
//! {"error": {"message": "No Predictions data was found."}}
//! ```
//! Hi/lo records carry an extra `"type": "H" | "L"`. The two shapes decode
//! into [`ProviderResponse`]; an error payload becomes
//! [`TideError::ProviderError`], anything structurally different becomes
//! [`TideError::DecodeFailure`].
//!
//! ## Record Filtering
//!
//! Individual records are parsed best-effort: a record with an unparseable
//! timestamp, a non-numeric (or non-finite) height, or an unknown type code is
//! dropped and the rest of the batch survives. Only when no sample survives is
//! the whole report unavailable ([`TideError::NoData`]).
//!
//! ## Fetching
//!
//! [`fetch_report`] requests predictions and hi/lo extrema from a
//! [`TideProvider`] concurrently and fails if either request fails.

use crate::renderer::RenderError;
use crate::{ExtremumKind, ExtremumPoint, Station, TideReport, TideSample};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Provider timestamp layout, local wall-clock time
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Errors produced anywhere in the tide pipeline.
///
/// Each variant carries enough context (offending value, file, stage) to
/// print a precise message without further lookup.
#[derive(Error, Debug)]
pub enum TideError {
    /// Malformed coordinates, dates, option combinations or names
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The station list was empty
    #[error("no tide stations available")]
    NoStationsAvailable,

    /// No usable prediction survived parsing
    #[error("no tide prediction data available")]
    NoData,

    /// Provider payload did not match any expected shape
    #[error("failed to decode {what}: {source}")]
    DecodeFailure {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The provider answered with an explicit error payload
    #[error("tide data provider error: {0}")]
    ProviderError(String),

    /// A payload file could not be read
    #[error("cannot read {}: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Chart drawing, encoding or file output failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// One raw 6-minute prediction record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    /// Timestamp, `yyyy-MM-dd HH:mm`
    pub t: String,
    /// Height in feet, as a decimal string
    pub v: String,
}

/// One raw hi/lo record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawHighLow {
    pub t: String,
    pub v: String,
    /// `"H"` or `"L"`
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProviderErrorDetail {
    pub message: String,
}

/// Either the records or the provider's error message.
///
/// Decoded directly from the payload shape; when a payload carries an
/// `error` object it is a failure whatever else it contains.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse<T> {
    Failure { error: ProviderErrorDetail },
    Data { predictions: Vec<T> },
}

impl<T> ProviderResponse<T> {
    /// Unwrap the records, turning an error payload into [`TideError::ProviderError`].
    pub fn into_records(self) -> Result<Vec<T>, TideError> {
        match self {
            ProviderResponse::Data { predictions } => Ok(predictions),
            ProviderResponse::Failure { error } => Err(TideError::ProviderError(error.message)),
        }
    }
}

// `count` is redundant with the array length and ignored
#[derive(Deserialize)]
#[serde(untagged)]
enum StationListPayload {
    Envelope { stations: Vec<Station> },
    Bare(Vec<Station>),
}

fn decode<T: DeserializeOwned>(bytes: &[u8], what: &'static str) -> Result<T, TideError> {
    serde_json::from_slice(bytes).map_err(|source| TideError::DecodeFailure { what, source })
}

/// Decode a station list, either the provider envelope
/// (`{"count": n, "stations": [...]}`) or a bare array of stations.
pub fn decode_station_list(bytes: &[u8]) -> Result<Vec<Station>, TideError> {
    match decode(bytes, "station list")? {
        StationListPayload::Envelope { stations } | StationListPayload::Bare(stations) => {
            Ok(stations)
        }
    }
}

/// Decode a 6-minute predictions payload.
pub fn decode_predictions(bytes: &[u8]) -> Result<ProviderResponse<RawPrediction>, TideError> {
    decode(bytes, "predictions")
}

/// Decode a hi/lo payload.
pub fn decode_high_low(bytes: &[u8]) -> Result<ProviderResponse<RawHighLow>, TideError> {
    decode(bytes, "high/low predictions")
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

fn parse_height(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|height| height.is_finite())
}

/// Parse prediction records, silently dropping malformed ones.
///
/// Order is preserved; the result may be shorter than the input.
pub fn parse_samples(records: &[RawPrediction]) -> Vec<TideSample> {
    let samples: Vec<TideSample> = records
        .iter()
        .filter_map(|record| {
            Some(TideSample {
                time: parse_timestamp(&record.t)?,
                height: parse_height(&record.v)?,
            })
        })
        .collect();

    let dropped = records.len() - samples.len();
    if dropped > 0 {
        debug!(dropped, kept = samples.len(), "dropped malformed prediction records");
    }
    samples
}

/// Parse hi/lo records, silently dropping malformed ones.
pub fn parse_extrema(records: &[RawHighLow]) -> Vec<ExtremumPoint> {
    let extrema: Vec<ExtremumPoint> = records
        .iter()
        .filter_map(|record| {
            Some(ExtremumPoint {
                time: parse_timestamp(&record.t)?,
                height: parse_height(&record.v)?,
                kind: ExtremumKind::from_code(&record.kind)?,
            })
        })
        .collect();

    let dropped = records.len() - extrema.len();
    if dropped > 0 {
        debug!(dropped, kept = extrema.len(), "dropped malformed high/low records");
    }
    extrema
}

/// Assemble a report for one station and day from raw provider records.
///
/// # Errors
/// [`TideError::NoData`] when no prediction record survives parsing.
pub fn build_report(
    station: &Station,
    date: impl Into<String>,
    predictions: &[RawPrediction],
    high_low: &[RawHighLow],
) -> Result<TideReport, TideError> {
    let samples = parse_samples(predictions);
    if samples.is_empty() {
        return Err(TideError::NoData);
    }

    Ok(TideReport {
        station_id: station.id.clone(),
        station_name: station.name.clone(),
        date: date.into(),
        samples,
        extrema: parse_extrema(high_low),
    })
}

/// Source of raw tide records for one station and day.
///
/// The two requests are independent and may be in flight at the same time.
pub trait TideProvider {
    fn predictions(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<RawPrediction>, TideError>> + Send;

    fn high_low(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<RawHighLow>, TideError>> + Send;
}

/// Fetch both series for `station` on `date` concurrently and build the report.
///
/// The report's date label is `date` as `YYYY-MM-DD`.
pub async fn fetch_report<P: TideProvider>(
    provider: &P,
    station: &Station,
    date: NaiveDate,
) -> Result<TideReport, TideError> {
    let (predictions, high_low) = tokio::try_join!(
        provider.predictions(&station.id, date),
        provider.high_low(&station.id, date)
    )?;

    info!(
        station = %station.id,
        predictions = predictions.len(),
        high_low = high_low.len(),
        "tide data received"
    );
    build_report(station, date.format("%Y-%m-%d").to_string(), &predictions, &high_low)
}

/// Provider backed by payload files already on disk.
///
/// Each file holds one provider response for a single station and day, so the
/// station and date arguments are not consulted.
#[derive(Clone, Debug)]
pub struct JsonFileProvider {
    predictions_path: PathBuf,
    high_low_path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(predictions_path: impl AsRef<Path>, high_low_path: impl AsRef<Path>) -> Self {
        Self {
            predictions_path: predictions_path.as_ref().to_path_buf(),
            high_low_path: high_low_path.as_ref().to_path_buf(),
        }
    }
}

async fn read_payload(path: &Path) -> Result<Vec<u8>, TideError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| TideError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })
}

impl TideProvider for JsonFileProvider {
    async fn predictions(
        &self,
        _station_id: &str,
        _date: NaiveDate,
    ) -> Result<Vec<RawPrediction>, TideError> {
        let bytes = read_payload(&self.predictions_path).await?;
        decode_predictions(&bytes)?.into_records()
    }

    async fn high_low(
        &self,
        _station_id: &str,
        _date: NaiveDate,
    ) -> Result<Vec<RawHighLow>, TideError> {
        let bytes = read_payload(&self.high_low_path).await?;
        decode_high_low(&bytes)?.into_records()
    }
}
