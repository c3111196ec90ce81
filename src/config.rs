//! # Configuration Management
//!
//! Loads `tide-config.toml`: where to report for, which payload files to read
//! and how to present the result. Every section and key is optional; missing
//! values take the defaults below (Portland, ME; JSON to stdout; no chart).
//!
//! ```toml
//! [location]
//! latitude = 43.6567
//! longitude = -70.2467
//! # station_id = "8418150"    # instead of coordinates
//!
//! [data]
//! stations_file = "demos/stations.json"
//! predictions_file = "demos/predictions.json"
//! hilo_file = "demos/hilo.json"
//! # date = "2026-02-24"       # defaults to today
//!
//! [output]
//! format = "text"
//! chart_path = "tide-chart.png"
//! theme = "nautical"
//! ```

use crate::renderer::{RenderConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::report::OutputFormat;
use crate::stations::validate_coordinates;
use crate::theme::Theme;
use crate::TideError;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE: &str = "tide-config.toml";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Application configuration loaded from tide-config.toml
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub location: LocationConfig,
    pub data: DataConfig,
    pub output: OutputConfig,
}

/// Where the report is for: a coordinate pair or a known station id.
///
/// Only an absent `[location]` section defaults to Portland, ME. Keys left out
/// of a present section stay unset.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<String>,
}

/// Provider payload files and the report day.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    /// Station list envelope (`{"stations": [...]}`)
    pub stations_file: PathBuf,
    /// 6-minute predictions response
    pub predictions_file: PathBuf,
    /// High/low response
    pub hilo_file: PathBuf,
    /// Report day as `YYYY-MM-DD`; today when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Report format and chart options.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `json` or `text`
    pub format: String,
    /// Write a PNG chart here when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<PathBuf>,
    pub width: u32,
    pub height: u32,
    pub theme: String,
    pub show_current_time: bool,
}

/// Resolved location request.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    Coordinates { latitude: f64, longitude: f64 },
    Station(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            location: LocationConfig {
                latitude: Some(43.6567),
                longitude: Some(-70.2467),
                station_id: None,
            },
            data: DataConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            stations_file: PathBuf::from("demos/stations.json"),
            predictions_file: PathBuf::from("demos/predictions.json"),
            hilo_file: PathBuf::from("demos/hilo.json"),
            date: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Json.to_string(),
            chart_path: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: Theme::LIGHT.name.to_string(),
            show_current_time: false,
        }
    }
}

impl Config {
    /// Load configuration from tide-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "configuration loaded");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using defaults");
                Self::default()
            }
        }
    }

    /// Check every rule a loaded file can break, returning the first failure.
    pub fn validate(&self) -> Result<(), TideError> {
        self.location()?;
        self.report_date()?;
        self.output_format()?;
        if self.output.width == 0 || self.output.height == 0 {
            return Err(TideError::InvalidInput(format!(
                "chart size {}x{} must be non-zero",
                self.output.width, self.output.height
            )));
        }
        Ok(())
    }

    /// The location request, rejecting half-given or conflicting settings.
    pub fn location(&self) -> Result<Location, TideError> {
        let LocationConfig {
            latitude,
            longitude,
            station_id,
        } = &self.location;

        match (latitude, longitude, station_id) {
            (Some(_), _, Some(_)) | (_, Some(_), Some(_)) => Err(TideError::InvalidInput(
                "set either station_id or latitude/longitude, not both".to_string(),
            )),
            (None, None, Some(id)) => Ok(Location::Station(id.clone())),
            (Some(latitude), Some(longitude), None) => {
                validate_coordinates(*latitude, *longitude)?;
                Ok(Location::Coordinates {
                    latitude: *latitude,
                    longitude: *longitude,
                })
            }
            (Some(_), None, None) | (None, Some(_), None) => Err(TideError::InvalidInput(
                "latitude and longitude must be given together".to_string(),
            )),
            (None, None, None) => Err(TideError::InvalidInput(
                "no location: set station_id or latitude/longitude".to_string(),
            )),
        }
    }

    /// The configured report day, or today in local time.
    pub fn report_date(&self) -> Result<NaiveDate, TideError> {
        match &self.data.date {
            Some(date) => NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e| {
                TideError::InvalidInput(format!("date '{date}' is not YYYY-MM-DD: {e}"))
            }),
            None => Ok(Local::now().date_naive()),
        }
    }

    pub fn output_format(&self) -> Result<OutputFormat, TideError> {
        self.output.format.parse()
    }

    /// Chart settings from `[output]`; an unknown theme renders as `light`.
    pub fn render_config(&self) -> RenderConfig {
        let theme = Theme::named(&self.output.theme).unwrap_or_else(|| {
            warn!(
                theme = %self.output.theme,
                available = ?Theme::names().collect::<Vec<_>>(),
                "unknown theme, using light"
            );
            Theme::LIGHT
        });

        RenderConfig {
            width: self.output.width,
            height: self.output.height,
            theme,
            show_current_time: self.output.show_current_time,
        }
    }
}
