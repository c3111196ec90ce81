//! Shared fixtures: provider payload files on disk and a matching config.

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tide_chart_lib::config::Config;

pub const STATIONS_JSON: &str = r#"{
  "count": 3,
  "stations": [
    {"id": "8418150", "name": "Portland", "lat": 43.6567, "lng": -70.2467, "state": "ME"},
    {"id": "8443970", "name": "Boston", "lat": 42.3539, "lng": -71.0503, "state": "MA"},
    {"id": "9414290", "name": "San Francisco", "lat": 37.8063, "lng": -122.4659, "state": "CA"}
  ]
}"#;

pub const HILO_JSON: &str = r#"{"predictions": [
  {"t": "2026-02-24 03:05", "v": "5.200", "type": "H"},
  {"t": "2026-02-24 09:20", "v": "-0.300", "type": "L"},
  {"t": "2026-02-24 15:31", "v": "4.900", "type": "H"},
  {"t": "2026-02-24 21:44", "v": "0.100", "type": "L"}
]}"#;

/// Predictions payload with one record every 6 minutes for the whole day.
pub fn predictions_json(height: impl Fn(u32) -> f64) -> String {
    let records: Vec<String> = (0..240)
        .map(|step| {
            let minutes = step * 6;
            format!(
                r#"{{"t": "2026-02-24 {:02}:{:02}", "v": "{:.3}"}}"#,
                minutes / 60,
                minutes % 60,
                height(minutes)
            )
        })
        .collect();
    format!(r#"{{"predictions": [{}]}}"#, records.join(","))
}

/// Semidiurnal-looking curve between roughly -0.3 and 5.2 ft.
pub fn tide_height(minutes: u32) -> f64 {
    let phase = (minutes as f64 - 185.0) / 745.0 * std::f64::consts::TAU;
    2.45 + 2.75 * phase.cos()
}

/// Write payload files into a fresh temp dir and point a default config at them.
pub fn fixture_config(predictions: &str, hilo: &str) -> (TempDir, Config) {
    let dir = tempfile::tempdir().expect("temp dir");
    write(dir.path(), "stations.json", STATIONS_JSON);
    write(dir.path(), "predictions.json", predictions);
    write(dir.path(), "hilo.json", hilo);

    let mut config = Config::default();
    config.data.stations_file = dir.path().join("stations.json");
    config.data.predictions_file = dir.path().join("predictions.json");
    config.data.hilo_file = dir.path().join("hilo.json");
    config.data.date = Some("2026-02-24".to_string());
    (dir, config)
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("write fixture");
}
