//! # Tide Chart Application Entry Point
//!
//! Reads `tide-config.toml`, resolves a station from the configured location,
//! builds the day's report from the configured payload files, prints it to
//! stdout and, when `chart_path` is set, writes the PNG chart.

// Test modules
#[cfg(test)]
mod tests;

use anyhow::Context;
use std::fs;
use tide_chart_lib::config::{Config, Location};
use tide_chart_lib::tide_data::{self, JsonFileProvider};
use tide_chart_lib::{logging, renderer, report, stations, TideReport};
use tracing::info;

/// Resolve the station and build the report described by `config`.
fn build_report(config: &Config) -> anyhow::Result<TideReport> {
    config.validate().context("invalid configuration")?;
    let date = config.report_date()?;

    let stations_file = &config.data.stations_file;
    let bytes = fs::read(stations_file)
        .with_context(|| format!("reading station list {}", stations_file.display()))?;
    let station_list = tide_data::decode_station_list(&bytes)?;

    let station = match config.location()? {
        Location::Coordinates {
            latitude,
            longitude,
        } => {
            let nearest = stations::nearest_station(latitude, longitude, &station_list)?;
            info!(
                station = %nearest.station.id,
                name = %nearest.station.name,
                distance_miles = format!("{:.1}", nearest.distance_miles),
                "using nearest station"
            );
            nearest.station
        }
        Location::Station(id) => stations::find_station_by_id(&station_list, &id)?,
    };

    let provider = JsonFileProvider::new(&config.data.predictions_file, &config.data.hilo_file);
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(tide_data::fetch_report(&provider, station, date))
        .with_context(|| format!("building report for station {}", station.id))
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = Config::load();
    let tide_report = build_report(&config)?;

    println!(
        "{}",
        report::format_report(&tide_report, config.output_format()?)
    );

    if let Some(path) = &config.output.chart_path {
        renderer::render_to_file(&tide_report, &config.render_config(), None, path)
            .with_context(|| format!("rendering chart to {}", path.display()))?;
    }

    Ok(())
}
