//! # Nearest Station Search
//!
//! Great-circle (haversine) distance and a linear nearest-station scan.
//! Station lists are a few thousand entries at most and the search runs once
//! per report, so no spatial index is kept.

use crate::{Station, TideError};
use tracing::debug;

/// Mean Earth radius in statute miles
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// The station closest to a query point.
#[derive(Clone, Copy, Debug)]
pub struct NearestStation<'a> {
    pub station: &'a Station,
    pub distance_miles: f64,
}

/// Great-circle distance in miles between two points given in degrees.
///
/// ```text
/// a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)
/// d = 2R·atan2(√a, √(1−a))
/// ```
///
/// # Example
/// ```
/// use tide_chart_lib::stations::haversine_miles;
///
/// // One degree of longitude on the equator
/// let d = haversine_miles(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 69.09).abs() < 0.01);
/// ```
pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    // Deltas are taken as magnitudes so that swapping the endpoints is bit-for-bit identical
    let d_lat = (lat2 - lat1).abs().to_radians();
    let d_lon = (lon2 - lon1).abs().to_radians();

    let sin_lat = (d_lat / 2.0).sin();
    let sin_lon = (d_lon / 2.0).sin();
    let a = sin_lat * sin_lat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * sin_lon * sin_lon;
    let a = a.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_MILES * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Reject coordinates outside the usual degree ranges.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), TideError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(TideError::InvalidInput(format!(
            "latitude {latitude} is outside -90..=90"
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(TideError::InvalidInput(format!(
            "longitude {longitude} is outside -180..=180"
        )));
    }
    Ok(())
}

/// Find the station nearest to `(latitude, longitude)`.
///
/// Stations are scanned in input order and a candidate only replaces the
/// current best when it is strictly closer, so among equidistant stations the
/// earliest one wins.
///
/// # Errors
/// - [`TideError::InvalidInput`] for out-of-range coordinates
/// - [`TideError::NoStationsAvailable`] for an empty list
pub fn nearest_station(
    latitude: f64,
    longitude: f64,
    stations: &[Station],
) -> Result<NearestStation<'_>, TideError> {
    validate_coordinates(latitude, longitude)?;

    let mut best: Option<NearestStation<'_>> = None;
    for station in stations {
        let distance_miles =
            haversine_miles(latitude, longitude, station.latitude, station.longitude);
        if best.map_or(true, |current| distance_miles < current.distance_miles) {
            best = Some(NearestStation {
                station,
                distance_miles,
            });
        }
    }

    let nearest = best.ok_or(TideError::NoStationsAvailable)?;
    debug!(
        station = %nearest.station.id,
        distance_miles = nearest.distance_miles,
        candidates = stations.len(),
        "nearest station resolved"
    );
    Ok(nearest)
}

/// Look a station up by its identifier.
pub fn find_station_by_id<'a>(stations: &'a [Station], id: &str) -> Result<&'a Station, TideError> {
    if stations.is_empty() {
        return Err(TideError::NoStationsAvailable);
    }
    stations
        .iter()
        .find(|station| station.id == id)
        .ok_or_else(|| TideError::InvalidInput(format!("unknown station id '{id}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id: id.to_string(),
            name: format!("Station {id}"),
            latitude,
            longitude,
            region: None,
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            ((43.658, -70.244), (42.354, -71.051)),
            ((-33.86, 151.21), (51.51, -0.13)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            assert_eq!(
                haversine_miles(lat1, lon1, lat2, lon2),
                haversine_miles(lat2, lon2, lat1, lon1)
            );
        }
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(haversine_miles(37.8, -122.4, 37.8, -122.4), 0.0);
        assert_eq!(haversine_miles(-90.0, 0.0, -90.0, 0.0), 0.0);
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        let d = haversine_miles(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_MILES).abs() < 1e-6);
    }

    #[test]
    fn test_equator_scenario() {
        let stations = vec![station("S1", 0.0, 0.0), station("S2", 0.0, 10.0)];
        let nearest = nearest_station(0.0, 1.0, &stations).unwrap();
        assert_eq!(nearest.station.id, "S1");
        // 2πR/360 with R = 3958.8; within 0.1 mi of the commonly quoted 69.17
        assert!(
            (nearest.distance_miles - 69.09).abs() < 0.01,
            "got {}",
            nearest.distance_miles
        );
        assert!((nearest.distance_miles - 69.17).abs() < 0.1);
    }

    #[test]
    fn test_exact_match_wins_regardless_of_order() {
        let target = station("HERE", 41.5, -71.3);
        let others = [station("A", 41.0, -71.0), station("B", 42.0, -72.0)];

        for position in 0..=others.len() {
            let mut list = others.to_vec();
            list.insert(position, target.clone());
            let nearest = nearest_station(41.5, -71.3, &list).unwrap();
            assert_eq!(nearest.station.id, "HERE");
            assert_eq!(nearest.distance_miles, 0.0);
        }
    }

    #[test]
    fn test_equidistant_tie_keeps_first() {
        // Mirror images across the query meridian
        let stations = vec![station("WEST", 0.0, -1.0), station("EAST", 0.0, 1.0)];
        assert_eq!(nearest_station(0.0, 0.0, &stations).unwrap().station.id, "WEST");

        let reversed: Vec<_> = stations.into_iter().rev().collect();
        assert_eq!(nearest_station(0.0, 0.0, &reversed).unwrap().station.id, "EAST");
    }

    #[test]
    fn test_empty_list_is_no_stations() {
        assert!(matches!(
            nearest_station(0.0, 0.0, &[]),
            Err(TideError::NoStationsAvailable)
        ));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let stations = vec![station("S1", 0.0, 0.0)];
        assert!(matches!(
            nearest_station(91.0, 0.0, &stations),
            Err(TideError::InvalidInput(_))
        ));
        assert!(matches!(
            nearest_station(0.0, f64::NAN, &stations),
            Err(TideError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_find_station_by_id() {
        let stations = vec![station("S1", 0.0, 0.0), station("S2", 0.0, 10.0)];
        assert_eq!(find_station_by_id(&stations, "S2").unwrap().id, "S2");
        assert!(matches!(
            find_station_by_id(&stations, "S9"),
            Err(TideError::InvalidInput(_))
        ));
        assert!(matches!(
            find_station_by_id(&[], "S1"),
            Err(TideError::NoStationsAvailable)
        ));
    }
}
