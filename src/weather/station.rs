//! Defines the weather station reference entity and the exact-name lookup
//! over a station reference table.

use crate::weather::error::WeatherDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One NOAA weather station from the CDO stations endpoint.
///
/// The coverage fields (`mindate`, `maxdate`, `datacoverage`) describe what
/// the station has reported historically; gaps may still exist within the
/// advertised range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// The CDO station identifier (e.g. "GHCND:USW00023230").
    pub id: String,
    /// The station's display name (e.g. "OAKLAND INTERNATIONAL AIRPORT, CA US").
    pub name: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Elevation above sea level in meters, if reported.
    pub elevation: Option<f64>,
    /// Earliest date the station has data for, if reported.
    pub mindate: Option<NaiveDate>,
    /// Latest date the station has data for, if reported.
    pub maxdate: Option<NaiveDate>,
    /// Fraction of the coverage period with actual data, if reported.
    pub datacoverage: Option<f64>,
}

/// Looks up a station by exact name in a reference table.
///
/// Returns the first row whose `name` equals `name` exactly; when duplicates
/// exist, first match wins (policy, not accident). There is no fuzzy matching
/// and no whitespace or case normalization: the reference table is small and
/// curated, so exact lookup keeps the contract simple.
///
/// # Errors
///
/// Returns [`WeatherDataError::StationNotFound`] when no row matches.
pub fn resolve_station<'a>(
    name: &str,
    stations: &'a [Station],
) -> Result<&'a Station, WeatherDataError> {
    stations
        .iter()
        .find(|station| station.name == name)
        .ok_or_else(|| WeatherDataError::StationNotFound {
            name: name.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(name: &str, latitude: f64, longitude: f64) -> Station {
        Station {
            id: format!("GHCND:{}", name.replace(' ', "_")),
            name: name.to_string(),
            latitude,
            longitude,
            elevation: None,
            mindate: None,
            maxdate: None,
            datacoverage: None,
        }
    }

    #[test]
    fn test_resolve_exact_match() {
        let stations = vec![
            station("BERKELEY, CA US", 37.87, -122.26),
            station("Oakland Intl", 37.72, -122.22),
        ];

        let found = resolve_station("Oakland Intl", &stations).unwrap();
        assert_eq!(found.latitude, 37.72);
        assert_eq!(found.longitude, -122.22);
    }

    #[test]
    fn test_resolve_first_match_wins_on_duplicates() {
        let stations = vec![
            station("Oakland Intl", 37.72, -122.22),
            station("Oakland Intl", 0.0, 0.0),
        ];

        let found = resolve_station("Oakland Intl", &stations).unwrap();
        assert_eq!((found.latitude, found.longitude), (37.72, -122.22));
    }

    #[test]
    fn test_resolve_missing_name_is_an_error() {
        let stations = vec![station("BERKELEY, CA US", 37.87, -122.26)];

        let err = resolve_station("Oakland Intl", &stations).unwrap_err();
        assert!(matches!(
            err,
            WeatherDataError::StationNotFound { ref name } if name == "Oakland Intl"
        ));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let stations = vec![station("Oakland Intl", 37.72, -122.22)];
        assert!(resolve_station("oakland intl", &stations).is_err());
    }

    #[test]
    fn test_station_deserializes_from_cdo_json() {
        let json = r#"{
            "elevation": 1.8,
            "mindate": "1948-01-01",
            "maxdate": "2024-02-29",
            "latitude": 37.7178,
            "name": "OAKLAND INTERNATIONAL AIRPORT, CA US",
            "datacoverage": 1.0,
            "id": "GHCND:USW00023230",
            "longitude": -122.2331
        }"#;

        let s: Station = serde_json::from_str(json).unwrap();
        assert_eq!(s.id, "GHCND:USW00023230");
        assert_eq!(s.mindate, NaiveDate::from_ymd_opt(1948, 1, 1));
        assert_eq!(s.datacoverage, Some(1.0));
    }
}
