use crate::oak311::Extent;
use crate::weather::error::WeatherDataError;
use crate::weather::reading::RawReading;
use crate::weather::station::Station;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;

const API_BASE_URL: &str = "https://www.ncei.noaa.gov/cdo-web/api/v2";
const STATION_CACHE_FILE_NAME: &str = "station-coords.json";
const DATASET_ID: &str = "GHCND";
const UNITS: &str = "standard";
const RESULTS_LIMIT: u32 = 1000;

/// The CDO API wraps result sets in an envelope; `results` is absent entirely
/// when a query matches nothing.
#[derive(Debug, Deserialize)]
struct ResultsEnvelope<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// Talks to the NOAA Climate Data Online v2 API.
///
/// The access token is explicit client state supplied at construction; it is
/// never read from the process environment.
pub struct NoaaClient {
    cache_dir: PathBuf,
    client: Client,
    token: String,
}

impl NoaaClient {
    pub fn new(cache_dir: &Path, token: String) -> NoaaClient {
        NoaaClient {
            cache_dir: cache_dir.to_path_buf(),
            client: Client::new(),
            token,
        }
    }

    /// Returns the stations inside `extent` with data coverage in
    /// `[start, end]`, sorted by data coverage (best first), reading the
    /// station reference table from the file cache when possible.
    pub async fn stations(
        &self,
        extent: &Extent,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Station>, WeatherDataError> {
        let cache_path = self.cache_dir.join(STATION_CACHE_FILE_NAME);

        if fs::metadata(&cache_path).await.is_ok() {
            info!("Cache hit for station table at {:?}", cache_path);
            let bytes = fs::read(&cache_path)
                .await
                .map_err(|e| WeatherDataError::CacheRead(cache_path.clone(), e))?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        warn!("Cache miss for station table. Downloading.");
        let url = format!("{}/stations", API_BASE_URL);
        let stations: Vec<Station> = self
            .get_results(
                &url,
                &[
                    ("extent", extent.as_query_value()),
                    ("startdate", start.to_string()),
                    ("enddate", end.to_string()),
                    ("sortfield", "datacoverage".to_string()),
                    ("sortorder", "desc".to_string()),
                    ("limit", RESULTS_LIMIT.to_string()),
                ],
            )
            .await?;

        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| WeatherDataError::CacheDirCreation(self.cache_dir.clone(), e))?;
        let bytes = serde_json::to_vec(&stations)?;
        fs::write(&cache_path, &bytes)
            .await
            .map_err(|e| WeatherDataError::CacheWrite(cache_path.clone(), e))?;
        info!("Cached {} stations to {:?}", stations.len(), cache_path);

        Ok(stations)
    }

    /// Fetches daily observations of one datatype for one station over
    /// `[start, end]` inclusive. The response is sparse: only days with data
    /// come back.
    pub async fn daily(
        &self,
        station_id: &str,
        datatype: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawReading>, WeatherDataError> {
        let url = format!("{}/data", API_BASE_URL);
        self.get_results(
            &url,
            &[
                ("datasetid", DATASET_ID.to_string()),
                ("datatypeid", datatype.to_string()),
                ("stationid", station_id.to_string()),
                ("startdate", start.to_string()),
                ("enddate", end.to_string()),
                ("units", UNITS.to_string()),
                ("limit", RESULTS_LIMIT.to_string()),
            ],
        )
        .await
    }

    async fn get_results<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, WeatherDataError> {
        info!("Downloading data from {}", url);

        let response = self
            .client
            .get(url)
            .header("token", &self.token)
            .query(query)
            .send()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    WeatherDataError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    WeatherDataError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let envelope: ResultsEnvelope<T> = response
            .json()
            .await
            .map_err(|e| WeatherDataError::NetworkRequest(url.to_string(), e))?;
        Ok(envelope.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oak311::LatLon;

    #[test]
    fn test_results_envelope_defaults_to_empty() {
        // A query matching nothing returns an envelope without "results".
        let envelope: ResultsEnvelope<Station> =
            serde_json::from_str(r#"{"metadata": {}}"#).unwrap();
        assert!(envelope.results.is_empty());
    }

    #[test]
    fn test_results_envelope_parses_station_rows() {
        let json = r#"{
            "metadata": {"resultset": {"offset": 1, "count": 1, "limit": 1000}},
            "results": [{
                "elevation": 1.8,
                "mindate": "1948-01-01",
                "maxdate": "2024-02-29",
                "latitude": 37.7178,
                "name": "OAKLAND INTERNATIONAL AIRPORT, CA US",
                "datacoverage": 1.0,
                "id": "GHCND:USW00023230",
                "longitude": -122.2331
            }]
        }"#;

        let envelope: ResultsEnvelope<Station> = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.results.len(), 1);
        assert_eq!(envelope.results[0].id, "GHCND:USW00023230");
    }

    #[tokio::test]
    async fn test_stations_reads_from_cache_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        let cached = r#"[{
            "id": "GHCND:USW00023230",
            "name": "OAKLAND INTERNATIONAL AIRPORT, CA US",
            "latitude": 37.7178,
            "longitude": -122.2331,
            "elevation": 1.8,
            "mindate": "1948-01-01",
            "maxdate": "2024-02-29",
            "datacoverage": 1.0
        }]"#;
        fs::write(tmp.path().join(STATION_CACHE_FILE_NAME), cached)
            .await
            .unwrap();

        let client = NoaaClient::new(tmp.path(), "unused-token".to_string());
        let extent = Extent {
            south_east: LatLon(37.7584, -122.3086),
            north_west: LatLon(37.8647, -122.1551),
        };
        let stations = client
            .stations(
                &extent,
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "OAKLAND INTERNATIONAL AIRPORT, CA US");
    }
}
