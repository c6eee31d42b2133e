use crate::requests::error::RequestDataError;
use crate::requests::record::RawRequest;
use chrono::NaiveDate;
use log::{info, warn};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs;

const CITY_DATA_URL: &str = "https://data.oaklandca.gov/resource/quth-gb8e.json";
const RESULTS_LIMIT: u32 = 50_000;

/// Downloads 311 request batches from the Socrata endpoint and caches them as
/// JSON files keyed by the requested start date.
pub struct RequestLoader {
    cache_dir: PathBuf,
    client: Client,
}

impl RequestLoader {
    pub fn new(cache_dir: &Path) -> RequestLoader {
        RequestLoader {
            cache_dir: cache_dir.to_path_buf(),
            client: Client::new(),
        }
    }

    /// Returns all requests opened strictly after midnight on `opened_after`,
    /// reading from the file cache when possible.
    pub async fn fetch_since(
        &self,
        opened_after: NaiveDate,
    ) -> Result<Vec<RawRequest>, RequestDataError> {
        let cache_path = self
            .cache_dir
            .join(format!("oak311-since-{}.json", opened_after));

        if fs::metadata(&cache_path).await.is_ok() {
            info!(
                "Cache hit for 311 requests opened after {} at {:?}",
                opened_after, cache_path
            );
            let bytes = fs::read(&cache_path)
                .await
                .map_err(|e| RequestDataError::CacheRead(cache_path.clone(), e))?;
            return Ok(serde_json::from_slice(&bytes)?);
        }

        warn!(
            "Cache miss for 311 requests opened after {}. Downloading.",
            opened_after
        );
        let raw = self.download(opened_after).await?;

        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| RequestDataError::CacheDirCreation(self.cache_dir.clone(), e))?;
        let bytes = serde_json::to_vec(&raw)?;
        fs::write(&cache_path, &bytes)
            .await
            .map_err(|e| RequestDataError::CacheWrite(cache_path.clone(), e))?;
        info!(
            "Cached {} raw 311 requests to {:?}",
            raw.len(),
            cache_path
        );

        Ok(raw)
    }

    async fn download(
        &self,
        opened_after: NaiveDate,
    ) -> Result<Vec<RawRequest>, RequestDataError> {
        let selector = format!("datetimeinit > '{}T00:00:00'", opened_after);
        info!("Downloading 311 requests from {}", CITY_DATA_URL);

        let response = self
            .client
            .get(CITY_DATA_URL)
            .query(&[
                ("$limit", RESULTS_LIMIT.to_string()),
                ("$where", selector),
            ])
            .send()
            .await
            .map_err(|e| RequestDataError::NetworkRequest(CITY_DATA_URL.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", CITY_DATA_URL, e);
                return Err(if let Some(status) = e.status() {
                    RequestDataError::HttpStatus {
                        url: CITY_DATA_URL.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    RequestDataError::NetworkRequest(CITY_DATA_URL.to_string(), e)
                });
            }
        };

        response
            .json::<Vec<RawRequest>>()
            .await
            .map_err(|e| RequestDataError::NetworkRequest(CITY_DATA_URL.to_string(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_since_reads_from_cache_without_network() {
        let tmp = tempfile::tempdir().unwrap();
        let opened_after = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        // Seed the cache file the loader expects for this date.
        let cached = r#"[{
            "datetimeinit": "2024-01-15T09:23:41",
            "description": "Pothole repair needed",
            "reqaddress": {"latitude": 37.8, "longitude": -122.27}
        }]"#;
        let cache_path = tmp.path().join(format!("oak311-since-{}.json", opened_after));
        fs::write(&cache_path, cached).await.unwrap();

        let loader = RequestLoader::new(tmp.path());
        let raw = loader.fetch_since(opened_after).await.unwrap();

        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].description.as_deref(), Some("Pothole repair needed"));
    }

    #[tokio::test]
    async fn test_fetch_since_rejects_corrupt_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let opened_after = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let cache_path = tmp.path().join(format!("oak311-since-{}.json", opened_after));
        fs::write(&cache_path, b"{not json").await.unwrap();

        let loader = RequestLoader::new(tmp.path());
        let result = loader.fetch_since(opened_after).await;
        assert!(matches!(result, Err(RequestDataError::JsonParse(_))));
    }
}
