use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestDataError {
    #[error("Failed to parse timestamp '{value}'")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to parse JSON data")]
    JsonParse(#[from] serde_json::Error),
}
