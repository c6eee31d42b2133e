//! Defines the data structures for Oakland 311 service requests, both the raw
//! shape delivered by the Socrata open-data endpoint and the normalized form
//! used by the rest of the crate.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A resolved request location as delivered by the 311 feed.
///
/// Latitude and longitude are passed through verbatim; the feed is trusted and
/// no bounds validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequestAddress {
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
}

/// One raw 311 case as returned by the Socrata endpoint.
///
/// Every field except the opening timestamp may be absent; requests without a
/// resolved location arrive with `reqaddress` missing entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRequest {
    /// When the case was opened. Free-form string on the wire, expected ISO-8601.
    #[serde(rename = "datetimeinit")]
    pub opened_at: String,
    /// Intake channel (e.g. "PHONE", "SeeClickFix").
    pub source: Option<String>,
    /// Free-text description of the reported issue.
    pub description: Option<String>,
    /// Request category tag.
    #[serde(rename = "reqcategory")]
    pub category: Option<String>,
    /// Case status (e.g. "OPEN", "CLOSED").
    pub status: Option<String>,
    /// City council district the request falls in.
    #[serde(rename = "councildistrict")]
    pub council_district: Option<String>,
    /// Police beat the request falls in.
    pub beat: Option<String>,
    /// Approximate street address as free text.
    #[serde(rename = "probaddress")]
    pub approx_address: Option<String>,
    /// Structured location, absent when the source has no resolved geodata.
    #[serde(rename = "reqaddress")]
    pub address: Option<RequestAddress>,
}

/// One normalized 311 case.
///
/// Built once per raw record by [`crate::normalize_requests`] and immutable
/// afterwards; filtered tables are new derived views, never mutations.
///
/// Invariant: `coordinates.is_some() == address.is_some()`. A request without
/// coordinates is never eligible for map placement and is excluded from every
/// spatially-dependent output.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRequest {
    /// When the case was opened.
    pub opened_at: NaiveDateTime,
    pub source: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Structured location, carried through from the raw record.
    pub address: Option<RequestAddress>,
    pub status: Option<String>,
    pub council_district: Option<String>,
    pub beat: Option<String>,
    pub approx_address: Option<String>,
    /// `(latitude, longitude)` iff `address` is present.
    pub coordinates: Option<(f64, f64)>,
    /// `opened_at` rendered in the fixed display format, e.g.
    /// `2024-01-15 09:23:41 AM`.
    pub display_time: String,
}

/// An ordered table of normalized 311 requests.
///
/// Rows are positionally indexed from 0; derived views (see
/// [`RequestTable::filter_by_description`]) re-index contiguously by
/// construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestTable {
    pub rows: Vec<ServiceRequest>,
}

impl RequestTable {
    /// Number of rows in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_request_deserializes_with_address() {
        let json = r#"{
            "datetimeinit": "2024-01-15T09:23:41",
            "source": "PHONE",
            "description": "Pothole repair needed",
            "reqcategory": "STREETSW",
            "status": "OPEN",
            "councildistrict": "3",
            "beat": "04X",
            "probaddress": "1 FRANK H OGAWA PLZ",
            "reqaddress": {"latitude": 37.8049, "longitude": -122.2711}
        }"#;

        let raw: RawRequest = serde_json::from_str(json).unwrap();
        assert_eq!(raw.opened_at, "2024-01-15T09:23:41");
        assert_eq!(raw.category.as_deref(), Some("STREETSW"));
        assert_eq!(
            raw.address,
            Some(RequestAddress {
                latitude: 37.8049,
                longitude: -122.2711,
            })
        );
    }

    #[test]
    fn test_raw_request_deserializes_without_optionals() {
        // Only the opening timestamp is required; everything else may be absent.
        let json = r#"{"datetimeinit": "2024-02-01T12:00:00"}"#;

        let raw: RawRequest = serde_json::from_str(json).unwrap();
        assert_eq!(raw.opened_at, "2024-02-01T12:00:00");
        assert!(raw.source.is_none());
        assert!(raw.description.is_none());
        assert!(raw.address.is_none());
    }

    #[test]
    fn test_raw_request_roundtrips_through_json() {
        let raw = RawRequest {
            opened_at: "2024-01-15T09:23:41".to_string(),
            source: Some("SeeClickFix".to_string()),
            description: Some("Illegal dumping".to_string()),
            category: Some("ILLDUMP".to_string()),
            status: Some("OPEN".to_string()),
            council_district: None,
            beat: Some("27Y".to_string()),
            approx_address: None,
            address: None,
        };

        let json = serde_json::to_string(&raw).unwrap();
        let back: RawRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, raw);
    }
}
