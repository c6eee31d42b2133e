//! Normalization of raw 311 records: geopoint extraction, timestamp
//! canonicalization, and the batch normalizer composing the two.

use crate::requests::error::RequestDataError;
use crate::requests::record::{RawRequest, RequestAddress, RequestTable, ServiceRequest};
use chrono::{DateTime, NaiveDateTime};

/// The fixed display format for request timestamps: 12-hour clock with a
/// leading zero and an AM/PM marker, e.g. `2024-01-15 09:23:41 AM`.
const DISPLAY_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// Accepted on-wire timestamp shapes, tried in order. ISO-8601 without an
/// offset is what the Socrata endpoint actually sends.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Pulls a `(latitude, longitude)` pair out of an optional structured address.
///
/// Absent input yields an absent result; this never fails and never
/// substitutes a sentinel coordinate. Present values pass through verbatim.
///
/// # Examples
///
/// ```
/// use oak311::{extract_coordinates, RequestAddress};
///
/// assert_eq!(extract_coordinates(None), None);
///
/// let addr = RequestAddress { latitude: 37.8, longitude: -122.27 };
/// assert_eq!(extract_coordinates(Some(&addr)), Some((37.8, -122.27)));
/// ```
pub fn extract_coordinates(address: Option<&RequestAddress>) -> Option<(f64, f64)> {
    address.map(|a| (a.latitude, a.longitude))
}

/// Parses a free-form datetime string into a `NaiveDateTime`.
///
/// Tries the ISO-8601 shapes in [`INPUT_FORMATS`] first, then falls back to
/// RFC 3339 (dropping the offset). An unparsable input is fatal for that
/// record and reported as [`RequestDataError::TimestampParse`]; no default is
/// ever substituted.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, RequestDataError> {
    let mut result = NaiveDateTime::parse_from_str(raw, INPUT_FORMATS[0]);
    for format in &INPUT_FORMATS[1..] {
        if result.is_ok() {
            break;
        }
        result = NaiveDateTime::parse_from_str(raw, format);
    }
    match result {
        Ok(timestamp) => Ok(timestamp),
        Err(source) => {
            if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
                return Ok(timestamp.naive_local());
            }
            Err(RequestDataError::TimestampParse {
                value: raw.to_string(),
                source,
            })
        }
    }
}

/// Renders a timestamp in the fixed display format.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use oak311::display_time;
///
/// let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
///     .unwrap()
///     .and_hms_opt(9, 23, 41)
///     .unwrap();
/// assert_eq!(display_time(ts), "2024-01-15 09:23:41 AM");
/// ```
pub fn display_time(timestamp: NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}

/// Normalizes a batch of raw 311 records into a [`RequestTable`].
///
/// One output row per input record, in the original order, with
/// `coordinates` derived via [`extract_coordinates`] and `display_time` via
/// [`display_time`]. The transform is pure.
///
/// A record whose timestamp cannot be parsed fails the whole batch: the first
/// [`RequestDataError::TimestampParse`] is returned and no partial table is
/// produced. Callers wanting per-record recovery must pre-filter the raw
/// batch themselves.
pub fn normalize_requests(raw: Vec<RawRequest>) -> Result<RequestTable, RequestDataError> {
    let mut rows = Vec::with_capacity(raw.len());
    for record in raw {
        let opened_at = parse_timestamp(&record.opened_at)?;
        rows.push(ServiceRequest {
            opened_at,
            source: record.source,
            description: record.description,
            category: record.category,
            status: record.status,
            council_district: record.council_district,
            beat: record.beat,
            approx_address: record.approx_address,
            coordinates: extract_coordinates(record.address.as_ref()),
            address: record.address,
            display_time: display_time(opened_at),
        });
    }
    Ok(RequestTable { rows })
}
