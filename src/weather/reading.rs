//! Defines station reading rows: the raw shape delivered by the NOAA CDO data
//! endpoint and the station-day form the densifier works with.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// One raw observation row from the CDO `/data` endpoint.
///
/// The endpoint timestamps daily data at midnight (`2024-01-01T00:00:00`);
/// only the calendar day is meaningful for daily datasets.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawReading {
    pub date: NaiveDateTime,
    /// What the value represents (e.g. "PRCP").
    pub datatype: String,
    /// The reporting station's CDO identifier.
    pub station: String,
    /// Source/measurement attribute flags, unused by this crate.
    pub attributes: Option<String>,
    /// The measured value. Absent means the row carries no measurement.
    pub value: Option<f64>,
}

/// One station-day row, possibly synthesized by the densifier.
///
/// `date` is an explicit field on every row; consumers must never rely on a
/// row's position to recover its day. `value: None` means "no reported
/// measurement" and is distinct from a measured zero.
#[derive(Debug, Clone, PartialEq)]
pub struct StationReading {
    pub date: NaiveDate,
    pub station_id: String,
    pub station_name: String,
    /// Fixed tag describing what `value` represents.
    pub datatype: String,
    pub value: Option<f64>,
}

impl StationReading {
    /// Converts a raw observation into a station-day row, attaching the
    /// resolved station name (the CDO response only carries the station id).
    pub fn from_raw(raw: RawReading, station_name: &str) -> StationReading {
        StationReading {
            date: raw.date.date(),
            station_id: raw.station,
            station_name: station_name.to_string(),
            datatype: raw.datatype,
            value: raw.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_reading_deserializes_from_cdo_json() {
        let json = r#"{
            "date": "2024-01-03T00:00:00",
            "datatype": "PRCP",
            "station": "GHCND:USW00023230",
            "attributes": ",,W,2400",
            "value": 0.35
        }"#;

        let raw: RawReading = serde_json::from_str(json).unwrap();
        assert_eq!(raw.datatype, "PRCP");
        assert_eq!(raw.value, Some(0.35));
        assert_eq!(
            raw.date.date(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_from_raw_keeps_value_and_truncates_to_day() {
        let raw = RawReading {
            date: NaiveDate::from_ymd_opt(2024, 1, 3)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            datatype: "PRCP".to_string(),
            station: "GHCND:USW00023230".to_string(),
            attributes: None,
            value: Some(0.0),
        };

        let reading = StationReading::from_raw(raw, "Oakland Intl");
        assert_eq!(reading.date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(reading.station_name, "Oakland Intl");
        // A measured zero stays Some(0.0); it is not the same as no reading.
        assert_eq!(reading.value, Some(0.0));
    }
}
