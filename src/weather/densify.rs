//! Calendar densification: reindexing a sparse run of station-day readings
//! onto a complete inclusive date range.

use crate::weather::reading::StationReading;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Fill values for days the sparse input has no reading for.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingDefaults {
    pub station_id: String,
    pub station_name: String,
    pub datatype: String,
}

impl ReadingDefaults {
    fn filler_for(&self, date: NaiveDate) -> StationReading {
        StationReading {
            date,
            station_id: self.station_id.clone(),
            station_name: self.station_name.clone(),
            datatype: self.datatype.clone(),
            value: None,
        }
    }
}

/// Left-joins sparse station readings onto the full calendar range
/// `[start, end]` (both inclusive) at daily granularity.
///
/// Every day in the range produces exactly one output row, in ascending date
/// order. A day with a matching reading keeps that reading; a day without one
/// gets a synthetic row built from `defaults` with `value: None` — explicitly
/// "no measurement", never a zero. For `start <= end` the output length is
/// always `(end - start).num_days() + 1`, even for empty input; an inverted
/// range produces an empty series.
///
/// Readings dated outside the range never match a target day and are dropped.
/// When the input carries two readings for the same day, the first one wins.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use oak311::{densify_daily, ReadingDefaults};
///
/// let defaults = ReadingDefaults {
///     station_id: "GHCND:USW00023230".to_string(),
///     station_name: "Oakland Intl".to_string(),
///     datatype: "PRCP".to_string(),
/// };
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
///
/// let series = densify_daily(Vec::new(), start, end, &defaults);
/// assert_eq!(series.len(), 3);
/// assert!(series.iter().all(|r| r.value.is_none()));
/// ```
pub fn densify_daily(
    readings: Vec<StationReading>,
    start: NaiveDate,
    end: NaiveDate,
    defaults: &ReadingDefaults,
) -> Vec<StationReading> {
    let mut by_date: HashMap<NaiveDate, StationReading> = HashMap::new();
    for reading in readings {
        by_date.entry(reading.date).or_insert(reading);
    }

    let mut series = Vec::new();
    let mut day = start;
    while day <= end {
        series.push(
            by_date
                .remove(&day)
                .unwrap_or_else(|| defaults.filler_for(day)),
        );
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    series
}
