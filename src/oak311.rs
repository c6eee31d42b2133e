//! This module provides the main entry point for fetching City of Oakland 311
//! service requests and NOAA weather-station data. Remote batches are cached
//! on disk; everything downstream of the fetch is a pure transform over the
//! typed tables in [`crate::requests`] and [`crate::weather`].

use crate::error::Oak311Error;
use crate::requests::fetch::RequestLoader;
use crate::requests::normalize::normalize_requests;
use crate::requests::record::RequestTable;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather::densify::{densify_daily, ReadingDefaults};
use crate::weather::fetch::NoaaClient;
use crate::weather::reading::StationReading;
use crate::weather::station::Station;
use bon::bon;
use chrono::NaiveDate;
use std::path::PathBuf;

/// The datatype fetched when a caller does not ask for anything else:
/// daily precipitation.
const DEFAULT_DATATYPE: &str = "PRCP";

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second
/// (index 1). Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use oak311::LatLon;
///
/// let downtown_oakland = LatLon(37.8044, -122.2712);
/// assert_eq!(downtown_oakland.0, 37.8044); // Latitude
/// assert_eq!(downtown_oakland.1, -122.2712); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A geographic bounding box for station searches, spanning from a south-east
/// corner to a north-west corner.
///
/// This is the shape the NOAA CDO `/stations` endpoint expects for its
/// `extent` parameter.
///
/// # Examples
///
/// ```
/// use oak311::{Extent, LatLon};
///
/// // A box around Oakland, CA.
/// let extent = Extent {
///     south_east: LatLon(37.7584, -122.3086),
///     north_west: LatLon(37.8647, -122.1551),
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub south_east: LatLon,
    pub north_west: LatLon,
}

impl Extent {
    /// Renders the extent in the CDO query format:
    /// `se_lat,se_lon,nw_lat,nw_lon`.
    pub(crate) fn as_query_value(&self) -> String {
        format!(
            "{},{},{},{}",
            self.south_east.0, self.south_east.1, self.north_west.0, self.north_west.1
        )
    }
}

/// The main client for Oakland 311 and NOAA weather data.
///
/// The client downloads remote batches on demand and caches them as JSON
/// files so repeated queries do not re-fetch. Create one with [`Oak311::new`]
/// (default cache directory) or [`Oak311::with_cache_folder`]; both take the
/// NOAA CDO access token as an explicit argument — the crate never reads it
/// from ambient process state.
///
/// # Examples
///
/// ```rust
/// # use oak311::{Oak311, Oak311Error};
/// # async fn run(noaa_token: String) -> Result<(), Oak311Error> {
/// let client = Oak311::new(noaa_token).await?;
/// // Now fetch requests or weather data through the client.
/// # Ok(())
/// # }
/// ```
pub struct Oak311 {
    requests: RequestLoader,
    noaa: NoaaClient,
}

#[bon]
impl Oak311 {
    /// Creates a client with a specified cache directory.
    ///
    /// Use this to control where downloaded request batches and the station
    /// reference table are stored. The directory is created if it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`Oak311Error::CacheDirCreation`] if the directory cannot be
    /// created.
    pub async fn with_cache_folder(
        cache_folder: PathBuf,
        noaa_token: impl Into<String>,
    ) -> Result<Self, Oak311Error> {
        ensure_cache_dir_exists(&cache_folder)
            .await
            .map_err(|e| Oak311Error::CacheDirCreation(cache_folder.clone(), e))?;
        Ok(Self {
            requests: RequestLoader::new(&cache_folder),
            noaa: NoaaClient::new(&cache_folder, noaa_token.into()),
        })
    }

    /// Creates a client using the default cache directory.
    ///
    /// The default is resolved with the `dirs` crate, typically
    /// `~/.cache/oak311_rs_cache` on Linux.
    ///
    /// # Errors
    ///
    /// Returns [`Oak311Error::CacheDirResolution`] if the default cache
    /// directory cannot be determined, or [`Oak311Error::CacheDirCreation`]
    /// if it cannot be created.
    pub async fn new(noaa_token: impl Into<String>) -> Result<Self, Oak311Error> {
        let cache_folder = get_cache_dir().map_err(Oak311Error::CacheDirResolution)?;
        Self::with_cache_folder(cache_folder, noaa_token).await
    }

    /// Fetches and normalizes 311 service requests opened after a date.
    ///
    /// Downloads (or reads from cache) every request opened strictly after
    /// midnight on `opened_after`, normalizes the batch into a
    /// [`RequestTable`], and optionally applies the description filter.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.opened_after(NaiveDate)`: **Required.** Lower bound on the case
    ///   opening time (exclusive, at midnight).
    /// * `.query(&str)`: Optional. Case-insensitive description substring;
    ///   when set, the result keeps only matching rows with coordinates (see
    ///   [`RequestTable::filter_by_description`]).
    ///
    /// # Errors
    ///
    /// Returns [`Oak311Error::RequestData`] for network or cache failures,
    /// and for a batch containing an unparsable timestamp (the whole batch
    /// fails; see [`crate::normalize_requests`]).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use chrono::NaiveDate;
    /// # use oak311::{Oak311, Oak311Error};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Oak311Error> {
    /// let client = Oak311::new("my-noaa-token").await?;
    ///
    /// let potholes = client
    ///     .service_requests()
    ///     .opened_after(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .query("Poth")
    ///     .call()
    ///     .await?;
    ///
    /// for row in &potholes.rows {
    ///     println!("{} {:?}", row.display_time, row.coordinates);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn service_requests(
        &self,
        opened_after: NaiveDate,
        query: Option<&str>,
    ) -> Result<RequestTable, Oak311Error> {
        let raw = self.requests.fetch_since(opened_after).await?;
        let table = normalize_requests(raw)?;
        Ok(match query {
            Some(q) => table.filter_by_description(q),
            None => table,
        })
    }

    /// Fetches the weather stations inside a bounding box.
    ///
    /// Stations are returned best data coverage first, and the reference
    /// table is cached on disk, so a later
    /// [`crate::resolve_station`] lookup works offline.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.extent(Extent)`: **Required.** The bounding box to search.
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** The coverage
    ///   period stations must report data for (inclusive).
    ///
    /// # Errors
    ///
    /// Returns [`Oak311Error::WeatherData`] for network or cache failures.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use chrono::NaiveDate;
    /// # use oak311::{Extent, LatLon, Oak311, Oak311Error};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Oak311Error> {
    /// let client = Oak311::new("my-noaa-token").await?;
    ///
    /// let stations = client
    ///     .find_stations()
    ///     .extent(Extent {
    ///         south_east: LatLon(37.7584, -122.3086),
    ///         north_west: LatLon(37.8647, -122.1551),
    ///     })
    ///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    ///     .call()
    ///     .await?;
    ///
    /// println!("Found {} stations around Oakland.", stations.len());
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn find_stations(
        &self,
        extent: Extent,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Station>, Oak311Error> {
        self.noaa
            .stations(&extent, start, end)
            .await
            .map_err(Oak311Error::from)
    }

    /// Fetches one station's daily readings and densifies them onto the full
    /// calendar range.
    ///
    /// The CDO response is sparse (only days with data come back); the result
    /// of this method always has exactly one row per day in `[start, end]`,
    /// with `value: None` marking days the station reported nothing. That
    /// makes two stations' series safe to align day-by-day without manual gap
    /// handling.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.station(&Station)`: **Required.** The station to query, e.g. from
    ///   [`Oak311::find_stations`] plus [`crate::resolve_station`].
    /// * `.start(NaiveDate)` / `.end(NaiveDate)`: **Required.** The calendar
    ///   range (inclusive).
    /// * `.datatype(String)`: Optional. CDO datatype tag; defaults to
    ///   `"PRCP"` (daily precipitation).
    ///
    /// # Errors
    ///
    /// Returns [`Oak311Error::WeatherData`] for network failures.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use chrono::NaiveDate;
    /// # use oak311::{Extent, LatLon, Oak311, Oak311Error, resolve_station};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Oak311Error> {
    /// let client = Oak311::new("my-noaa-token").await?;
    /// # let stations: Vec<oak311::Station> = vec![];
    /// let station = resolve_station("OAKLAND INTERNATIONAL AIRPORT, CA US", &stations)?;
    ///
    /// let series = client
    ///     .daily_readings()
    ///     .station(station)
    ///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .end(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())
    ///     .call()
    ///     .await?;
    ///
    /// assert_eq!(series.len(), 60); // one row per day, gaps filled
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn daily_readings(
        &self,
        station: &Station,
        start: NaiveDate,
        end: NaiveDate,
        datatype: Option<String>,
    ) -> Result<Vec<StationReading>, Oak311Error> {
        let datatype = datatype.unwrap_or_else(|| DEFAULT_DATATYPE.to_string());
        let raw = self.noaa.daily(&station.id, &datatype, start, end).await?;

        let sparse = raw
            .into_iter()
            .map(|r| StationReading::from_raw(r, &station.name))
            .collect();
        let defaults = ReadingDefaults {
            station_id: station.id.clone(),
            station_name: station.name.clone(),
            datatype,
        };
        Ok(densify_daily(sparse, start, end, &defaults))
    }
}
