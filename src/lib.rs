mod error;
mod oak311;
mod requests;
mod utils;
mod weather;

pub use error::Oak311Error;
pub use oak311::*;

pub use requests::error::RequestDataError;
pub use requests::normalize::{
    display_time, extract_coordinates, normalize_requests, parse_timestamp,
};
pub use requests::record::{RawRequest, RequestAddress, RequestTable, ServiceRequest};

pub use weather::densify::{densify_daily, ReadingDefaults};
pub use weather::error::WeatherDataError;
pub use weather::reading::{RawReading, StationReading};
pub use weather::station::{resolve_station, Station};
