pub mod densify;
pub mod error;
pub(crate) mod fetch;
pub mod reading;
pub mod station;
