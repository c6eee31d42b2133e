pub mod error;
pub(crate) mod fetch;
pub mod filter;
pub mod normalize;
pub mod record;
