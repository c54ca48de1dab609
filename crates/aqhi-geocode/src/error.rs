//! Error type for `aqhi-geocode`.
//!
//! Only construction can fail with this type; lookups report
//! [`aqhi_core::geocode::GeocodeError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid geocoder base URL {0:?}: {1}")]
  BaseUrl(String, String),

  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
