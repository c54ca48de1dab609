//! Geocoding client for the AQHI service.
//!
//! [`NominatimGeocoder`] implements [`aqhi_core::geocode::Geocoder`] against
//! the OpenStreetMap Nominatim search API (or any server speaking the same
//! protocol) using a shared [`reqwest::Client`].

mod nominatim;

pub mod error;

pub use error::{Error, Result};
pub use nominatim::{DEFAULT_BASE_URL, NominatimGeocoder};
