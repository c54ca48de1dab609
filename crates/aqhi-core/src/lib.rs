//! Core types and trait definitions for the AQHI user-location service.
//!
//! Nothing here depends on HTTP or a database.
//! Storage backends implement the traits in [`store`], geocoding providers
//! implement [`geocode::Geocoder`], and [`reconcile::LocationReconciler`]
//! ties the two together.

// Traits use native `async fn`; impls return `Send` futures.
// Silence the lint about unstated `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod alert;
pub mod coordinate;
pub mod error;
pub mod geocode;
pub mod reconcile;
pub mod store;
pub mod user;

pub use coordinate::Coordinate;
pub use error::{Error, Result};
