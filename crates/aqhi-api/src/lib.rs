//! JSON REST API for the AQHI user-location service.
//!
//! Exposes an axum [`Router`] backed by a [`LocationReconciler`] over any
//! store implementing the `aqhi-core` store traits. Auth, TLS, rate limiting
//! and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", aqhi_api::api_router(Arc::new(reconciler)))
//! ```

pub mod alerts;
pub mod error;
pub mod locations;

use std::sync::Arc;

use aqhi_core::{
  geocode::Geocoder,
  reconcile::LocationReconciler,
  store::{AlertStore, LocationStore},
};
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;

/// Handler state: the reconciler, shared between request tasks.
pub type Shared<S, G> = Arc<LocationReconciler<S, G>>;

/// Build a fully-materialised API router for `reconciler`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, G>(reconciler: Shared<S, G>) -> Router<()>
where
  S: LocationStore + AlertStore + 'static,
  G: Geocoder + 'static,
{
  Router::new()
    .route(
      "/users/{username}/location",
      get(locations::get_one::<S, G>).post(locations::from_coordinate::<S, G>),
    )
    .route(
      "/users/{username}/location/from-address",
      post(locations::from_address::<S, G>),
    )
    .route("/users/{username}/alerts", get(alerts::list::<S, G>))
    .with_state(reconciler)
}
