//! [`LocationReconciler`]: sets a user's location from an address or from an
//! explicit coordinate.
//!
//! Both flows are single pass: validate, resolve, write, respond. Nothing is
//! retried here; a failure at any stage ends the request and is reported as a
//! [`ReconcileError`] whose variant tells the boundary layer which status to
//! use.

use thiserror::Error;
use tracing::{info, warn};

use crate::{
  coordinate::Coordinate,
  error::Error,
  geocode::{GeocodeError, Geocoder},
  store::LocationStore,
  user::User,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a failed reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
  /// The geocoder had no match for the address. User-correctable.
  #[error("No geolocation data found for address: {0}")]
  AddressNotFound(String),

  /// The geocoding provider could not be reached or answered badly.
  #[error("Geolocation error: {0}")]
  Geolocation(String),

  /// No user with the requested username (coordinate path only).
  #[error("User not found")]
  UserNotFound,

  /// Reading the user failed before any write was attempted.
  #[error("Database lookup error: {0}")]
  Lookup(#[source] BoxError),

  /// The location write failed; the stored location is unchanged.
  #[error("Database update error: {0}")]
  Update(#[source] BoxError),
}

/// Orchestrates a [`Geocoder`] and a [`LocationStore`].
///
/// Both collaborators are injected at construction; the reconciler holds no
/// other state and can be shared freely between request tasks.
pub struct LocationReconciler<S, G> {
  store:    S,
  geocoder: G,
}

impl<S, G> LocationReconciler<S, G>
where
  S: LocationStore,
  G: Geocoder,
{
  pub fn new(store: S, geocoder: G) -> Self { Self { store, geocoder } }

  /// The underlying store, for read-only endpoints.
  pub fn store(&self) -> &S { &self.store }

  /// Geocode `address` and store the result as `username`'s location.
  ///
  /// The address is resolved before the user is looked up, so geocoding is
  /// paid for even when the user does not exist. A missing user is reported
  /// as [`ReconcileError::Update`], like every other store-side failure on
  /// this path.
  #[tracing::instrument(skip(self))]
  pub async fn set_location_from_address(
    &self,
    username: &str,
    address: &str,
  ) -> Result<User, ReconcileError> {
    let location = self.geocoder.resolve(address).await.map_err(|e| {
      warn!(error = %e, "geocoding failed");
      match e {
        GeocodeError::NotFound(_) => ReconcileError::AddressNotFound(address.to_owned()),
        GeocodeError::Provider(msg) => ReconcileError::Geolocation(msg),
      }
    })?;

    let user = self
      .store
      .find_by_username(username)
      .await
      .map_err(|e| update_error(Box::new(e)))?
      .ok_or_else(|| update_error(Box::new(Error::UserNotFound(username.to_owned()))))?;

    let updated = self.write(&user, location).await?;
    info!(
      latitude = location.latitude(),
      longitude = location.longitude(),
      "location set from address"
    );
    Ok(updated)
  }

  /// Store `location` as `username`'s location without geocoding.
  #[tracing::instrument(skip(self))]
  pub async fn set_location_from_coordinate(
    &self,
    username: &str,
    location: Coordinate,
  ) -> Result<User, ReconcileError> {
    let user = self
      .store
      .find_by_username(username)
      .await
      .map_err(|e| {
        warn!(error = %e, "user lookup failed");
        ReconcileError::Lookup(Box::new(e))
      })?
      .ok_or(ReconcileError::UserNotFound)?;

    let updated = self.write(&user, location).await?;
    info!("location set from coordinate");
    Ok(updated)
  }

  async fn write(&self, user: &User, location: Coordinate) -> Result<User, ReconcileError> {
    self
      .store
      .set_location(user.user_id, location)
      .await
      .map_err(|e| update_error(Box::new(e)))?
      .ok_or_else(|| update_error(Box::new(Error::UserNotFound(user.username.clone()))))
  }
}

fn update_error(e: BoxError) -> ReconcileError {
  warn!(error = %e, "location update failed");
  ReconcileError::Update(e)
}
