//! Handlers for `/users/{username}/location` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/{username}/location` | 404 if the user does not exist |
//! | `POST` | `/users/{username}/location` | Body: `{"latitude":f64,"longitude":f64}` |
//! | `POST` | `/users/{username}/location/from-address` | Body: `{"address":"..."}` |
//!
//! Successful calls return a [`UserLocation`].

use aqhi_core::{
  coordinate::Coordinate,
  geocode::Geocoder,
  store::LocationStore,
  user::UserLocation,
};
use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;

use crate::{Shared, error::ApiError};

// ─── Get ──────────────────────────────────────────────────────────────────────

/// `GET /users/{username}/location`
pub async fn get_one<S, G>(
  State(reconciler): State<Shared<S, G>>,
  Path(username): Path<String>,
) -> Result<Json<UserLocation>, ApiError>
where
  S: LocationStore,
  G: Geocoder,
{
  let user = reconciler
    .store()
    .find_by_username(&username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
  Ok(Json(UserLocation::from(&user)))
}

// ─── From coordinate ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CoordinateBody {
  pub latitude:  f64,
  pub longitude: f64,
}

/// `POST /users/{username}/location` with body `{"latitude":..,"longitude":..}`
///
/// Out-of-range coordinates are rejected with 400 before the user is looked
/// up.
pub async fn from_coordinate<S, G>(
  State(reconciler): State<Shared<S, G>>,
  Path(username): Path<String>,
  body: Result<Json<CoordinateBody>, JsonRejection>,
) -> Result<Json<UserLocation>, ApiError>
where
  S: LocationStore,
  G: Geocoder,
{
  let Json(body) = body?;
  let location = Coordinate::new(body.latitude, body.longitude)
    .map_err(|e| ApiError::BadRequest(format!("Invalid coordinate: {e}")))?;

  let user = reconciler
    .set_location_from_coordinate(&username, location)
    .await?;
  Ok(Json(UserLocation::from(&user)))
}

// ─── From address ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AddressBody {
  pub address: String,
}

/// `POST /users/{username}/location/from-address` with body `{"address":"..."}`
pub async fn from_address<S, G>(
  State(reconciler): State<Shared<S, G>>,
  Path(username): Path<String>,
  body: Result<Json<AddressBody>, JsonRejection>,
) -> Result<Json<UserLocation>, ApiError>
where
  S: LocationStore,
  G: Geocoder,
{
  let Json(body) = body?;
  let user = reconciler
    .set_location_from_address(&username, &body.address)
    .await?;
  Ok(Json(UserLocation::from(&user)))
}
