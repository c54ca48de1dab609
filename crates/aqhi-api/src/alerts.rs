//! Handler for `GET /users/{username}/alerts`.

use aqhi_core::{
  alert::Alert,
  geocode::Geocoder,
  store::{AlertStore, LocationStore},
};
use axum::{
  Json,
  extract::{Path, State},
};

use crate::{Shared, error::ApiError};

/// `GET /users/{username}/alerts`: the user's alerts, oldest first.
pub async fn list<S, G>(
  State(reconciler): State<Shared<S, G>>,
  Path(username): Path<String>,
) -> Result<Json<Vec<Alert>>, ApiError>
where
  S: LocationStore + AlertStore,
  G: Geocoder,
{
  let store = reconciler.store();
  let user = store
    .find_by_username(&username)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

  let alerts = store
    .list_alerts(user.user_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(alerts))
}
