//! User: the account whose location this service keeps current.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coordinate::Coordinate;

/// A persisted user record.
///
/// The password credential is opaque at this layer and is never serialised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
  pub user_id:  Uuid,
  pub username: String,
  pub email:    String,
  #[serde(skip_serializing)]
  pub password: String,
  pub location: Coordinate,
}

/// Input for provisioning a user. The store assigns the identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
  pub username: String,
  pub email:    String,
  pub password: String,
  pub location: Coordinate,
}

/// Public projection of a user's location, returned by the boundary layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
  pub username: String,
  pub location: Coordinate,
}

impl From<&User> for UserLocation {
  fn from(user: &User) -> Self {
    Self {
      username: user.username.clone(),
      location: user.location,
    }
  }
}
