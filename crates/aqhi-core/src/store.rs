//! Repository traits implemented by storage backends.
//!
//! The traits are implemented by `aqhi-store-sqlite`. Higher layers
//! (`aqhi-api`, the reconciler) depend on these abstractions, not on any
//! concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use crate::{
  alert::{Alert, NewAlert},
  coordinate::Coordinate,
  user::{NewUser, User},
};

// ─── Users ───────────────────────────────────────────────────────────────────

/// Identifier lookup and provisioning for users.
pub trait UserDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch at most one user by username. Returns `None` if not found.
  fn find_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Persist a new user with a store-assigned identifier.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;
}

// ─── Locations ───────────────────────────────────────────────────────────────

/// Atomic location updates.
///
/// Concurrent calls for the same user are not ordered relative to each
/// other; the last transaction to commit wins.
pub trait LocationStore: UserDirectory {
  /// Replace the stored location of `user_id` in a single transaction.
  ///
  /// Returns the updated user, or `None` if no user has that identifier (in
  /// which case nothing was written). On error the previous location is left
  /// intact.
  fn set_location(
    &self,
    user_id: Uuid,
    location: Coordinate,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;
}

// ─── Alerts ──────────────────────────────────────────────────────────────────

pub trait AlertStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a new alert. Fails if `input.user_id` does not exist.
  fn add_alert(
    &self,
    input: NewAlert,
  ) -> impl Future<Output = Result<Alert, Self::Error>> + Send + '_;

  /// All alerts belonging to `user_id`, oldest first.
  fn list_alerts(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Alert>, Self::Error>> + Send + '_;
}
