//! Error type for `aqhi-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] aqhi_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored location is not a well-formed `SRID=4326;POINT(lon lat)`.
  #[error("invalid stored point: {0:?}")]
  Point(String),

  /// Username or email already taken.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
