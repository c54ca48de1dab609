//! Error types for `aqhi-core`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("latitude {0} is outside [-90, 90]")]
  LatitudeOutOfRange(f64),

  #[error("longitude {0} is outside [-180, 180]")]
  LongitudeOutOfRange(f64),

  #[error("coordinate components must be finite")]
  NonFiniteCoordinate,

  #[error("user not found: {0}")]
  UserNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
