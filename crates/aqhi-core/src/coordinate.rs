//! Coordinate: a validated WGS84 latitude/longitude pair.
//!
//! The fields are private and every constructor validates, so holding a
//! `Coordinate` is proof that both components are finite and in range. This
//! includes values produced by `serde`, which go through the same check.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point on Earth in degrees (WGS84 / SRID 4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
  latitude:  f64,
  longitude: f64,
}

impl Coordinate {
  /// Build a coordinate, rejecting non-finite or out-of-range components.
  pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
    if !latitude.is_finite() || !longitude.is_finite() {
      return Err(Error::NonFiniteCoordinate);
    }
    if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
      return Err(Error::LatitudeOutOfRange(latitude));
    }
    if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
      return Err(Error::LongitudeOutOfRange(longitude));
    }
    Ok(Self { latitude, longitude })
  }

  pub fn latitude(&self) -> f64 { self.latitude }

  pub fn longitude(&self) -> f64 { self.longitude }
}

/// Unvalidated wire shape, only used as the `serde(try_from)` source.
#[derive(Deserialize)]
struct RawCoordinate {
  latitude:  f64,
  longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
  type Error = Error;

  fn try_from(raw: RawCoordinate) -> Result<Self> {
    Self::new(raw.latitude, raw.longitude)
  }
}
