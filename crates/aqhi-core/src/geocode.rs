//! The `Geocoder` trait: free-text address to [`Coordinate`].

use std::future::Future;

use thiserror::Error;

use crate::coordinate::Coordinate;

/// Why an address could not be resolved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeocodeError {
  /// The provider answered, but had no match for the address.
  #[error("No geolocation data found for address: {0}")]
  NotFound(String),

  /// The call could not complete: transport failure, bad status, or a
  /// response that is malformed or out of range.
  #[error("{0}")]
  Provider(String),
}

/// Resolves addresses through an external provider.
///
/// Implementations issue at most one outbound call per `resolve` and never
/// retry internally.
pub trait Geocoder: Send + Sync {
  /// Resolve `address` to the provider's top-ranked match.
  fn resolve<'a>(
    &'a self,
    address: &'a str,
  ) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send + 'a;
}
