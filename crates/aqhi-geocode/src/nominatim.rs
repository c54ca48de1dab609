//! [`NominatimGeocoder`]: the reqwest implementation of [`Geocoder`].
//!
//! One `GET {base_url}/search?q=...&format=json&limit=1` per lookup. The
//! response is untrusted: an empty array is a miss, and anything that does
//! not parse into an in-range coordinate is a provider error.

use std::time::Duration;

use aqhi_core::{
  coordinate::Coordinate,
  geocode::{GeocodeError, Geocoder},
};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Geocoder backed by a Nominatim-compatible search endpoint.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct NominatimGeocoder {
  client:     Client,
  search_url: Url,
}

impl NominatimGeocoder {
  /// Build a geocoder for `base_url` with a request timeout.
  ///
  /// Nominatim's usage policy requires an identifying `user_agent`.
  pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
    let raw = format!("{}/search", base_url.trim_end_matches('/'));
    let search_url =
      Url::parse(&raw).map_err(|e| Error::BaseUrl(base_url.to_owned(), e.to_string()))?;

    let client = Client::builder()
      .user_agent(user_agent)
      .timeout(timeout)
      .build()?;

    Ok(Self { client, search_url })
  }
}

impl Geocoder for NominatimGeocoder {
  async fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
    let query = address.trim();
    if query.is_empty() {
      return Err(GeocodeError::NotFound(address.to_owned()));
    }

    let resp = self
      .client
      .get(self.search_url.clone())
      .query(&[("q", query), ("format", "json"), ("limit", "1")])
      .send()
      .await
      .map_err(transport_error)?;

    let status = resp.status();
    let body = resp.bytes().await.map_err(transport_error)?;
    if !status.is_success() {
      let err = status_error(status, &body);
      warn!(%address, error = %err, "geocoding provider rejected request");
      return Err(err);
    }

    let coordinate = parse_top_match(&body)
      .inspect_err(|e| warn!(%address, error = %e, "unusable geocoding response"))?
      .ok_or_else(|| GeocodeError::NotFound(address.to_owned()))?;

    debug!(
      %address,
      latitude = coordinate.latitude(),
      longitude = coordinate.longitude(),
      "resolved address"
    );
    Ok(coordinate)
  }
}

// ─── Response decoding ───────────────────────────────────────────────────────

/// One element of the Nominatim JSON array. Only the position is consumed.
#[derive(Debug, Deserialize)]
struct Place {
  lat: Degrees,
  lon: Degrees,
}

/// Nominatim sends degrees as strings; some compatible servers send numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
  Text(String),
  Number(f64),
}

impl Degrees {
  fn parse(&self, field: &str) -> Result<f64, GeocodeError> {
    match self {
      Degrees::Number(n) => Ok(*n),
      Degrees::Text(s) => s.trim().parse::<f64>().map_err(|e| {
        GeocodeError::Provider(format!("unparseable {field} {s:?}: {e}"))
      }),
    }
  }
}

/// Decode a search response and take the first result, if any.
///
/// Only element 0 is decoded as a [`Place`]; later elements just have to be
/// valid JSON.
fn parse_top_match(body: &[u8]) -> Result<Option<Coordinate>, GeocodeError> {
  let results: Vec<serde_json::Value> = serde_json::from_slice(body)
    .map_err(|e| GeocodeError::Provider(format!("invalid response JSON: {e}")))?;

  let Some(first) = results.into_iter().next() else {
    return Ok(None);
  };
  let top: Place = serde_json::from_value(first)
    .map_err(|e| GeocodeError::Provider(format!("invalid top result: {e}")))?;

  let latitude = top.lat.parse("lat")?;
  let longitude = top.lon.parse("lon")?;
  Coordinate::new(latitude, longitude)
    .map(Some)
    .map_err(|e| GeocodeError::Provider(format!("provider returned {e}")))
}

fn transport_error(e: reqwest::Error) -> GeocodeError {
  if e.is_timeout() {
    GeocodeError::Provider(format!("request timed out: {e}"))
  } else {
    GeocodeError::Provider(format!("request failed: {e}"))
  }
}

fn status_error(status: StatusCode, body: &[u8]) -> GeocodeError {
  const PREVIEW_CHAR_LIMIT: usize = 160;

  let text = String::from_utf8_lossy(body);
  let preview: String = text.trim().chars().take(PREVIEW_CHAR_LIMIT).collect();
  if preview.is_empty() {
    GeocodeError::Provider(format!("status {}", status.as_u16()))
  } else {
    GeocodeError::Provider(format!("status {}: {preview}", status.as_u16()))
  }
}
