//! Wiring for the AQHI location server: configuration and the top-level
//! router. The binary in `main.rs` owns process concerns (tracing, signals).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use aqhi_api::{Shared, api_router};
use aqhi_core::{
  geocode::Geocoder,
  store::{AlertStore, LocationStore},
};
use axum::Router;
use serde::Deserialize;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `AQHI_*` environment variables. Every key has a default.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                    String,
  pub port:                    u16,
  pub store_path:              PathBuf,
  /// Requests in flight across all routes before new ones wait.
  pub max_concurrent_requests: usize,
  pub geocoder:                GeocoderConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                    "127.0.0.1".to_string(),
      port:                    8000,
      store_path:              PathBuf::from("aqhi.db"),
      max_concurrent_requests: 64,
      geocoder:                GeocoderConfig::default(),
    }
  }
}

/// Settings for the Nominatim-compatible geocoding provider.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeocoderConfig {
  pub base_url:     String,
  pub user_agent:   String,
  pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
  fn default() -> Self {
    Self {
      base_url:     aqhi_geocode::DEFAULT_BASE_URL.to_string(),
      user_agent:   concat!("aqhi-server/", env!("CARGO_PKG_VERSION")).to_string(),
      timeout_secs: 10,
    }
  }
}

impl GeocoderConfig {
  pub fn timeout(&self) -> Duration { Duration::from_secs(self.timeout_secs) }
}

/// Load configuration from an optional TOML file at `path`, overridden by
/// environment variables such as `AQHI_PORT` or `AQHI_GEOCODER__BASE_URL`.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix("AQHI")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The complete application: the JSON API under `/api`, a global in-flight
/// request cap, and per-request tracing spans.
pub fn app<S, G>(reconciler: Shared<S, G>, config: &ServerConfig) -> Router
where
  S: LocationStore + AlertStore + 'static,
  G: Geocoder + 'static,
{
  Router::new()
    .nest("/api", api_router(reconciler))
    .layer(GlobalConcurrencyLimitLayer::new(config.max_concurrent_requests.max(1)))
    .layer(TraceLayer::new_for_http())
}
