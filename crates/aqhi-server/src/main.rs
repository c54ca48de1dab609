//! aqhi-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite user store, and serves the location API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use aqhi_core::reconcile::LocationReconciler;
use aqhi_geocode::NominatimGeocoder;
use aqhi_server::{expand_tilde, load_config};
use aqhi_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "AQHI user-location server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(&cli.config)?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let geocoder = NominatimGeocoder::new(
    &server_cfg.geocoder.base_url,
    &server_cfg.geocoder.user_agent,
    server_cfg.geocoder.timeout(),
  )
  .context("failed to build geocoder")?;
  tracing::info!(base_url = %server_cfg.geocoder.base_url, "geocoder ready");

  let reconciler = Arc::new(LocationReconciler::new(store, geocoder));
  let app = aqhi_server::app(reconciler, &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shut down cleanly");
  Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::warn!("failed to listen for Ctrl-C: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut sig) => {
        sig.recv().await;
      }
      Err(e) => {
        tracing::warn!("failed to listen for SIGTERM: {e}");
        std::future::pending::<()>().await;
      }
    }
  };
  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {},
    () = terminate => {},
  }
  tracing::info!("shutdown signal received");
}
