//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! This is the only place where domain failures become HTTP statuses. Every
//! error body has the shape `{"detail": "<message>"}`.

use aqhi_core::reconcile::ReconcileError;
use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Internal(String),

  #[error("Database error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<ReconcileError> for ApiError {
  fn from(e: ReconcileError) -> Self {
    match e {
      ReconcileError::AddressNotFound(_) | ReconcileError::UserNotFound => {
        ApiError::NotFound(e.to_string())
      }
      ReconcileError::Geolocation(_)
      | ReconcileError::Lookup(_)
      | ReconcileError::Update(_) => ApiError::Internal(e.to_string()),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Internal(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "detail": self.to_string() }))).into_response()
  }
}
