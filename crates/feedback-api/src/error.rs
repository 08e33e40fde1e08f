//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use feedback_core::ValidationError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Always rendered as
/// `{"error": "<message>"}`. Malformed requests are 400; rejected batches
/// and store failures are 500.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("invalid evaluation: {0}")]
  Validation(ValidationError),

  #[error("store error: {0}")]
  Store(#[source] feedback_core::Error),
}

impl ApiError {
  /// Classify a backend error through the core taxonomy.
  pub fn store<E: Into<feedback_core::Error>>(e: E) -> Self { Self::from(e.into()) }
}

impl From<feedback_core::Error> for ApiError {
  fn from(e: feedback_core::Error) -> Self {
    match e {
      feedback_core::Error::Validation(v) => ApiError::Validation(v),
      other => ApiError::Store(other),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Validation(v) => {
        tracing::warn!(error = %v, "evaluation rejected");
        (StatusCode::INTERNAL_SERVER_ERROR, v.to_string())
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
