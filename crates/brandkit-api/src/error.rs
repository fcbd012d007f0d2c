//! API error type, the response envelope, and the
//! [`axum::response::IntoResponse`] implementation.
//!
//! Every response body is `{"success":true,"data":…}` or
//! `{"success":false,"error":…}`. Internal and external-service failures are
//! logged server-side in full and answered with a generic message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use brandkit_core::{engine::EngineError, store::BrandStore};

/// The success half of the envelope.
pub fn success<T: Serialize>(data: T) -> Json<serde_json::Value> {
  Json(json!({ "success": true, "data": data }))
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// First validation violation only; later ones are never reported.
  #[error("{0}")]
  Validation(String),

  #[error("authentication required")]
  Unauthenticated,

  /// Also covers ownership mismatches — a wrong owner sees the same 404 as
  /// an absent slug.
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("external service error")]
  External(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn internal<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Internal(Box::new(err))
  }

  /// Map a store error, translating uniqueness conflicts to 409.
  pub fn from_store<S: BrandStore>(err: S::Error) -> Self {
    if S::is_conflict(&err) {
      Self::Conflict(err.to_string())
    } else {
      Self::internal(err)
    }
  }
}

impl From<EngineError> for ApiError {
  fn from(err: EngineError) -> Self {
    match err {
      EngineError::NoCompleteEvidence => {
        Self::Validation("at least one complete evidence item is required".to_string())
      }
      EngineError::AnalysisInProgress => {
        Self::Conflict("ANALYSIS_IN_PROGRESS".to_string())
      }
      EngineError::UnknownSection(s) => {
        Self::Validation(format!("unknown brain section: {s}"))
      }
      EngineError::Store(e) => Self::Internal(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Unauthenticated => {
        (StatusCode::UNAUTHORIZED, "authentication required".to_string())
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::External(e) => {
        tracing::error!(error = %e, "external service failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          "external service error".to_string(),
        )
      }
      ApiError::Internal(e) => {
        tracing::error!(error = %e, "internal error");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
      }
    };
    (status, Json(json!({ "success": false, "error": message }))).into_response()
  }
}
