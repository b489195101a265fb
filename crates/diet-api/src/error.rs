//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthenticated")]
  Unauthenticated,

  #[error("forbidden")]
  Forbidden,

  #[error("{0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<diet_core::Error> for ApiError {
  fn from(err: diet_core::Error) -> Self {
    use diet_core::Error as Core;
    match err {
      Core::Unauthenticated => Self::Unauthenticated,
      Core::Forbidden => Self::Forbidden,
      Core::MealNotFound(_) | Core::NoMeals(_) => Self::NotFound("Meal not found".into()),
      Core::Store(e) => Self::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
      ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
