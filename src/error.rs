//! Error taxonomy shared by the engine, generator, structurer, and HTTP layer.
//!
//! Validation failures are the caller's fault and map to 400; everything the
//! model or storage does wrong maps to 500. Duplicate questions are never an
//! error (see `generator::QuestionOutcome`).

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  /// Caller input failed a precondition. Never retried.
  #[error("{0}")]
  Validation(String),

  /// No language model is configured (missing OPENAI_API_KEY).
  #[error("language model not configured (set OPENAI_API_KEY)")]
  NotConfigured,

  /// The model call itself failed (transport, HTTP status, empty choice).
  #[error("model call failed: {0}")]
  Upstream(String),

  /// Model output contained no `{...}` span at all.
  #[error("no JSON found in model response")]
  NoJson,

  /// Model output had a JSON span but it did not parse.
  #[error("invalid JSON from model: {0}")]
  Parse(#[from] serde_json::Error),

  /// Parsed JSON is missing one of the required fields.
  #[error("model response missing required field '{0}'")]
  MissingField(&'static str),

  /// Retry budget consumed without an acceptable result.
  #[error("failed after {attempts} attempts: {last}")]
  Exhausted { attempts: u32, last: String },

  #[error("storage error: {0}")]
  Storage(#[from] std::io::Error),

  #[error("not found: {0}")]
  NotFound(String),
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = match &self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn status_of(err: AppError) -> StatusCode {
    err.into_response().status()
  }

  #[test]
  fn caller_faults_map_to_client_statuses() {
    assert_eq!(status_of(AppError::Validation("too short".into())), StatusCode::BAD_REQUEST);
    assert_eq!(status_of(AppError::NotFound("syllabus x".into())), StatusCode::NOT_FOUND);
  }

  #[test]
  fn model_and_storage_faults_map_to_500() {
    assert_eq!(status_of(AppError::NoJson), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      status_of(AppError::Exhausted { attempts: 3, last: "x".into() }),
      StatusCode::INTERNAL_SERVER_ERROR,
    );
  }

  #[test]
  fn storage_failures_render_as_storage_errors() {
    // Persistence-side failures (IO or serialization wrapped as IO) must not
    // read as model-output problems at the boundary.
    let err: AppError = std::io::Error::other("disk full").into();
    assert_eq!(err.to_string(), "storage error: disk full");
    assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
