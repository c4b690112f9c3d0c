// server/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use teamkit_core::EngineError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Bad Request: {0}")]
  BadRequest(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error(transparent)]
  Engine(#[from] EngineError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// HTTP status for each engine error class. The idempotency guards
  /// (already approved, already paid, duplicates, locked orders) are 400s;
  /// their `code` field lets clients treat them as success-adjacent.
  fn engine_status(err: &EngineError) -> StatusCode {
    match err {
      EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
      EngineError::Forbidden { .. } => StatusCode::FORBIDDEN,
      EngineError::Validation { .. }
      | EngineError::AlreadyApproved
      | EngineError::DuplicateContribution
      | EngineError::OrderAlreadyPaid
      | EngineError::OrderLocked
      | EngineError::NoProductAvailable => StatusCode::BAD_REQUEST,
      EngineError::Dependency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
      AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Engine(e) => Self::engine_status(e),
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::BadRequest(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"}))
      }
      AppError::Engine(e) => {
        // Dependency failures hide their source from clients; everything
        // else is safe to echo alongside its stable machine code.
        let body = match e {
          EngineError::Dependency { .. } => {
            json!({"error": "An upstream dependency failed", "code": e.code()})
          }
          _ => json!({"error": e.to_string(), "code": e.code()}),
        };
        HttpResponse::build(Self::engine_status(e)).json(body)
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
