//! HTTP error mapping
//!
//! Handlers return [`ApiResult`]. Service errors arrive as
//! `musicbox_common::Error` and are mapped to a status by kind.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use musicbox_common::Error;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request: bad path segment, query parameter or form field (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Service layer error, mapped by kind
    ///
    /// NotFound is 404, InvalidInput is 400, a unique violation is 409 and
    /// everything else is 500.
    #[error(transparent)]
    Common(#[from] Error),
}

impl ApiError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Common(err) => {
                let message = err.to_string();
                match err {
                    Error::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", message),
                    Error::InvalidInput(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", message),
                    Error::Database(ref db_err) if is_unique_violation(db_err) => {
                        (StatusCode::CONFLICT, "CONFLICT", message)
                    }
                    Error::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR", message),
                    Error::DanglingReference { .. } => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "DANGLING_REFERENCE", message)
                    }
                    Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR", message),
                    Error::Config(_) | Error::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
                    }
                }
            }
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();

        if status.is_server_error() {
            error!("{} {}: {}", status.as_u16(), error_code, message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
