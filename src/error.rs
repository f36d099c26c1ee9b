//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::ValidationError;
use crate::filter::PatternError;
use crate::store::StorageError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Message returned when the listing filter is missing or blank
pub const MISSING_FILTER_MESSAGE: &str =
    "The 'nameFilter' parameter is mandatory and cannot be empty.";

/// Prefix for invalid filter messages
const INVALID_FILTER_CONTEXT: &str = "The provided nameFilter";

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error(transparent)]
    InvalidPattern(#[from] PatternError),

    // Server errors (5xx)
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Contact listing exceeded {0:?}")]
    ListTimeout(Duration),
}

impl AppError {
    /// Attach the request path, producing a renderable error
    pub fn at(self, path: impl Into<String>) -> ApiError {
        ApiError {
            error: self,
            path: path.into(),
        }
    }

    /// HTTP status and client-facing message for this error
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            // 400 Bad Request
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.message.clone()),
            AppError::MalformedRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InvalidPattern(e) => (
                StatusCode::BAD_REQUEST,
                format!("{}: {}", INVALID_FILTER_CONTEXT, e),
            ),

            // 503 Service Unavailable
            AppError::ListTimeout(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Contact listing timed out".to_string(),
            ),

            // 500 Internal Server Error
            AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Contact storage is unavailable".to_string(),
            ),
        }
    }
}

/// Error response body
///
/// Every field is a string, `timestamp` in epoch milliseconds.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub timestamp: String,
    pub status: String,
    pub error: String,
    pub message: String,
    pub path: String,
}

/// An [`AppError`] bound to the request path it occurred on
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub path: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.error.status_and_message();

        if status.is_server_error() {
            tracing::error!(path = %self.path, error = %self.error, "Request failed");
        } else {
            tracing::warn!(path = %self.path, error = %self.error, "Request rejected");
        }

        let body = ErrorResponse {
            timestamp: Utc::now().timestamp_millis().to_string(),
            status: status.as_u16().to_string(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
            path: self.path,
        };

        (status, Json(body)).into_response()
    }
}
