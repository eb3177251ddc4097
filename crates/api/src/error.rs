//! Error responses for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use studio::StudioError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by handlers, rendered as
/// `{"error": {"message": ..., "type": ...}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// A third-party provider failed.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "auth_error",
            ApiError::BadRequest(_) => "invalid_request_error",
            ApiError::NotFound(_) => "not_found_error",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl From<StudioError> for ApiError {
    fn from(err: StudioError) -> Self {
        match err {
            StudioError::Validation(msg) => ApiError::BadRequest(msg),
            StudioError::NotFound(msg) => ApiError::NotFound(msg),
            StudioError::Image(e) => ApiError::Upstream(e.to_string()),
            StudioError::Database(e) => ApiError::Internal(e.to_string()),
            StudioError::Configuration(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Unauthorized => warn!("Unauthorized request"),
            ApiError::Upstream(msg) => warn!("Upstream error: {}", msg),
            ApiError::Internal(msg) => error!("Internal error: {}", msg),
            _ => {}
        }

        // Internal details stay in the log.
        let message = match &self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": {
                "message": message,
                "type": self.kind(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
