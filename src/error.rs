//! Error types for SafeView Core.
//!
//! Defines a unified error type that maps cleanly to HTTP responses. A
//! provider failure on the moderation path is deliberately NOT here - it
//! becomes the `Error` verdict in a 200 response, which the Presenter
//! renders as its third display branch.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error type for SafeView Core operations.
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error response body for API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ModerationError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            ModerationError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            ModerationError::Serialization(e) => (
                StatusCode::BAD_REQUEST,
                "SERIALIZATION_ERROR",
                "Failed to process request/response".to_string(),
                Some(e.to_string()),
            ),
        };

        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for moderation operations.
pub type ModerationResult<T> = Result<T, ModerationError>;
