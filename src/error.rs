//! Error types for the completion server
//!
//! Upstream failures never reach this type: the cache layer turns them into
//! sentinel values. What remains are request validation errors and
//! unexpected internal failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Api Error Enum ==
/// Error type returned at the router boundary.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed path parameter
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self {
            ApiError::InvalidRequest(msg) => msg,
            // Internal details stay in the logs
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                "Internal server error".to_string()
            }
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the completion server.
pub type Result<T> = std::result::Result<T, ApiError>;
