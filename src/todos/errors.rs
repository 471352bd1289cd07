//! # Todo Errors
//!
//! Error types shared by the todo store and the HTTP handlers.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Result type for todo operations
pub type TodoResult<T> = Result<T, TodoError>;

/// Todo errors
#[derive(Debug, Error)]
pub enum TodoError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// No todo with the requested id
    #[error("Todo not found")]
    NotFound,

    /// A required field is absent from the payload
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Body is not valid JSON or a field has the wrong shape
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    /// Verb not supported on this resource
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Body exceeds the configured limit
    #[error("Request body too large")]
    PayloadTooLarge,

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Backing store failure
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Invariant broken inside the service
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TodoError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TodoError::NotFound => StatusCode::NOT_FOUND,
            TodoError::MissingField(_) => StatusCode::BAD_REQUEST,
            TodoError::BadRequest(_) => StatusCode::BAD_REQUEST,
            TodoError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            TodoError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            TodoError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TodoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for TodoError {
    fn from(err: serde_json::Error) -> Self {
        TodoError::BadRequest(err.to_string())
    }
}

impl From<BytesRejection> for TodoError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            TodoError::PayloadTooLarge
        } else {
            TodoError::BadRequest(rejection.body_text())
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Server-side failures are logged in full but answered with a fixed message
impl From<&TodoError> for ErrorResponse {
    fn from(err: &TodoError) -> Self {
        let error = if err.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            err.to_string()
        };
        Self { error }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}
