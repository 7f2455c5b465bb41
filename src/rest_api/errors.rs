//! # REST API Errors
//!
//! Error types for the REST API module and their JSON envelopes.
//!
//! - datastore failures: 400 `{"error": true, "data": {"code", "message"}}`
//! - everything else: `{"error": true, "message": "..."}` with its own status

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::store::errors::StoreErrorDetails;
use crate::store::StoreError;

/// Message returned when a shabad query matches nothing
pub const SHABAD_NOT_FOUND: &str = "Shabad does not exist or has no updates.";

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;

/// REST API errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RestError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Invalid query parameter
    #[error("Invalid query parameter: {0}")]
    InvalidQueryParam(String),

    /// Invalid path parameter
    #[error("Invalid path parameter: {0}")]
    InvalidPathParam(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    // ==================
    // Datastore Errors
    // ==================
    /// Query, connection or decode failure, surfaced to the client
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl RestError {
    pub fn shabad_not_found() -> Self {
        RestError::NotFound(SHABAD_NOT_FOUND.to_string())
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::InvalidQueryParam(_) => StatusCode::BAD_REQUEST,
            RestError::InvalidPathParam(_) => StatusCode::BAD_REQUEST,
            RestError::NotFound(_) => StatusCode::NOT_FOUND,
            RestError::Store(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StoreErrorDetails>,
}

impl From<&RestError> for ErrorResponse {
    fn from(err: &RestError) -> Self {
        match err {
            RestError::Store(store) => Self {
                error: true,
                message: None,
                data: Some(store.details()),
            },
            RestError::NotFound(message) => Self {
                error: true,
                message: Some(message.clone()),
                data: None,
            },
            other => Self {
                error: true,
                message: Some(other.to_string()),
                data: None,
            },
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(&self));
        (status, body).into_response()
    }
}
