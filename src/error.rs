//! Error types for the posting service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Store Error Enum ==
/// Failures reported by a backing store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected the write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

// == Service Error Enum ==
/// Unified error type for the posting service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Invalid caller input (empty or oversized content, blank username)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Username unknown to the cache as of the last rebuild
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing store unreachable
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Backing store rejected a write
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
            StoreError::ConstraintViolation(msg) => ServiceError::ConstraintViolation(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServiceError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServiceError::StoreUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            ServiceError::ConstraintViolation(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg.clone())
            }
            ServiceError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the posting service.
pub type Result<T> = std::result::Result<T, ServiceError>;
