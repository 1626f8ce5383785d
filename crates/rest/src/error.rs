//! Error types for the REST API.
//!
//! This module defines the error type returned by all handlers, with
//! automatic conversion to HTTP responses.
//!
//! # Error Mapping
//!
//! | Error | HTTP Status | Body |
//! |-------|-------------|------|
//! | NotFound | 404 | `{"detail": ...}` |
//! | UnknownResource | 404 | `{"detail": ...}` |
//! | Validation | 400 | the nested error tree, keyed like the input |
//! | BadRequest | 400 | `{"detail": ...}` |
//! | Internal | 500 | `{"detail": ...}` |
//!
//! Validation responses carry the full nested error structure produced by
//! the serialization layer, so a failure deep inside an expanded write
//! surfaces as e.g. `{"ice_cream": {"order": {"paid": [...]}}}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use gelato_serializer::{SerializerError, ValidationError};
use gelato_store::StoreError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Record not found (HTTP 404).
    NotFound {
        /// The resource segment (e.g., "scoops").
        resource: String,
        /// The record id.
        id: i64,
    },

    /// The URL names a resource that is not registered (HTTP 404).
    UnknownResource {
        /// The resource segment from the URL.
        resource: String,
    },

    /// The request body was rejected (HTTP 400).
    Validation(ValidationError),

    /// Malformed request (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    Internal {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { resource, id } => {
                write!(f, "Not found: {}/{}", resource, id)
            }
            RestError::UnknownResource { resource } => {
                write!(f, "Unknown resource: {}", resource)
            }
            RestError::Validation(err) => write!(f, "{}", err),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        match self {
            RestError::Validation(err) => {
                (StatusCode::BAD_REQUEST, Json(err.into_detail())).into_response()
            }
            RestError::NotFound { resource, id } => detail_response(
                StatusCode::NOT_FOUND,
                format!("Record {}/{} not found.", resource, id),
            ),
            RestError::UnknownResource { resource } => detail_response(
                StatusCode::NOT_FOUND,
                format!("Unknown resource '{}'.", resource),
            ),
            RestError::BadRequest { message } => {
                detail_response(StatusCode::BAD_REQUEST, message)
            }
            RestError::Internal { message } => {
                detail_response(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

/// A `{"detail": ...}` response body with the given status.
fn detail_response(status: StatusCode, detail: String) -> Response {
    (status, Json(serde_json::json!({ "detail": detail }))).into_response()
}

impl From<StoreError> for RestError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => RestError::NotFound {
                resource: collection,
                id,
            },
            StoreError::InvalidRecord { .. } => RestError::Internal {
                message: err.to_string(),
            },
        }
    }
}

impl From<SerializerError> for RestError {
    fn from(err: SerializerError) -> Self {
        match err {
            SerializerError::Validation(err) => RestError::Validation(err),
            SerializerError::Store(err) => err.into(),
            // Unbound fields and unsupported operations are programming
            // errors in the serializer declarations, not request input.
            SerializerError::Unbound { .. } | SerializerError::UnsupportedOperation { .. } => {
                RestError::Internal {
                    message: err.to_string(),
                }
            }
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        RestError::Validation(err)
    }
}

impl From<serde_json::Error> for RestError {
    fn from(err: serde_json::Error) -> Self {
        RestError::BadRequest {
            message: format!("Invalid JSON: {}", err),
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
