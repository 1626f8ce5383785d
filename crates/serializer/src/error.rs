//! Error types for the serialization layer.
//!
//! Two kinds of failure flow through this crate and they are kept as
//! separate types because they mean different things to callers:
//!
//! - [`ValidationError`] - the request body was rejected. Carries a tree of
//!   messages mirroring the shape of the input, so a failure three levels
//!   deep surfaces as `{"ice_cream": {"order": {"paid": [...]}}}`.
//! - [`SerializerError`] - the serializer itself could not do its job:
//!   structural misconfiguration, an operation the live field does not
//!   support, or a storage failure during nested persistence.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use gelato_store::StoreError;

/// A node in a validation error tree.
///
/// Leaves are lists of human-readable messages for a single value; branches
/// key sub-errors by field name. The untagged serialization produces exactly
/// the nested JSON shape of the input that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Messages attached to a single value.
    Messages(Vec<String>),
    /// Errors keyed by field name.
    Fields(BTreeMap<String, ErrorDetail>),
}

/// A rejected request body.
///
/// Produced by field and serializer parsing; composes naturally across
/// nesting levels because a nested serializer's error becomes one entry in
/// its parent's [`ErrorDetail::Fields`] map.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationError {
    detail: ErrorDetail,
}

impl ValidationError {
    /// A single message for a single value.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            detail: ErrorDetail::Messages(vec![message.into()]),
        }
    }

    /// Errors keyed by field name.
    pub fn fields(fields: BTreeMap<String, ErrorDetail>) -> Self {
        Self {
            detail: ErrorDetail::Fields(fields),
        }
    }

    /// Borrows the error tree.
    pub fn detail(&self) -> &ErrorDetail {
        &self.detail
    }

    /// Consumes the error, yielding the tree.
    pub fn into_detail(self) -> ErrorDetail {
        self.detail
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(&self.detail) {
            Ok(json) => write!(f, "validation failed: {}", json),
            Err(_) => write!(f, "validation failed"),
        }
    }
}

/// The primary error type for serializer operations.
#[derive(Error, Debug)]
pub enum SerializerError {
    /// A field was used before being bound into an enclosing serializer.
    ///
    /// Expansion always operates on a field nested under some object, so an
    /// unbound expandable field is a programming error, not request input.
    #[error("field '{field}' was never bound to a serializer")]
    Unbound {
        /// The field (or serializer) involved.
        field: String,
    },

    /// The live field does not support the requested operation.
    ///
    /// Raised when nested create/update is delegated to a field that has no
    /// nested form, e.g. a compact reference field.
    #[error("field '{field}' does not support {operation}")]
    UnsupportedOperation {
        /// The field involved.
        field: String,
        /// The operation that was attempted ("create" or "update").
        operation: &'static str,
    },

    /// The request body was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage failure during persistence.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias for serializer operations.
pub type SerializerResult<T> = Result<T, SerializerError>;
