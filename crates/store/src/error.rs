//! Error types for the storage layer.

use thiserror::Error;

/// The primary error type for storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The requested record was not found in its collection.
    #[error("record not found: {collection}/{id}")]
    NotFound {
        /// The collection name (e.g., "scoops").
        collection: String,
        /// The record id.
        id: i64,
    },

    /// The record content was not a JSON object.
    #[error("invalid record for collection '{collection}': {message}")]
    InvalidRecord {
        /// The collection name.
        collection: String,
        /// What was wrong with the record.
        message: String,
    },
}

impl StoreError {
    /// Convenience constructor for [`StoreError::NotFound`].
    pub fn not_found(collection: impl Into<String>, id: i64) -> Self {
        StoreError::NotFound {
            collection: collection.into(),
            id,
        }
    }
}

/// Result type alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found("scoops", 7);
        assert_eq!(err.to_string(), "record not found: scoops/7");
    }

    #[test]
    fn test_invalid_record_display() {
        let err = StoreError::InvalidRecord {
            collection: "orders".to_string(),
            message: "expected an object".to_string(),
        };
        assert!(err.to_string().contains("orders"));
        assert!(err.to_string().contains("expected an object"));
    }
}
