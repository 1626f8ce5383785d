//! JSON body extractor.
//!
//! Reads the raw request body and parses it as JSON, rejecting malformed
//! bodies with the API's own error shape (`400` with a `{"detail": ...}`
//! body) instead of the framework's default rejection.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::error::RestError;

/// Axum extractor for raw JSON request bodies.
///
/// The parsed value is handed to the serializer untyped; all shape
/// validation happens there, keyed per field.
///
/// # Example
///
/// ```rust,ignore
/// use gelato_rest::extractors::JsonBody;
///
/// async fn create_handler(JsonBody(body): JsonBody) {
///     println!("payload: {}", body);
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| RestError::BadRequest {
                message: format!("Failed to read request body: {}", err),
            })?;

        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(Self(value))
    }
}
