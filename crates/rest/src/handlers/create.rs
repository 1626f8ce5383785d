//! Create handler: `POST /{resource}`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use gelato_serializer::Field;

use crate::error::RestResult;
use crate::extractors::{ExpandParams, JsonBody};
use crate::state::AppState;

/// Creates a record.
///
/// The body is validated through the serializer bound to this request's
/// expansion context: a field expanded by the expand parameter accepts a
/// nested object and persists it through its own serializer before the outer
/// record is written, so `POST /scoops/?expand=ice_cream.order` creates the
/// order, then the ice cream referencing it, then the scoop. A field left
/// compact accepts a record id.
///
/// # Response
///
/// - `201 Created` - the rendered record, nesting whatever was expanded
/// - `400 Bad Request` - validation failed; the body mirrors the shape of
///   the invalid input
/// - `404 Not Found` - unknown resource
pub async fn create_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    expand: ExpandParams,
    JsonBody(body): JsonBody,
) -> RestResult<Response> {
    debug!(resource = %resource, "Processing create request");

    let mut serializer = state.serializer(&resource)?;
    serializer.bind_root(expand.into_context())?;

    let validated = serializer.to_internal_value(&body)?;
    let created = serializer.create(validated)?;

    debug!(
        resource = %resource,
        id = created["id"].as_i64(),
        "Created record"
    );

    let body = serializer.represent(&created)?;
    Ok((StatusCode::CREATED, Json(body)).into_response())
}
