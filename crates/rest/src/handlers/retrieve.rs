//! Retrieve handler: `GET /{resource}/{id}`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::ExpandParams;
use crate::state::AppState;

/// Reads a single record.
///
/// # Response
///
/// - `200 OK` - the rendered record; fields named by the expand parameter
///   at their depth are nested, everything else stays a bare id
/// - `404 Not Found` - unknown resource or missing record
pub async fn retrieve_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    expand: ExpandParams,
) -> RestResult<Response> {
    debug!(resource = %resource, id = id, "Processing retrieve request");

    let mut serializer = state.serializer(&resource)?;
    serializer.bind_root(expand.into_context())?;

    let record = state
        .store()
        .get(serializer.collection(), id)?
        .ok_or_else(|| RestError::NotFound {
            resource: resource.clone(),
            id,
        })?;

    let body = serializer.represent(&record)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}
