//! Delete handler: `DELETE /{resource}/{id}`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::state::AppState;

/// Deletes a record.
///
/// # Response
///
/// - `204 No Content` - record deleted
/// - `404 Not Found` - unknown resource or missing record
pub async fn delete_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
) -> RestResult<Response> {
    debug!(resource = %resource, id = id, "Processing delete request");

    // Resolve the resource segment first so an unknown resource reports
    // itself rather than a missing record.
    let serializer = state.serializer(&resource)?;
    state.store().remove(serializer.collection(), id)?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
