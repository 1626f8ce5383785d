//! List handler: `GET /{resource}`.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::RestResult;
use crate::extractors::ExpandParams;
use crate::state::AppState;

/// Lists every record of a resource.
///
/// The whole collection is rendered through one serializer bound once for
/// the request, so expansion decisions are identical for every element and
/// identical to a single-record retrieve with the same expand parameter.
///
/// # Response
///
/// - `200 OK` - JSON array of rendered records
/// - `404 Not Found` - unknown resource
pub async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    expand: ExpandParams,
) -> RestResult<Response> {
    debug!(resource = %resource, "Processing list request");

    let mut serializer = state.serializer(&resource)?;
    serializer.bind_root(expand.into_context())?;

    let records = state.store().list(serializer.collection())?;
    let body = serializer.represent_many(&records)?;

    Ok((StatusCode::OK, Json(body)).into_response())
}
