//! Update handlers: `PUT /{resource}/{id}` and `PATCH /{resource}/{id}`.
//!
//! PUT validates the full body; PATCH validates partially - fields missing
//! from the body are left untouched, at every nesting depth. Both write
//! through the serializer bound to the request's expansion context, so an
//! expanded field routes its sub-payload to the nested serializer's update.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::debug;

use gelato_serializer::{Field, RequestContext};

use crate::error::{RestError, RestResult};
use crate::extractors::{ExpandParams, JsonBody};
use crate::state::AppState;

/// Full update.
///
/// # Response
///
/// - `200 OK` - the rendered record
/// - `400 Bad Request` - validation failed; nothing was persisted
/// - `404 Not Found` - unknown resource or missing record
pub async fn update_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    expand: ExpandParams,
    JsonBody(body): JsonBody,
) -> RestResult<Response> {
    perform_update(&state, &resource, id, expand.into_context(), body)
}

/// Partial update. Same contract as [`update_handler`], but fields missing
/// from the body are skipped instead of required.
pub async fn partial_update_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, i64)>,
    expand: ExpandParams,
    JsonBody(body): JsonBody,
) -> RestResult<Response> {
    perform_update(&state, &resource, id, expand.into_partial_context(), body)
}

fn perform_update(
    state: &AppState,
    resource: &str,
    id: i64,
    context: Arc<RequestContext>,
    body: Value,
) -> RestResult<Response> {
    debug!(
        resource = %resource,
        id = id,
        partial = context.is_partial(),
        "Processing update request"
    );

    let mut serializer = state.serializer(resource)?;
    serializer.bind_root(context)?;

    let instance = state
        .store()
        .get(serializer.collection(), id)?
        .ok_or_else(|| RestError::NotFound {
            resource: resource.to_string(),
            id,
        })?;

    // Validation runs over the whole body before anything is persisted, so
    // a rejected request leaves the store untouched.
    let validated = serializer.to_internal_value(&body)?;
    let updated = serializer.update(&instance, validated)?;

    let body = serializer.represent(&updated)?;
    Ok((StatusCode::OK, Json(body)).into_response())
}
