//! Route configuration.
//!
//! Defines all routes for the gelato REST API.

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Creates all REST API routes.
///
/// # Routes
///
/// - `GET /health` - Health check
/// - `GET /{resource}` - List
/// - `POST /{resource}` - Create
/// - `GET /{resource}/{id}` - Retrieve
/// - `PUT /{resource}/{id}` - Update
/// - `PATCH /{resource}/{id}` - Partial update
/// - `DELETE /{resource}/{id}` - Delete
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/{resource}", get(handlers::list_handler))
        .route("/{resource}", post(handlers::create_handler))
        .route("/{resource}/{id}", get(handlers::retrieve_handler))
        .route("/{resource}/{id}", put(handlers::update_handler))
        .route("/{resource}/{id}", patch(handlers::partial_update_handler))
        .route("/{resource}/{id}", delete(handlers::delete_handler))
        .with_state(state)
}
