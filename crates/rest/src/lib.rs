//! # gelato-rest - JSON REST API with Expandable Fields
//!
//! This crate serves the gelato demo API over HTTP. Every registered
//! resource gets the standard CRUD routes, and every field declared as
//! expandable honors the `expand` query parameter: left alone it renders as
//! a bare record id, named in the parameter it renders (and, on writes,
//! persists) as a fully nested object.
//!
//! ```http
//! GET /scoops/1                          -> "flavor": 1, "ice_cream": 1
//! GET /scoops/1?expand=flavor            -> "flavor": {"id": 1, ...}
//! GET /scoops/1?expand=ice_cream.order   -> "ice_cream": {"order": {...}, ...}
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gelato_rest::{ServerConfig, create_app};
//! use gelato_store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let app = create_app(Arc::new(MemoryStore::new()));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`error`] - Error types and HTTP response mapping
//! - [`state`] - Application state (store, configuration, resources)
//! - [`extractors`] - Expansion parameter extraction
//! - [`resources`] - The demo resource declarations
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod resources;
pub mod routing;
pub mod state;

pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use gelato_store::RecordStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::resources::ResourceRegistry;

/// Creates the Axum application with default configuration and the demo
/// resources.
pub fn create_app(store: Arc<dyn RecordStore>) -> Router {
    create_app_with_config(store, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
pub fn create_app_with_config(store: Arc<dyn RecordStore>, config: ServerConfig) -> Router {
    info!(
        backend = store.backend_name(),
        "Creating REST API server"
    );

    let enable_cors = config.enable_cors;
    let cors_origins = config.cors_origins.clone();
    let request_timeout = config.request_timeout;

    let state = AppState::new(store, config, ResourceRegistry::demo());
    let router = routing::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(request_timeout),
        ));

    let router = if enable_cors {
        router.layer(build_cors_layer(&cors_origins))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer from the configured origins.
fn build_cors_layer(origins: &str) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gelato={},tower_http=debug", level)));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
