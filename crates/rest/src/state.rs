//! Application state.
//!
//! The shared state available to all request handlers: the record store,
//! the server configuration, and the resource registry that maps URL
//! segments to serializer declarations.

use std::sync::Arc;

use gelato_serializer::Serializer;
use gelato_store::RecordStore;

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};
use crate::resources::ResourceRegistry;

/// Shared application state for the REST API.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn RecordStore>,
    config: Arc<ServerConfig>,
    registry: Arc<ResourceRegistry>,
}

impl AppState {
    /// Creates a new state with the given store, configuration and
    /// resources.
    pub fn new(
        store: Arc<dyn RecordStore>,
        config: ServerConfig,
        registry: ResourceRegistry,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds a fresh, unbound serializer for the given URL resource
    /// segment.
    ///
    /// Serializers are per-request objects: every request constructs its own
    /// and binds it to that request's context.
    pub fn serializer(&self, resource: &str) -> RestResult<Serializer> {
        self.registry
            .build(resource, &self.store)
            .ok_or_else(|| RestError::UnknownResource {
                resource: resource.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gelato_store::MemoryStore;

    fn state() -> AppState {
        AppState::new(
            Arc::new(MemoryStore::new()),
            ServerConfig::for_testing(),
            ResourceRegistry::demo(),
        )
    }

    #[test]
    fn test_known_resource_builds_serializer() {
        let state = state();
        let serializer = state.serializer("scoops").unwrap();
        assert_eq!(serializer.collection(), "scoops");
    }

    #[test]
    fn test_unknown_resource_fails() {
        let state = state();
        let err = state.serializer("cones").unwrap_err();
        assert!(matches!(err, RestError::UnknownResource { .. }));
    }

    #[test]
    fn test_state_is_cloneable() {
        let state = state();
        let cloned = state.clone();
        assert_eq!(
            state.config().expand_param,
            cloned.config().expand_param
        );
    }
}
