//! Resource declarations.
//!
//! Each resource is declared as a serializer factory: a function that builds
//! a fresh, unbound [`Serializer`] against the store. The
//! [`ResourceRegistry`] maps URL segments to these factories so the generic
//! handlers can serve any registered resource.
//!
//! The demo object graph:
//!
//! ```text
//! scoop ──> flavor
//!   └─────> ice_cream ──> order
//! ```
//!
//! Both scoop references and the ice cream's order reference are expandable:
//! they render as bare ids unless the request names them in the expand
//! parameter (`?expand=flavor`, `?expand=ice_cream.order`, ...), and when
//! expanded they also accept nested payloads on create/update.

use std::collections::HashMap;
use std::sync::Arc;

use gelato_serializer::{
    BooleanField, CharField, ExpandableProxy, IntegerField, PrimaryKeyRelatedField, Serializer,
};
use gelato_store::RecordStore;

/// Builds a serializer for one resource against the given store.
pub type SerializerFactory = fn(&Arc<dyn RecordStore>) -> Serializer;

/// Maps URL resource segments to serializer factories.
pub struct ResourceRegistry {
    entries: HashMap<&'static str, SerializerFactory>,
}

impl ResourceRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The registry for the demo ice cream API.
    pub fn demo() -> Self {
        Self::new()
            .register("flavors", flavor_serializer)
            .register("orders", order_serializer)
            .register("ice_creams", ice_cream_serializer)
            .register("scoops", scoop_serializer)
    }

    /// Registers a resource under a URL segment.
    pub fn register(mut self, resource: &'static str, factory: SerializerFactory) -> Self {
        self.entries.insert(resource, factory);
        self
    }

    /// Builds a fresh serializer for a URL segment, if registered.
    pub fn build(&self, resource: &str, store: &Arc<dyn RecordStore>) -> Option<Serializer> {
        self.entries.get(resource).map(|factory| factory(store))
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// `orders`: id, paid.
pub fn order_serializer(store: &Arc<dyn RecordStore>) -> Serializer {
    Serializer::new("orders", store.clone())
        .field("id", IntegerField::new().read_only())
        .field("paid", BooleanField::new().default(false))
}

/// `flavors`: id, flavor.
pub fn flavor_serializer(store: &Arc<dyn RecordStore>) -> Serializer {
    Serializer::new("flavors", store.clone())
        .field("id", IntegerField::new().read_only())
        .field("flavor", CharField::new())
}

/// `ice_creams`: id, order (expandable), with_waffle.
pub fn ice_cream_serializer(store: &Arc<dyn RecordStore>) -> Serializer {
    Serializer::new("ice_creams", store.clone())
        .field("id", IntegerField::new().read_only())
        .field(
            "order",
            ExpandableProxy::new(
                order_serializer(store),
                PrimaryKeyRelatedField::new("orders", store.clone()),
            ),
        )
        .field("with_waffle", BooleanField::new().default(true))
}

/// `scoops`: id, size, flavor (expandable), ice_cream (expandable).
pub fn scoop_serializer(store: &Arc<dyn RecordStore>) -> Serializer {
    Serializer::new("scoops", store.clone())
        .field("id", IntegerField::new().read_only())
        .field("size", IntegerField::new())
        .field(
            "flavor",
            ExpandableProxy::new(
                flavor_serializer(store),
                PrimaryKeyRelatedField::new("flavors", store.clone()),
            ),
        )
        .field(
            "ice_cream",
            ExpandableProxy::new(
                ice_cream_serializer(store),
                PrimaryKeyRelatedField::new("ice_creams", store.clone()),
            ),
        )
}
