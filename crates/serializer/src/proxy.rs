//! The expandable proxy field.
//!
//! [`ExpandableProxy`] wraps two interchangeable representations of a
//! related record: a compact reference field (the record's id) and a full
//! nested [`Serializer`]. When the proxy is bound into its serializer it
//! decides, once, which of the two is live for the current request, and from
//! then on forwards every operation to the live alternative. The enclosing
//! serializer never learns a substitution occurred: validation errors,
//! renderings, and nested writes all surface exactly as if the live
//! alternative had been declared in the proxy's place.
//!
//! The decision is purely positional: the proxy is expanded iff some
//! requested expansion path names the field at exactly the proxy's binding
//! depth. With `expand=ice_cream.order`, the `ice_cream` proxy at depth 0
//! expands, and the `order` proxy inside its nested serializer (depth 1)
//! expands too; an `order` field anywhere else is untouched.

use serde_json::Value;
use tracing::debug;

use crate::context::BindingContext;
use crate::error::{SerializerError, SerializerResult};
use crate::field::Field;
use crate::serializer::Serializer;

/// A field that is either a compact reference or a full nested serializer,
/// selected per request.
pub struct ExpandableProxy {
    full: Serializer,
    compact: Box<dyn Field>,
    name: Option<String>,
    /// Memoized expansion decision; `None` until bound.
    expanded: Option<bool>,
}

impl ExpandableProxy {
    /// Wraps a full nested serializer and a compact reference field.
    ///
    /// Both alternatives must be bindable to the same field name; which one
    /// actually binds is decided in [`Field::bind`].
    pub fn new(full: Serializer, compact: impl Field + 'static) -> Self {
        Self {
            full,
            compact: Box::new(compact),
            name: None,
            expanded: None,
        }
    }

    /// The memoized expansion decision, if the proxy has been bound.
    pub fn expansion_decision(&self) -> Option<bool> {
        self.expanded
    }

    /// The live alternative. Fails if the proxy was never bound, which means
    /// it was used outside an enclosing serializer.
    fn live(&self) -> SerializerResult<&dyn Field> {
        match self.expanded {
            Some(true) => Ok(&self.full),
            Some(false) => Ok(self.compact.as_ref()),
            None => Err(SerializerError::Unbound {
                field: self
                    .name
                    .clone()
                    .unwrap_or_else(|| "<unbound proxy>".to_string()),
            }),
        }
    }
}

impl Field for ExpandableProxy {
    /// Resolves liveness and binds the live alternative under this name.
    ///
    /// Absent request context (introspection, schema generation) resolves to
    /// "not expanded" - never an error. The decision is computed here once
    /// and never revisited for the lifetime of the binding.
    fn bind(&mut self, name: &str, ctx: &BindingContext) -> SerializerResult<()> {
        let expanded = match ctx.request() {
            None => false,
            Some(request) => request.expand().requests(name, ctx.position()),
        };

        debug!(
            field = %name,
            position = ctx.position(),
            expanded = expanded,
            "Resolved expansion"
        );

        self.name = Some(name.to_string());
        self.expanded = Some(expanded);

        if expanded {
            self.full.bind(name, ctx)
        } else {
            self.compact.bind(name, ctx)
        }
    }

    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value> {
        self.live()?.to_internal_value(raw)
    }

    fn to_representation(&self, value: &Value) -> SerializerResult<Value> {
        self.live()?.to_representation(value)
    }

    fn read_only(&self) -> bool {
        self.live().map(Field::read_only).unwrap_or(false)
    }

    fn default_value(&self) -> Option<Value> {
        self.live().ok().and_then(|field| field.default_value())
    }

    fn create(&self, validated: Value) -> SerializerResult<Value> {
        self.live()?.create(validated)
    }

    fn update(&self, instance: &Value, validated: Value) -> SerializerResult<Value> {
        self.live()?.update(instance, validated)
    }

    fn writes_nested(&self) -> bool {
        self.expanded == Some(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ExpandSet, RequestContext};
    use crate::field::{BooleanField, IntegerField, PrimaryKeyRelatedField};
    use gelato_store::{MemoryStore, RecordStore};
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> Arc<dyn RecordStore> {
        Arc::new(MemoryStore::new())
    }

    fn order_proxy(store: Arc<dyn RecordStore>) -> ExpandableProxy {
        let full = Serializer::new("orders", store.clone())
            .field("id", IntegerField::new().read_only())
            .field("paid", BooleanField::new().default(false));
        ExpandableProxy::new(full, PrimaryKeyRelatedField::new("orders", store))
    }

    fn ctx(expand: &[&str]) -> BindingContext {
        BindingContext::root(Arc::new(RequestContext::new(ExpandSet::parse(expand))))
    }

    #[test]
    fn test_defaults_to_compact_without_expand() {
        let store = store();
        let order = store.insert("orders", json!({"paid": true})).unwrap();

        let mut proxy = order_proxy(store);
        proxy.bind("order", &ctx(&[])).unwrap();

        assert_eq!(proxy.expansion_decision(), Some(false));
        assert!(!proxy.writes_nested());
        assert_eq!(
            proxy.to_representation(&order["id"]).unwrap(),
            order["id"]
        );
    }

    #[test]
    fn test_expands_when_named_at_depth() {
        let store = store();
        let order = store.insert("orders", json!({"paid": true})).unwrap();

        let mut proxy = order_proxy(store);
        proxy.bind("order", &ctx(&["order"])).unwrap();

        assert_eq!(proxy.expansion_decision(), Some(true));
        assert!(proxy.writes_nested());
        assert_eq!(
            proxy.to_representation(&order["id"]).unwrap(),
            json!({"id": 1, "paid": true})
        );
    }

    #[test]
    fn test_deeper_segment_does_not_expand_shallow_field() {
        let mut proxy = order_proxy(store());
        // "order" appears at depth 1, not at this proxy's depth 0.
        proxy.bind("order", &ctx(&["ice_cream.order"])).unwrap();
        assert_eq!(proxy.expansion_decision(), Some(false));
    }

    #[test]
    fn test_expands_at_nested_depth() {
        let mut proxy = order_proxy(store());
        let nested = ctx(&["ice_cream.order"]).child();
        proxy.bind("order", &nested).unwrap();
        assert_eq!(proxy.expansion_decision(), Some(true));
    }

    #[test]
    fn test_detached_context_is_never_expanded() {
        let mut proxy = order_proxy(store());
        proxy.bind("order", &BindingContext::detached()).unwrap();
        assert_eq!(proxy.expansion_decision(), Some(false));
    }

    #[test]
    fn test_decision_is_memoized() {
        let store = store();
        store.insert("orders", json!({"paid": false})).unwrap();

        let mut proxy = order_proxy(store);
        proxy.bind("order", &ctx(&["order"])).unwrap();

        let first = proxy.expansion_decision();
        // Repeated operations resolve against the same decision.
        proxy.to_representation(&json!(1)).unwrap();
        proxy.to_internal_value(&json!({"paid": true})).unwrap();
        assert_eq!(proxy.expansion_decision(), first);
    }

    #[test]
    fn test_unbound_proxy_is_a_structural_error() {
        let proxy = order_proxy(store());
        let err = proxy.to_representation(&json!(1)).unwrap_err();
        assert!(matches!(err, SerializerError::Unbound { .. }));
    }

    #[test]
    fn test_parse_forwards_to_live_alternative() {
        let store = store();
        let order = store.insert("orders", json!({"paid": false})).unwrap();

        // Compact live: input must be an id.
        let mut compact = order_proxy(store.clone());
        compact.bind("order", &ctx(&[])).unwrap();
        assert_eq!(
            compact.to_internal_value(&order["id"]).unwrap(),
            order["id"]
        );
        assert!(compact.to_internal_value(&json!({"paid": true})).is_err());

        // Full live: input must be an object.
        let mut full = order_proxy(store);
        full.bind("order", &ctx(&["order"])).unwrap();
        assert_eq!(
            full.to_internal_value(&json!({"paid": true})).unwrap(),
            json!({"paid": true})
        );
        assert!(full.to_internal_value(&order["id"]).is_err());
    }

    #[test]
    fn test_create_on_compact_live_is_unsupported() {
        let mut proxy = order_proxy(store());
        proxy.bind("order", &ctx(&[])).unwrap();
        let err = proxy.create(json!({"paid": true})).unwrap_err();
        assert!(matches!(
            err,
            SerializerError::UnsupportedOperation { .. }
        ));
    }
}
