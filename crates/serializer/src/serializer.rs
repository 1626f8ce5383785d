//! The serializer itself.
//!
//! A [`Serializer`] is an ordered set of named fields describing how records
//! of one collection are rendered and written. It is constructed per request
//! with the builder methods, bound once to the request context, and then
//! drives both directions of the data flow:
//!
//! - read: [`Serializer::represent`] asks every field for its
//!   representation of the record's attribute;
//! - write: [`Field::to_internal_value`] validates the body (collecting a
//!   nested error tree), then [`Field::create`]/[`Field::update`] run the
//!   nested write passes and persist through the store.
//!
//! `Serializer` implements [`Field`], which is what lets one serializer act
//! as the full alternative of an expandable field inside another.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use gelato_store::{RecordStore, StoreError};

use crate::context::{BindingContext, RequestContext};
use crate::error::{ErrorDetail, SerializerError, SerializerResult, ValidationError};
use crate::field::Field;
use crate::nested;

/// An ordered set of named fields over the records of one collection.
pub struct Serializer {
    collection: String,
    fields: Vec<(String, Box<dyn Field>)>,
    store: Arc<dyn RecordStore>,
    name: Option<String>,
    bound: Option<BindingContext>,
}

impl Serializer {
    /// A serializer for `collection`, persisting through `store`.
    pub fn new(collection: impl Into<String>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            collection: collection.into(),
            fields: Vec::new(),
            store,
            name: None,
            bound: None,
        }
    }

    /// Declares a field. Declaration order is preserved everywhere: in the
    /// rendered output, in validation, and in the nested write passes.
    pub fn field(mut self, name: impl Into<String>, field: impl Field + 'static) -> Self {
        self.fields.push((name.into(), Box::new(field)));
        self
    }

    /// The collection this serializer reads and writes.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Binds every field at depth 0 for one request.
    ///
    /// Must be called exactly once before the serializer is used; each field
    /// resolves and memoizes its per-request state here.
    pub fn bind_root(&mut self, request: Arc<RequestContext>) -> SerializerResult<()> {
        self.bind_fields(BindingContext::root(request))
    }

    /// Binds every field with no request attached. Expansion decisions all
    /// resolve to "not expanded"; useful for introspection and tests.
    pub fn bind_detached(&mut self) -> SerializerResult<()> {
        self.bind_fields(BindingContext::detached())
    }

    fn bind_fields(&mut self, ctx: BindingContext) -> SerializerResult<()> {
        for (name, field) in &mut self.fields {
            field.bind(name, &ctx)?;
        }
        self.bound = Some(ctx);
        Ok(())
    }

    /// Renders one record into its response representation.
    pub fn represent(&self, record: &Value) -> SerializerResult<Value> {
        self.require_bound()?;
        let mut out = Map::new();
        for (name, field) in &self.fields {
            let value = record.get(name).cloned().unwrap_or(Value::Null);
            out.insert(name.clone(), field.to_representation(&value)?);
        }
        Ok(Value::Object(out))
    }

    /// Renders a collection of records.
    ///
    /// The same bound serializer renders every element, so a field's
    /// expansion decision is identical whether the record is rendered alone
    /// or inside a list.
    pub fn represent_many(&self, records: &[Value]) -> SerializerResult<Value> {
        records
            .iter()
            .map(|record| self.represent(record))
            .collect::<SerializerResult<Vec<_>>>()
            .map(Value::from)
    }

    fn require_bound(&self) -> SerializerResult<&BindingContext> {
        self.bound
            .as_ref()
            .ok_or_else(|| SerializerError::Unbound {
                field: self.display_name().to_string(),
            })
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.collection)
    }

    /// Resolves an instance argument to the underlying record: a record
    /// object is taken as-is, an integer id is fetched from the store.
    fn resolve_instance(&self, instance: &Value) -> SerializerResult<Value> {
        match instance {
            Value::Object(_) => Ok(instance.clone()),
            Value::Number(_) => {
                let id = instance.as_i64().ok_or_else(|| self.invalid_record_ref())?;
                self.store
                    .get(&self.collection, id)?
                    .ok_or_else(|| StoreError::not_found(&self.collection, id).into())
            }
            _ => Err(self.invalid_record_ref()),
        }
    }

    fn invalid_record_ref(&self) -> SerializerError {
        StoreError::InvalidRecord {
            collection: self.collection.clone(),
            message: "expected a record object or an integer id".to_string(),
        }
        .into()
    }

    fn into_object(&self, value: Value) -> SerializerResult<Map<String, Value>> {
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(self.invalid_record_ref()),
        }
    }
}

impl Field for Serializer {
    fn bind(&mut self, name: &str, ctx: &BindingContext) -> SerializerResult<()> {
        self.name = Some(name.to_string());
        // This serializer occupies one level of the object graph, so its own
        // fields sit one step deeper than the field it is bound to.
        self.bind_fields(ctx.child())
    }

    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value> {
        let ctx = self.require_bound()?;
        let partial = ctx.is_partial();

        let input = raw.as_object().ok_or_else(|| {
            SerializerError::from(ValidationError::message("Invalid data. Expected an object."))
        })?;

        let mut validated = Map::new();
        let mut errors: BTreeMap<String, ErrorDetail> = BTreeMap::new();

        for (name, field) in &self.fields {
            if field.read_only() {
                continue;
            }
            match input.get(name) {
                Some(value) => match field.to_internal_value(value) {
                    Ok(parsed) => {
                        validated.insert(name.clone(), parsed);
                    }
                    Err(SerializerError::Validation(err)) => {
                        errors.insert(name.clone(), err.into_detail());
                    }
                    Err(other) => return Err(other),
                },
                None if partial => {}
                None => match field.default_value() {
                    Some(default) => {
                        validated.insert(name.clone(), default);
                    }
                    None => {
                        errors.insert(
                            name.clone(),
                            ErrorDetail::Messages(vec!["This field is required.".to_string()]),
                        );
                    }
                },
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(validated))
        } else {
            Err(ValidationError::fields(errors).into())
        }
    }

    fn to_representation(&self, value: &Value) -> SerializerResult<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Object(_) => self.represent(value),
            Value::Number(_) => {
                let record = self.resolve_instance(value)?;
                self.represent(&record)
            }
            _ => Err(self.invalid_record_ref()),
        }
    }

    fn create(&self, validated: Value) -> SerializerResult<Value> {
        self.require_bound()?;
        let mut data = self.into_object(validated)?;

        nested::create_pass(&self.fields, &mut data)?;
        let data = nested::flatten_relations(&self.collection, &self.fields, data)?;

        let record = self.store.insert(&self.collection, Value::Object(data))?;
        debug!(
            collection = %self.collection,
            id = record["id"].as_i64(),
            "Created record"
        );
        Ok(record)
    }

    fn update(&self, instance: &Value, validated: Value) -> SerializerResult<Value> {
        self.require_bound()?;
        let current = self.resolve_instance(instance)?;
        let mut data = self.into_object(validated)?;

        nested::update_pass(&self.fields, &current, &mut data)?;
        let data = nested::flatten_relations(&self.collection, &self.fields, data)?;

        let id = nested::record_id(&self.collection, &current)?;
        let mut merged = self.into_object(current)?;
        for (key, value) in data {
            merged.insert(key, value);
        }

        let record = self.store.save(&self.collection, id, Value::Object(merged))?;
        debug!(collection = %self.collection, id = id, "Updated record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ExpandSet;
    use crate::field::{BooleanField, CharField, IntegerField, PrimaryKeyRelatedField};
    use crate::proxy::ExpandableProxy;
    use gelato_store::MemoryStore;
    use serde_json::json;

    fn store() -> Arc<dyn RecordStore> {
        Arc::new(MemoryStore::new())
    }

    fn order_serializer(store: Arc<dyn RecordStore>) -> Serializer {
        Serializer::new("orders", store)
            .field("id", IntegerField::new().read_only())
            .field("paid", BooleanField::new().default(false))
    }

    fn ice_cream_serializer(store: Arc<dyn RecordStore>) -> Serializer {
        Serializer::new("ice_creams", store.clone())
            .field("id", IntegerField::new().read_only())
            .field(
                "order",
                ExpandableProxy::new(
                    order_serializer(store.clone()),
                    PrimaryKeyRelatedField::new("orders", store),
                ),
            )
            .field("with_waffle", BooleanField::new().default(true))
    }

    fn request(expand: &[&str]) -> Arc<RequestContext> {
        Arc::new(RequestContext::new(ExpandSet::parse(expand)))
    }

    fn validation_detail(err: SerializerError) -> Value {
        match err {
            SerializerError::Validation(e) => serde_json::to_value(e.detail()).unwrap(),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_represent_flat_record() {
        let store = store();
        let mut serializer = Serializer::new("flavors", store.clone())
            .field("id", IntegerField::new().read_only())
            .field("flavor", CharField::new());
        serializer.bind_root(request(&[])).unwrap();

        let record = store.insert("flavors", json!({"flavor": "vanilla"})).unwrap();
        let rendered = serializer.represent(&record).unwrap();
        assert_eq!(rendered, json!({"id": 1, "flavor": "vanilla"}));
    }

    #[test]
    fn test_unbound_serializer_fails() {
        let serializer = Serializer::new("flavors", store());
        let err = serializer.represent(&json!({})).unwrap_err();
        assert!(matches!(err, SerializerError::Unbound { .. }));
    }

    #[test]
    fn test_validation_collects_field_errors() {
        let store = store();
        let mut serializer = order_serializer(store);
        serializer.bind_root(request(&[])).unwrap();

        let err = serializer
            .to_internal_value(&json!({"paid": "nope"}))
            .unwrap_err();
        assert_eq!(
            validation_detail(err),
            json!({"paid": ["Must be a valid boolean."]})
        );
    }

    #[test]
    fn test_validation_applies_defaults() {
        let store = store();
        let mut serializer = order_serializer(store);
        serializer.bind_root(request(&[])).unwrap();

        let validated = serializer.to_internal_value(&json!({})).unwrap();
        assert_eq!(validated, json!({"paid": false}));
    }

    #[test]
    fn test_validation_requires_fields_without_default() {
        let store = store();
        let mut serializer = Serializer::new("scoops", store)
            .field("size", IntegerField::new());
        serializer.bind_root(request(&[])).unwrap();

        let err = serializer.to_internal_value(&json!({})).unwrap_err();
        assert_eq!(
            validation_detail(err),
            json!({"size": ["This field is required."]})
        );
    }

    #[test]
    fn test_partial_validation_skips_missing_fields() {
        let store = store();
        let mut serializer = order_serializer(store);
        serializer
            .bind_root(Arc::new(
                RequestContext::new(ExpandSet::none()).partial(true),
            ))
            .unwrap();

        let validated = serializer.to_internal_value(&json!({})).unwrap();
        assert_eq!(validated, json!({}));
    }

    #[test]
    fn test_read_only_fields_are_ignored_on_write() {
        let store = store();
        let mut serializer = order_serializer(store);
        serializer.bind_root(request(&[])).unwrap();

        let validated = serializer
            .to_internal_value(&json!({"id": 99, "paid": true}))
            .unwrap();
        assert_eq!(validated, json!({"paid": true}));
    }

    #[test]
    fn test_nested_validation_error_shape() {
        let store = store();
        let mut serializer = ice_cream_serializer(store);
        serializer.bind_root(request(&["order"])).unwrap();

        let err = serializer
            .to_internal_value(&json!({"order": {"paid": "Invalid boolean"}}))
            .unwrap_err();
        assert_eq!(
            validation_detail(err),
            json!({"order": {"paid": ["Must be a valid boolean."]}})
        );
    }

    #[test]
    fn test_create_persists_nested_records_first() {
        let store = store();
        let mut serializer = ice_cream_serializer(store.clone());
        serializer.bind_root(request(&["order"])).unwrap();

        let validated = serializer
            .to_internal_value(&json!({"order": {"paid": true}}))
            .unwrap();
        let record = serializer.create(validated).unwrap();

        // The order was created and the ice cream stores its id.
        assert_eq!(record, json!({"id": 1, "order": 1, "with_waffle": true}));
        let order = store.get("orders", 1).unwrap().unwrap();
        assert_eq!(order, json!({"id": 1, "paid": true}));
    }

    #[test]
    fn test_create_compact_stores_reference() {
        let store = store();
        let order = store.insert("orders", json!({"paid": false})).unwrap();

        let mut serializer = ice_cream_serializer(store.clone());
        serializer.bind_root(request(&[])).unwrap();

        let validated = serializer
            .to_internal_value(&json!({"order": order["id"]}))
            .unwrap();
        let record = serializer.create(validated).unwrap();
        assert_eq!(record["order"], order["id"]);
        assert_eq!(store.count("orders").unwrap(), 1);
    }

    #[test]
    fn test_update_delegates_to_nested_serializer() {
        let store = store();
        let order = store.insert("orders", json!({"paid": false})).unwrap();
        let ice_cream = store
            .insert(
                "ice_creams",
                json!({"order": order["id"], "with_waffle": true}),
            )
            .unwrap();

        let mut serializer = ice_cream_serializer(store.clone());
        serializer
            .bind_root(Arc::new(
                RequestContext::new(ExpandSet::parse(["order"])).partial(true),
            ))
            .unwrap();

        let validated = serializer
            .to_internal_value(&json!({"order": {"paid": true}}))
            .unwrap();
        let record = serializer.update(&ice_cream, validated).unwrap();

        assert_eq!(record["order"], order["id"]);
        assert_eq!(record["with_waffle"], json!(true));
        let order = store.get("orders", 1).unwrap().unwrap();
        assert_eq!(order["paid"], json!(true));
    }

    #[test]
    fn test_represent_expanded_fetches_related_record() {
        let store = store();
        let order = store.insert("orders", json!({"paid": true})).unwrap();
        let ice_cream = store
            .insert(
                "ice_creams",
                json!({"order": order["id"], "with_waffle": false}),
            )
            .unwrap();

        let mut serializer = ice_cream_serializer(store);
        serializer.bind_root(request(&["order"])).unwrap();

        let rendered = serializer.represent(&ice_cream).unwrap();
        assert_eq!(
            rendered,
            json!({"id": 1, "order": {"id": 1, "paid": true}, "with_waffle": false})
        );
    }

    #[test]
    fn test_represent_many_matches_single() {
        let store = store();
        let order = store.insert("orders", json!({"paid": true})).unwrap();
        let ice_cream = store
            .insert(
                "ice_creams",
                json!({"order": order["id"], "with_waffle": true}),
            )
            .unwrap();

        let mut serializer = ice_cream_serializer(store);
        serializer.bind_root(request(&["order"])).unwrap();

        let single = serializer.represent(&ice_cream).unwrap();
        let many = serializer
            .represent_many(std::slice::from_ref(&ice_cream))
            .unwrap();
        assert_eq!(many, json!([single]));
    }
}
