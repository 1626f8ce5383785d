//! The field contract and the primitive field implementations.
//!
//! A [`Field`] is one named slot in a serializer: it parses one value out of
//! the request body and renders one value into the response. Serializers
//! themselves implement `Field` so they can be nested, and
//! [`ExpandableProxy`](crate::ExpandableProxy) implements it by forwarding
//! to whichever alternative is live.

use std::sync::Arc;

use serde_json::Value;

use gelato_store::RecordStore;

use crate::context::BindingContext;
use crate::error::{SerializerError, SerializerResult, ValidationError};

/// One named slot in a serializer.
///
/// A field is bound exactly once per request, to a name and a position in
/// the object graph, before any other operation is invoked on it. Binding is
/// performed by the enclosing serializer; a field that is never placed in a
/// serializer is never bound and cannot legitimately be used.
pub trait Field: Send + Sync {
    /// Binds this field to its name at the given position.
    fn bind(&mut self, name: &str, ctx: &BindingContext) -> SerializerResult<()>;

    /// The name this field was bound to, if it has been bound.
    fn bound_name(&self) -> Option<&str>;

    /// Parses one raw input value into its validated internal form.
    ///
    /// Invalid input fails with [`SerializerError::Validation`]; the
    /// enclosing serializer keys the error under this field's name.
    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value>;

    /// Renders one attribute value into its response representation.
    fn to_representation(&self, value: &Value) -> SerializerResult<Value>;

    /// Whether this field is excluded from writes.
    fn read_only(&self) -> bool {
        false
    }

    /// The value used when the input omits this field, if configured.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Persists a nested object from a validated sub-payload.
    ///
    /// Only fields backed by a nested serializer support this; everything
    /// else fails with [`SerializerError::UnsupportedOperation`].
    fn create(&self, _validated: Value) -> SerializerResult<Value> {
        Err(SerializerError::UnsupportedOperation {
            field: self.bound_name().unwrap_or("<unbound>").to_string(),
            operation: "create",
        })
    }

    /// Updates a nested object from a validated sub-payload.
    ///
    /// `instance` is the current related value (a record, or its id).
    fn update(&self, _instance: &Value, _validated: Value) -> SerializerResult<Value> {
        Err(SerializerError::UnsupportedOperation {
            field: self.bound_name().unwrap_or("<unbound>").to_string(),
            operation: "update",
        })
    }

    /// Whether nested writes should be routed through this field for the
    /// current request. Only an expanded proxy answers true.
    fn writes_nested(&self) -> bool {
        false
    }
}

/// An integer value.
#[derive(Debug, Default)]
pub struct IntegerField {
    name: Option<String>,
    read_only: bool,
    default: Option<i64>,
}

impl IntegerField {
    /// A writable integer field with no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the field from writes.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the value used when the input omits the field.
    pub fn default(mut self, value: i64) -> Self {
        self.default = Some(value);
        self
    }
}

impl Field for IntegerField {
    fn bind(&mut self, name: &str, _ctx: &BindingContext) -> SerializerResult<()> {
        self.name = Some(name.to_string());
        Ok(())
    }

    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value> {
        match raw.as_i64() {
            Some(n) => Ok(Value::from(n)),
            None => Err(ValidationError::message("A valid integer is required.").into()),
        }
    }

    fn to_representation(&self, value: &Value) -> SerializerResult<Value> {
        Ok(value.clone())
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn default_value(&self) -> Option<Value> {
        self.default.map(Value::from)
    }
}

/// A boolean value.
#[derive(Debug, Default)]
pub struct BooleanField {
    name: Option<String>,
    read_only: bool,
    default: Option<bool>,
}

impl BooleanField {
    /// A writable boolean field with no default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the field from writes.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Sets the value used when the input omits the field.
    pub fn default(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }
}

impl Field for BooleanField {
    fn bind(&mut self, name: &str, _ctx: &BindingContext) -> SerializerResult<()> {
        self.name = Some(name.to_string());
        Ok(())
    }

    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value> {
        match raw.as_bool() {
            Some(b) => Ok(Value::from(b)),
            None => Err(ValidationError::message("Must be a valid boolean.").into()),
        }
    }

    fn to_representation(&self, value: &Value) -> SerializerResult<Value> {
        Ok(value.clone())
    }

    fn read_only(&self) -> bool {
        self.read_only
    }

    fn default_value(&self) -> Option<Value> {
        self.default.map(Value::from)
    }
}

/// A string value.
#[derive(Debug, Default)]
pub struct CharField {
    name: Option<String>,
    read_only: bool,
}

impl CharField {
    /// A writable string field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the field from writes.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl Field for CharField {
    fn bind(&mut self, name: &str, _ctx: &BindingContext) -> SerializerResult<()> {
        self.name = Some(name.to_string());
        Ok(())
    }

    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value> {
        match raw.as_str() {
            Some(s) => Ok(Value::from(s)),
            None => Err(ValidationError::message("Not a valid string.").into()),
        }
    }

    fn to_representation(&self, value: &Value) -> SerializerResult<Value> {
        Ok(value.clone())
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}

/// A reference to a record in another collection, written and rendered as
/// the record's id.
///
/// This is the compact alternative of an expandable field: parsing checks
/// that the referenced record exists, rendering passes the id through
/// untouched.
pub struct PrimaryKeyRelatedField {
    name: Option<String>,
    collection: String,
    store: Arc<dyn RecordStore>,
}

impl PrimaryKeyRelatedField {
    /// A reference into `collection` validated against `store`.
    pub fn new(collection: impl Into<String>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            name: None,
            collection: collection.into(),
            store,
        }
    }
}

impl Field for PrimaryKeyRelatedField {
    fn bind(&mut self, name: &str, _ctx: &BindingContext) -> SerializerResult<()> {
        self.name = Some(name.to_string());
        Ok(())
    }

    fn bound_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_internal_value(&self, raw: &Value) -> SerializerResult<Value> {
        let id = raw.as_i64().ok_or_else(|| {
            ValidationError::message("Incorrect type. Expected a record id.")
        })?;
        if self.store.exists(&self.collection, id)? {
            Ok(Value::from(id))
        } else {
            Err(ValidationError::message(format!(
                "Record with id={} does not exist.",
                id
            ))
            .into())
        }
    }

    fn to_representation(&self, value: &Value) -> SerializerResult<Value> {
        Ok(value.clone())
    }
}
