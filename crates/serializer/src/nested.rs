//! Nested write delegation.
//!
//! When a writable expandable field resolved to its full (nested) form, the
//! validated input carries a sub-payload instead of a record id. Before the
//! enclosing serializer persists the outer record, the passes in this module
//! walk its fields in declaration order and delegate creation/update of each
//! such sub-payload to the field's nested serializer, writing the resulting
//! record back into the validated data.
//!
//! The nested serializer runs the same passes for its own fields, so
//! expansion chains of any depth resolve by plain recursion.
//!
//! No rollback is attempted across fields: if the second nested create fails
//! after the first succeeded, the first record stays persisted. Atomicity
//! across a request is the job of a transactional store, not of this layer.

use serde_json::{Map, Value};

use gelato_store::StoreError;

use crate::error::SerializerResult;
use crate::field::Field;

/// Whether nested writes should be routed through this field.
///
/// A field with a configured default is assumed to be optionally-omittable
/// and is left to the standard write path.
pub(crate) fn eligible(field: &dyn Field) -> bool {
    field.writes_nested() && !field.read_only() && field.default_value().is_none()
}

/// Creates every nested record before the outer create.
///
/// For each eligible field with an entry in `data`, pops the sub-payload,
/// creates the nested record through the field, and puts the created record
/// back under the same key.
pub(crate) fn create_pass(
    fields: &[(String, Box<dyn Field>)],
    data: &mut Map<String, Value>,
) -> SerializerResult<()> {
    for (name, field) in fields {
        if !eligible(field.as_ref()) {
            continue;
        }
        let Some(payload) = data.remove(name) else {
            continue;
        };
        let created = field.create(payload)?;
        data.insert(name.clone(), created);
    }
    Ok(())
}

/// Updates every nested record before the outer update.
///
/// Symmetric to [`create_pass`]: the current related value is taken from the
/// outer instance under the field's name and handed to the field's update
/// together with the popped sub-payload.
pub(crate) fn update_pass(
    fields: &[(String, Box<dyn Field>)],
    instance: &Value,
    data: &mut Map<String, Value>,
) -> SerializerResult<()> {
    for (name, field) in fields {
        if !eligible(field.as_ref()) {
            continue;
        }
        let Some(payload) = data.remove(name) else {
            continue;
        };
        let current = instance.get(name).cloned().unwrap_or(Value::Null);
        let updated = field.update(&current, payload)?;
        data.insert(name.clone(), updated);
    }
    Ok(())
}

/// Replaces nested record objects with their ids so the outer record is
/// stored flat, holding plain integer references.
pub(crate) fn flatten_relations(
    collection: &str,
    fields: &[(String, Box<dyn Field>)],
    mut data: Map<String, Value>,
) -> SerializerResult<Map<String, Value>> {
    for (name, field) in fields {
        if !field.writes_nested() {
            continue;
        }
        if let Some(record) = data.get(name).filter(|v| v.is_object()) {
            let id = record_id(collection, record)?;
            data.insert(name.clone(), Value::from(id));
        }
    }
    Ok(data)
}

/// Extracts the integer id of a record.
pub(crate) fn record_id(collection: &str, record: &Value) -> SerializerResult<i64> {
    record
        .get("id")
        .and_then(Value::as_i64)
        .ok_or_else(|| {
            StoreError::InvalidRecord {
                collection: collection.to_string(),
                message: "record is missing an integer id".to_string(),
            }
            .into()
        })
}
