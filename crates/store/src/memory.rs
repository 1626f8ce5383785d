//! In-memory storage backend.
//!
//! [`MemoryStore`] keeps every collection in process memory. It is the
//! backend used by the demo server and the test suites; data does not
//! survive a restart.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::core::RecordStore;
use crate::error::{StoreError, StoreResult};

/// A single collection: its records ordered by id, plus the id counter.
#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    records: BTreeMap<i64, Value>,
}

impl Table {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`RecordStore`] backend.
///
/// Collections are created lazily on first insert. Reads against a
/// collection that was never written behave like reads against an empty
/// collection.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Validates that record content is a JSON object.
fn require_object(collection: &str, content: &Value) -> StoreResult<()> {
    if content.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidRecord {
            collection: collection.to_string(),
            message: "record content must be a JSON object".to_string(),
        })
    }
}

impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn insert(&self, collection: &str, mut content: Value) -> StoreResult<Value> {
        require_object(collection, &content)?;

        let mut tables = self.tables.write();
        let table = tables.entry(collection.to_string()).or_default();
        let id = table.allocate_id();
        content["id"] = Value::from(id);

        debug!(collection = %collection, id = id, "Inserting record");
        table.records.insert(id, content.clone());
        Ok(content)
    }

    fn get(&self, collection: &str, id: i64) -> StoreResult<Option<Value>> {
        let tables = self.tables.read();
        Ok(tables
            .get(collection)
            .and_then(|table| table.records.get(&id))
            .cloned())
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let tables = self.tables.read();
        Ok(tables
            .get(collection)
            .map(|table| table.records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn save(&self, collection: &str, id: i64, mut content: Value) -> StoreResult<Value> {
        require_object(collection, &content)?;

        let mut tables = self.tables.write();
        let table = tables
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        if !table.records.contains_key(&id) {
            return Err(StoreError::not_found(collection, id));
        }

        content["id"] = Value::from(id);
        debug!(collection = %collection, id = id, "Saving record");
        table.records.insert(id, content.clone());
        Ok(content)
    }

    fn remove(&self, collection: &str, id: i64) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let table = tables
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        debug!(collection = %collection, id = id, "Removing record");
        table
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(collection, id))
    }
}
