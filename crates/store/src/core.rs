//! Core record storage trait.
//!
//! This module defines the [`RecordStore`] trait, which provides the
//! fundamental CRUD operations for JSON records. Records live in named
//! collections and are identified by integer ids assigned by the store.

use serde_json::Value;

use crate::error::StoreResult;

/// Core storage trait for JSON records.
///
/// Implementations persist records as JSON objects grouped into named
/// collections. The store owns id assignment: [`RecordStore::insert`]
/// allocates the next id in the collection, writes it into the record under
/// the `"id"` key, and returns the stored record.
///
/// All operations are synchronous. Callers that serve requests concurrently
/// share a store behind an [`std::sync::Arc`]; implementations must be
/// internally synchronized.
///
/// # Example
///
/// ```
/// use gelato_store::{MemoryStore, RecordStore};
/// use serde_json::json;
///
/// fn example(store: &dyn RecordStore) -> gelato_store::StoreResult<()> {
///     let order = store.insert("orders", json!({"paid": false}))?;
///     let id = order["id"].as_i64().unwrap();
///
///     let mut content = order.clone();
///     content["paid"] = json!(true);
///     store.save("orders", id, content)?;
///
///     store.remove("orders", id)?;
///     Ok(())
/// }
/// # example(&MemoryStore::new()).unwrap();
/// ```
pub trait RecordStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a new record into a collection.
    ///
    /// Assigns the next integer id for the collection, stores it in the
    /// record under `"id"`, and returns the stored record.
    ///
    /// # Errors
    ///
    /// * [`StoreError::InvalidRecord`] - if `content` is not a JSON object
    ///
    /// [`StoreError::InvalidRecord`]: crate::StoreError::InvalidRecord
    fn insert(&self, collection: &str, content: Value) -> StoreResult<Value>;

    /// Reads a record by collection and id.
    ///
    /// Returns `None` if the record does not exist. An unknown collection is
    /// treated the same as an empty one.
    fn get(&self, collection: &str, id: i64) -> StoreResult<Option<Value>>;

    /// Lists all records in a collection, ordered by id.
    fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// Replaces the content of an existing record.
    ///
    /// The stored record keeps its id regardless of any `"id"` key in
    /// `content`. Returns the stored record.
    ///
    /// # Errors
    ///
    /// * [`StoreError::NotFound`] - if the record does not exist
    /// * [`StoreError::InvalidRecord`] - if `content` is not a JSON object
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    /// [`StoreError::InvalidRecord`]: crate::StoreError::InvalidRecord
    fn save(&self, collection: &str, id: i64, content: Value) -> StoreResult<Value>;

    /// Removes a record from a collection.
    ///
    /// # Errors
    ///
    /// * [`StoreError::NotFound`] - if the record does not exist
    ///
    /// [`StoreError::NotFound`]: crate::StoreError::NotFound
    fn remove(&self, collection: &str, id: i64) -> StoreResult<()>;

    /// Checks whether a record exists.
    ///
    /// This is cheaper than [`RecordStore::get`] when the content is not
    /// needed, e.g. for reference validation.
    fn exists(&self, collection: &str, id: i64) -> StoreResult<bool> {
        Ok(self.get(collection, id)?.is_some())
    }

    /// Counts the records in a collection.
    fn count(&self, collection: &str) -> StoreResult<u64> {
        Ok(self.list(collection)?.len() as u64)
    }
}
