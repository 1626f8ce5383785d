//! # gelato-store - Record Persistence Layer
//!
//! This crate provides the storage abstraction used by the gelato REST
//! server. Records are plain JSON objects ([`serde_json::Value`]) grouped
//! into named collections, each keyed by a monotonically increasing integer
//! id assigned on insert.
//!
//! The central trait is [`RecordStore`], which defines synchronous CRUD
//! operations. The serialization layer calls into it directly during
//! validation (reference checks) and nested persistence, so the trait is
//! deliberately synchronous: a request performs its full read or write pass
//! without suspension points.
//!
//! The crate ships one backend, [`MemoryStore`], which keeps all collections
//! in process memory behind a [`parking_lot::RwLock`].
//!
//! ## Example
//!
//! ```
//! use gelato_store::{MemoryStore, RecordStore};
//! use serde_json::json;
//!
//! let store = MemoryStore::new();
//! let record = store.insert("flavors", json!({"flavor": "vanilla"})).unwrap();
//! let id = record["id"].as_i64().unwrap();
//! assert!(store.exists("flavors", id).unwrap());
//! ```

#![warn(missing_docs)]

pub mod core;
pub mod error;
pub mod memory;

pub use core::RecordStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
