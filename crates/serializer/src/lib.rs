//! # gelato-serializer - Expandable Field Serialization
//!
//! This crate implements conditional field expansion for a JSON REST API: a
//! field referencing a related record is rendered either as the bare record
//! id or as a fully nested object, selected per request through the `expand`
//! query parameter, at arbitrary nesting depth.
//!
//! ## How expansion resolves
//!
//! Each value of the expand parameter is a dotted path; the request may
//! repeat the parameter. A path segment matches a field when the segment's
//! index equals the field's depth in the object graph and the segment equals
//! the field's name. `GET /scoops/1?expand=ice_cream.order` therefore
//! expands the `ice_cream` field on the scoop (depth 0) and the `order`
//! field inside the expanded ice cream (depth 1), while `flavor` stays a
//! bare id.
//!
//! The moving parts:
//!
//! - [`ExpandableProxy`] wraps the two alternatives (a compact
//!   [`PrimaryKeyRelatedField`] and a full nested [`Serializer`]), resolves
//!   which one is live when it is bound, and forwards everything to it.
//! - [`Serializer`] holds the declared fields of one collection and drives
//!   rendering, validation, and persistence. Its create/update run a nested
//!   write pass first: every writable expanded field persists its
//!   sub-payload through its nested serializer before the outer record is
//!   written, so `POST /scoops/?expand=ice_cream.order` creates the order,
//!   then the ice cream referencing it, then the scoop.
//! - [`RequestContext`]/[`ExpandSet`] carry the parsed request state;
//!   [`BindingContext`] carries the depth at which fields bind.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use gelato_serializer::{
//!     BooleanField, ExpandSet, ExpandableProxy, IntegerField,
//!     PrimaryKeyRelatedField, RequestContext, Serializer,
//! };
//! use gelato_store::{MemoryStore, RecordStore};
//! use serde_json::json;
//!
//! let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
//! let order = store.insert("orders", json!({"paid": true})).unwrap();
//! let ice_cream = store
//!     .insert("ice_creams", json!({"order": order["id"], "with_waffle": true}))
//!     .unwrap();
//!
//! let order_fields = Serializer::new("orders", store.clone())
//!     .field("id", IntegerField::new().read_only())
//!     .field("paid", BooleanField::new().default(false));
//!
//! let mut serializer = Serializer::new("ice_creams", store.clone())
//!     .field("id", IntegerField::new().read_only())
//!     .field(
//!         "order",
//!         ExpandableProxy::new(order_fields, PrimaryKeyRelatedField::new("orders", store)),
//!     )
//!     .field("with_waffle", BooleanField::new().default(true));
//!
//! let request = Arc::new(RequestContext::new(ExpandSet::parse(["order"])));
//! serializer.bind_root(request).unwrap();
//!
//! let rendered = serializer.represent(&ice_cream).unwrap();
//! assert_eq!(
//!     rendered,
//!     json!({"id": 1, "order": {"id": 1, "paid": true}, "with_waffle": true})
//! );
//! ```

#![warn(missing_docs)]

pub mod context;
pub mod error;
pub mod field;
mod nested;
pub mod proxy;
pub mod serializer;

pub use context::{BindingContext, ExpandSet, RequestContext};
pub use error::{ErrorDetail, SerializerError, SerializerResult, ValidationError};
pub use field::{BooleanField, CharField, Field, IntegerField, PrimaryKeyRelatedField};
pub use proxy::ExpandableProxy;
pub use serializer::Serializer;
