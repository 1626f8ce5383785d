//! HTTP request handlers.
//!
//! One handler per interaction, all generic over the registered resources:
//! the URL's resource segment selects the serializer, and every handler
//! binds a fresh serializer to the request's expansion context before
//! touching data, so reads and writes see the same expansion decisions.

pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod retrieve;
pub mod update;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::health_handler;
pub use list::list_handler;
pub use retrieve::retrieve_handler;
pub use update::{partial_update_handler, update_handler};
