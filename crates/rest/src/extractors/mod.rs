//! Axum extractors for expansion-aware requests.

pub mod body;
pub mod expand;

pub use body::JsonBody;
pub use expand::ExpandParams;
