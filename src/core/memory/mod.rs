//! core::memory
//!
//! Memory document schema and storage.
//!
//! # Modules
//!
//! - [`schema`] - Front matter + Markdown document format
//! - [`store`] - Files under `memories/<kind>/<slug>.md`

pub mod schema;
pub mod store;

pub use schema::{MemoryDocument, SchemaError};
pub use store::{MemoryEntry, MemoryStore, StoreError};
