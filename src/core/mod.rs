//! core
//!
//! Core domain types, schemas, and storage for gitmem.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Symbol, Slug, Depth, Oid, UtcTimestamp
//! - [`memory`] - Memory document schema and on-disk store
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for gitmem storage
//! - [`lock`] - Exclusive repository lock for mutations
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod lock;
pub mod memory;
pub mod paths;
pub mod types;
