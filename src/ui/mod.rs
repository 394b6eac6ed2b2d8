//! ui
//!
//! Terminal output for the `gitmem` binary.
//!
//! # Modules
//!
//! - [`output`] - JSON result printing and stderr diagnostics

pub mod output;
