//! gitmem - a git-backed memory store driven by a one-line S-expression DSL
//!
//! Memories are Markdown files under `memories/<kind>/<slug>.md` in an
//! ordinary git repository. A caller (typically an automated agent) sends
//! one flat S-expression such as `(create 💡 "auth-flow" "Tokens rotate hourly")`
//! and gets back one JSON document describing the result or a structured,
//! correctable error.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`dsl`] - Tokenizer, parser and validator (pure, no I/O)
//! - [`engine`] - Runs a command and builds the JSON response envelope
//! - [`core`] - Domain types, memory documents, config, paths, locking
//! - [`git`] - Single interface for all Git operations
//! - [`ui`] - Terminal output
//! - [`cli`] - Argument parsing and the binary entry point
//!
//! # Invariants
//!
//! 1. Only validated parameters ever reach the executor
//! 2. Every failure is reported as one of a fixed set of error kinds
//! 3. All durable state lives in the git repository

pub mod cli;
pub mod core;
pub mod dsl;
pub mod engine;
pub mod git;
pub mod ui;
