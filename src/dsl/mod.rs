//! dsl
//!
//! The command language front-end: tokenize, parse, validate.
//!
//! # Pipeline
//!
//! ```text
//! text -> token::tokenize -> parser::Parser -> validate::validate -> Params
//! ```
//!
//! Each stage either hands its output to the next or stops with a
//! [`DslError`] that is returned to the caller unchanged. The whole pipeline
//! is pure: no I/O, no shared mutable state, and validating the same input
//! twice gives the same answer.
//!
//! # Example
//!
//! ```
//! use gitmem::dsl::{process, DslError, Params};
//!
//! let params = process("(list 💡)").unwrap();
//! assert!(matches!(params, Params::List { symbol: Some(_) }));
//!
//! let err = process("(list 💀)").unwrap_err();
//! assert_eq!(err.kind(), "constraint-violation");
//! ```

pub mod ast;
pub mod error;
pub mod operation;
pub mod parser;
pub mod token;
pub mod validate;

pub use ast::{Literal, Node, Number};
pub use error::DslError;
pub use operation::{Operation, Params};

/// Run the full front-end on one command string.
pub fn process(input: &str) -> Result<Params, DslError> {
    let node = parser::parse(input)?;
    tracing::debug!(ast = %node, "parsed command");
    let params = validate::validate(&node)?;
    tracing::debug!(op = %params.operation(), "validated command");
    Ok(params)
}
