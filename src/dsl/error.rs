//! dsl::error
//!
//! Caller-facing error taxonomy.
//!
//! Errors come in two tiers. Structural and type problems carry a free-text
//! `message` ([`DslError::ParseError`], [`DslError::InvalidArgument`]).
//! Semantic problems with a well-typed value carry a `field`/`value`/`expected`
//! triple ([`DslError::ConstraintViolation`]) so an automated caller can
//! correct the exact argument. Every argument error also carries a
//! `suggestion`: a literal example of a correct invocation.
//!
//! The serialized form is tagged by `error`:
//!
//! ```
//! use gitmem::dsl::DslError;
//!
//! let err = DslError::parse("Missing closing paren", Some(3));
//! let json = serde_json::to_value(&err).unwrap();
//! assert_eq!(json["error"], "parse-error");
//! assert_eq!(json["position"], 3);
//! ```

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Errors produced by the parse, validate and execute stages.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "error", rename_all = "kebab-case")]
pub enum DslError {
    /// Malformed input: bad syntax, unbalanced parens, trailing tokens,
    /// or a node that is not an operation call.
    #[error("parse error: {message}")]
    ParseError {
        message: String,
        /// Token index where the problem was detected.
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<usize>,
    },

    /// Operation name outside the fixed set.
    #[error("unknown operation '{operation}'")]
    UnknownOperation {
        operation: String,
        expected: Vec<&'static str>,
    },

    /// A well-typed argument with a semantically invalid value.
    #[error("constraint violation on {field}: expected {expected}")]
    ConstraintViolation {
        field: &'static str,
        value: Value,
        expected: String,
        suggestion: &'static str,
    },

    /// A missing or mistyped argument.
    #[error("{message}")]
    InvalidArgument {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
        suggestion: &'static str,
    },

    /// A git subprocess exited unsuccessfully.
    #[error("git command failed: {command}: {stderr}")]
    GitError {
        command: String,
        stderr: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
    },

    /// The memory store could not carry out a validated command.
    #[error("{message}")]
    MemoryError {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        suggestion: Option<String>,
    },
}

impl DslError {
    /// Build a parse error.
    pub fn parse(message: impl Into<String>, position: Option<usize>) -> Self {
        DslError::ParseError {
            message: message.into(),
            position,
        }
    }

    /// Build a message-only argument error.
    pub fn invalid(message: impl Into<String>, suggestion: &'static str) -> Self {
        DslError::InvalidArgument {
            message: message.into(),
            value: None,
            suggestion,
        }
    }

    /// Build a message-only argument error that reports the offending value.
    pub fn invalid_value(
        message: impl Into<String>,
        value: impl Into<Value>,
        suggestion: &'static str,
    ) -> Self {
        DslError::InvalidArgument {
            message: message.into(),
            value: Some(value.into()),
            suggestion,
        }
    }

    /// Build a constraint violation.
    pub fn constraint(
        field: &'static str,
        value: impl Into<Value>,
        expected: impl Into<String>,
        suggestion: &'static str,
    ) -> Self {
        DslError::ConstraintViolation {
            field,
            value: value.into(),
            expected: expected.into(),
            suggestion,
        }
    }

    /// Build a memory store error.
    pub fn memory(message: impl Into<String>, suggestion: Option<String>) -> Self {
        DslError::MemoryError {
            message: message.into(),
            suggestion,
        }
    }

    /// The `error` tag this variant serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            DslError::ParseError { .. } => "parse-error",
            DslError::UnknownOperation { .. } => "unknown-operation",
            DslError::ConstraintViolation { .. } => "constraint-violation",
            DslError::InvalidArgument { .. } => "invalid-argument",
            DslError::GitError { .. } => "git-error",
            DslError::MemoryError { .. } => "memory-error",
        }
    }
}
