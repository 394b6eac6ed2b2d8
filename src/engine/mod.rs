//! engine
//!
//! Orchestrates one command: process -> [check] -> execute -> respond.
//!
//! # Architecture
//!
//! The engine joins the pure DSL front-end to the executor. Whatever
//! happens, the caller gets a [`Response`]: the JSON contract never breaks,
//! and every failure carries one of the [`DslError`] kinds.
//!
//! ```text
//! text -> dsl::process -> Params -> Executor::execute -> Outcome
//!                 \                         \
//!                  DslError                  ExecError -> DslError
//! ```
//!
//! # Example
//!
//! ```
//! use gitmem::engine::{run, Context};
//!
//! let ctx = Context { check: true, ..Context::default() };
//! let response = run(&ctx, "(list 💡)");
//! assert!(response.success);
//! ```

pub mod exec;

pub use exec::{CommitSummary, ExecError, Executor, Outcome, SearchMatch};

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::dsl::{self, DslError, Params};

/// Execution context derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Single-line JSON.
    pub compact: bool,
    /// Validate only; never touch a repository.
    pub check: bool,
}

/// The result envelope printed for every command.
///
/// Serializes flat: `{"success": true, "op": ..., ...}` or
/// `{"success": false, "error": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub success: bool,
    #[serde(flatten)]
    pub body: Body,
}

/// What a [`Response`] carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Body {
    /// An executed operation.
    Done(Outcome),
    /// A command that was only validated.
    Checked(Params),
    Failed(DslError),
}

impl Response {
    pub fn done(outcome: Outcome) -> Self {
        Self {
            success: true,
            body: Body::Done(outcome),
        }
    }

    pub fn checked(params: Params) -> Self {
        Self {
            success: true,
            body: Body::Checked(params),
        }
    }

    pub fn failed(error: DslError) -> Self {
        Self {
            success: false,
            body: Body::Failed(error),
        }
    }

    /// The error, if this is a failure.
    pub fn error(&self) -> Option<&DslError> {
        match &self.body {
            Body::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Run one command string to a response.
pub fn run(ctx: &Context, input: &str) -> Response {
    let params = match dsl::process(input) {
        Ok(params) => params,
        Err(err) => {
            tracing::debug!(kind = err.kind(), "rejected command");
            return Response::failed(err);
        }
    };

    if ctx.check {
        return Response::checked(params);
    }

    let cwd = ctx.cwd.as_deref().unwrap_or(Path::new("."));
    let result = Executor::open(cwd).and_then(|executor| executor.execute(&params));
    match result {
        Ok(outcome) => Response::done(outcome),
        Err(err) => {
            tracing::debug!(error = %err, "execution failed");
            Response::failed(err.into())
        }
    }
}
