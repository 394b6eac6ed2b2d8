//! cli
//!
//! Command-line interface layer for gitmem.
//!
//! # Responsibilities
//!
//! - Parse flags and collect the expression
//! - Install logging
//! - Hand the expression to [`crate::engine::run`] and print the response
//! - Map the response to the process exit code
//!
//! The CLI never interprets the expression itself.

pub mod args;

pub use args::Cli;

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::CommandFactory;
use tracing_subscriber::EnvFilter;

use crate::core::config::Config;
use crate::engine;
use crate::ui::output::{self, JsonStyle};

/// Filter directive for the tracing subscriber.
///
/// `--quiet` silences logging, `--debug` forces debug level, otherwise
/// `RUST_LOG` applies with `warn` as the fallback.
pub fn log_directive(debug: bool, quiet: bool, rust_log: Option<String>) -> String {
    if quiet {
        "off".to_string()
    } else if debug {
        "debug".to_string()
    } else {
        rust_log
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| "warn".to_string())
    }
}

/// Install the stderr tracing subscriber.
pub fn init_logging(cli: &Cli) {
    let directive = log_directive(cli.debug, cli.quiet, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let Some(input) = cli.expression() else {
        output::usage(Cli::command().render_help());
        return Ok(ExitCode::FAILURE);
    };

    let pretty = match Config::load(None) {
        Ok(loaded) => loaded.config.pretty(),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring global config");
            true
        }
    };

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        compact: cli.compact,
        check: cli.check,
    };

    tracing::debug!(expression = %input, check = ctx.check, "running");
    let response = engine::run(&ctx, &input);
    output::result(&response, JsonStyle::from_flags(ctx.compact, pretty))
        .context("failed to serialize result")?;

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
