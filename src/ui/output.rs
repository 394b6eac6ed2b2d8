//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! stdout carries exactly one JSON document per command. Diagnostics are
//! `tracing` events on stderr; the only direct stderr write here is the
//! fatal error line.

use std::fmt::Display;

use serde::Serialize;

/// JSON layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonStyle {
    Pretty,
    Compact,
}

impl JsonStyle {
    /// `--compact` always wins; otherwise the configured preference.
    pub fn from_flags(compact: bool, pretty_config: bool) -> Self {
        if compact || !pretty_config {
            JsonStyle::Compact
        } else {
            JsonStyle::Pretty
        }
    }
}

/// Render a value as JSON text.
pub fn format_json<T: Serialize>(value: &T, style: JsonStyle) -> serde_json::Result<String> {
    match style {
        JsonStyle::Pretty => serde_json::to_string_pretty(value),
        JsonStyle::Compact => serde_json::to_string(value),
    }
}

/// Print the command result to stdout (always shown).
pub fn result<T: Serialize>(value: &T, style: JsonStyle) -> serde_json::Result<()> {
    println!("{}", format_json(value, style)?);
    Ok(())
}

/// Print usage text to stderr.
pub fn usage(text: impl Display) {
    eprintln!("{}", text);
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}
