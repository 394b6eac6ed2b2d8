//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Flags
//!
//! - `--cwd <path>`: Run as if started in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Print nothing but the JSON result
//! - `--compact`: Single-line JSON
//! - `--check`: Validate the expression without touching a repository
//!
//! Everything after the flags is the expression. The words are joined
//! with single spaces, so both of these run the same command:
//!
//! ```text
//! gitmem '(search "auth" 3)'
//! gitmem '(search' '"auth"' '3)'
//! ```
//!
//! Flags must come first. A word after the start of the expression that
//! names one of the flags above is a usage error rather than expression
//! text, so `gitmem --check '(list)' --compact` fails instead of validating
//! `(list) --compact`.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

/// gitmem - a git-backed memory store driven by a one-line S-expression
#[derive(Parser, Debug)]
#[command(name = "gitmem")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
OPERATIONS:
    (search \"query\" [depth])          Grep memories and related commits
    (create 💡 \"slug\" \"content\")       Write and commit a new memory
    (view \"ref\")                      Show a memory, or any git revision
    (update \"ref\" \"content\")          Replace a memory's body
    (delete \"ref\")                    Remove a memory
    (history [\"path\"] [depth])        Recent commits touching a path
    (diff [\"from\"] [\"to\"])            Changes under memories/
    (list [symbol])                   List memories, optionally by symbol

SYMBOLS:
    💡 insight   🔄 pattern   🎯 goal   🌀 exploration

DEPTHS:
    1, 2, 3, 5, 8, 13, 21, 34 (default 2)")]
pub struct Cli {
    /// Run as if gitmem was started in this directory
    #[arg(long)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print nothing but the JSON result
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the JSON result on a single line
    #[arg(long)]
    pub compact: bool,

    /// Parse and validate only
    #[arg(long)]
    pub check: bool,

    /// The command expression, e.g. (list 💡)
    #[arg(value_name = "EXPR", trailing_var_arg = true, allow_hyphen_values = true)]
    pub expr: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments, exiting with a usage error on failure.
    pub fn parse_args() -> Self {
        Self::try_parse_args_from(std::env::args_os()).unwrap_or_else(|err| err.exit())
    }

    /// Parse arguments and reject flags placed after the expression.
    pub fn try_parse_args_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Self::try_parse_from(args)?;
        match cli.expr.iter().find(|word| is_flag(word)) {
            Some(word) => Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                format!("flag '{}' must come before the expression", word),
            )),
            None => Ok(cli),
        }
    }

    /// The expression, or `None` when no words were given.
    pub fn expression(&self) -> Option<String> {
        let joined = self.expr.join(" ");
        if joined.trim().is_empty() {
            None
        } else {
            Some(joined)
        }
    }
}

/// Whether `word` names one of the declared flags, with or without `=value`.
fn is_flag(word: &str) -> bool {
    let name = word.split_once('=').map_or(word, |(name, _)| name);
    Cli::command().get_arguments().any(|arg| {
        arg.get_long().is_some_and(|long| name.strip_prefix("--") == Some(long))
            || arg.get_short().is_some_and(|short| name == format!("-{}", short))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn try_parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_args_from(std::iter::once("gitmem").chain(args.iter().copied()))
    }

    fn parse(args: &[&str]) -> Cli {
        try_parse(args).unwrap()
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn words_are_joined() {
        let cli = parse(&["(search", "\"auth\"", "3)"]);
        assert_eq!(cli.expression().as_deref(), Some("(search \"auth\" 3)"));
    }

    #[test]
    fn flags_before_expression() {
        let cli = parse(&["--compact", "--check", "--cwd", "/tmp", "(list)"]);
        assert!(cli.compact);
        assert!(cli.check);
        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(cli.expression().as_deref(), Some("(list)"));
    }

    #[test]
    fn hyphens_inside_expression() {
        let cli = parse(&["(history", "\"memories/\"", "-1)"]);
        assert_eq!(cli.expression().as_deref(), Some("(history \"memories/\" -1)"));
    }

    #[test]
    fn flags_after_expression_rejected() {
        for args in [
            &["--check", "(list)", "--compact"][..],
            &["(list)", "-q"],
            &["(search", "\"auth\")", "--cwd=/tmp"],
        ] {
            let err = try_parse(args).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
            assert!(err.to_string().contains("must come before the expression"));
        }
    }

    #[test]
    fn flag_text_inside_a_word_is_expression() {
        let cli = parse(&["--check", "(search \"--compact\")"]);
        assert!(cli.check);
        assert!(!cli.compact);
        assert_eq!(cli.expression().as_deref(), Some("(search \"--compact\")"));
    }

    #[test]
    fn empty_expression() {
        assert_eq!(parse(&[]).expression(), None);
        assert_eq!(parse(&["  "]).expression(), None);
    }
}
