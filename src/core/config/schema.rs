//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$GITMEM_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitmem/config.toml`
//! 3. `~/.gitmem/config.toml`
//!
//! # Repo Config
//!
//! Located at `<common_dir>/gitmem/config.toml`.
//!
//! # Validation
//!
//! Values are validated after parsing: a commit prefix must be a single
//! non-empty line, and a commit identity must name both author and email.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// git_binary = "/usr/local/bin/git"
/// pretty = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Git executable used for every subprocess (default: "git")
    pub git_binary: Option<String>,

    /// Pretty-print JSON results (default: true)
    pub pretty: Option<bool>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(binary) = &self.git_binary {
            if binary.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git_binary cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// commit_prefix = "notes"
/// author_name = "Memory Bot"
/// author_email = "bot@example.com"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Prefix of every commit subject (default: "memory")
    pub commit_prefix: Option<String>,

    /// Committer name override
    pub author_name: Option<String>,

    /// Committer email override
    pub author_email: Option<String>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.commit_prefix {
            if prefix.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "commit_prefix cannot be empty".to_string(),
                ));
            }
            if prefix.contains('\n') || prefix.contains('\r') {
                return Err(ConfigError::InvalidValue(
                    "commit_prefix must be a single line".to_string(),
                ));
            }
        }

        match (&self.author_name, &self.author_email) {
            (Some(_), None) | (None, Some(_)) => Err(ConfigError::InvalidValue(
                "author_name and author_email must be set together".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
