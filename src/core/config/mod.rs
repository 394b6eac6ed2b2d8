//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! gitmem has two configuration scopes:
//! - **Global**: User-level settings (git executable, output format)
//! - **Repo**: Repository-level settings (commit subject prefix, identity)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (not handled here)
//!
//! # Global Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$GITMEM_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gitmem/config.toml`
//! 3. `~/.gitmem/config.toml`
//!
//! # Repo Config Location
//!
//! `<common_dir>/gitmem/config.toml`, shared by all worktrees.
//!
//! # Example
//!
//! ```no_run
//! use gitmem::core::config::Config;
//!
//! let result = Config::load(None).unwrap();
//! println!("git binary: {}", result.config.git_binary());
//! println!("pretty: {}", result.config.pretty());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::core::paths::GitmemPaths;
use crate::git::Identity;

/// Default commit subject prefix.
pub const DEFAULT_COMMIT_PREFIX: &str = "memory";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Merged configuration from all sources.
///
/// Accessors apply defaults, so callers never see an unset value.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo and the file exists)
    pub repo: Option<RepoConfig>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// If `paths` is provided, also loads the repository config.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed
    /// or validated. Missing files are not an error.
    pub fn load(paths: Option<&GitmemPaths>) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();
        let candidates = Self::global_candidates(&mut warnings);
        Self::load_from(&candidates, paths, warnings)
    }

    /// Load using an explicit list of global config candidates.
    fn load_from(
        global_candidates: &[PathBuf],
        paths: Option<&GitmemPaths>,
        warnings: Vec<ConfigWarning>,
    ) -> Result<ConfigLoadResult, ConfigError> {
        let (global, global_path) = match global_candidates.iter().find(|p| p.exists()) {
            Some(path) => (read_toml::<GlobalConfig>(path)?, Some(path.clone())),
            None => (GlobalConfig::default(), None),
        };
        global.validate()?;

        let (repo, repo_path) = match paths.map(GitmemPaths::repo_config_path) {
            Some(path) if path.exists() => {
                let repo = read_toml::<RepoConfig>(&path)?;
                repo.validate()?;
                (Some(repo), Some(path))
            }
            _ => (None, None),
        };

        for warning in &warnings {
            tracing::warn!(path = %warning.path.display(), "{}", warning.message);
        }
        tracing::debug!(
            global = ?global_path,
            repo = ?repo_path,
            "loaded configuration"
        );

        Ok(ConfigLoadResult {
            config: Config { global, repo },
            warnings,
        })
    }

    /// Global config locations in search order.
    fn global_candidates(warnings: &mut Vec<ConfigWarning>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(path) = std::env::var("GITMEM_CONFIG") {
            let path = PathBuf::from(path);
            if !path.exists() {
                warnings.push(ConfigWarning {
                    message: "GITMEM_CONFIG points at a missing file; falling back".to_string(),
                    path: path.clone(),
                });
            }
            candidates.push(path);
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("gitmem/config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".gitmem/config.toml"));
        }

        candidates
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Git executable. Defaults to `"git"`.
    pub fn git_binary(&self) -> &str {
        self.global.git_binary.as_deref().unwrap_or("git")
    }

    /// Whether JSON output is pretty-printed. Defaults to `true`.
    pub fn pretty(&self) -> bool {
        self.global.pretty.unwrap_or(true)
    }

    /// Commit subject prefix. Defaults to `"memory"`.
    pub fn commit_prefix(&self) -> &str {
        self.repo
            .as_ref()
            .and_then(|r| r.commit_prefix.as_deref())
            .unwrap_or(DEFAULT_COMMIT_PREFIX)
    }

    /// Committer identity override, when both halves are configured.
    pub fn identity(&self) -> Option<Identity> {
        let repo = self.repo.as_ref()?;
        Some(Identity {
            name: repo.author_name.clone()?,
            email: repo.author_email.clone()?,
        })
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
