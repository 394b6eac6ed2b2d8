//! core::paths
//!
//! Centralized path routing for gitmem storage locations.
//!
//! # Storage Layout
//!
//! Repository-private data lives under `<common_dir>/gitmem/`, shared by all
//! worktrees:
//! - `config.toml` - Repository configuration
//! - `lock` - Exclusive lock file
//!
//! Memories are tracked files in the working tree:
//! - `memories/<kind>/<slug>.md`, where `kind` is the symbol's ASCII name
//!
//! # Example
//!
//! ```
//! use gitmem::core::paths::GitmemPaths;
//! use gitmem::core::types::{Slug, Symbol};
//! use std::path::PathBuf;
//!
//! let paths = GitmemPaths::new(PathBuf::from("/repo/.git"), PathBuf::from("/repo"));
//! let slug = Slug::new("first-idea").unwrap();
//!
//! assert_eq!(
//!     paths.repo_config_path(),
//!     PathBuf::from("/repo/.git/gitmem/config.toml")
//! );
//! assert_eq!(
//!     paths.memory_path(Symbol::Insight, &slug),
//!     PathBuf::from("/repo/memories/insight/first-idea.md")
//! );
//! ```

use std::path::{Component, Path, PathBuf};

use crate::core::types::{Slug, Symbol};
use crate::git::RepoInfo;

/// Name of the tracked directory holding memories, relative to the work tree.
pub const MEMORY_DIR: &str = "memories";

/// File extension of memory documents.
pub const MEMORY_EXT: &str = "md";

/// Centralized path routing for gitmem storage.
///
/// # Invariants
///
/// - Repo-scoped private storage uses `common_dir` (shared across worktrees)
/// - Memory files always live under `<work_dir>/memories/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitmemPaths {
    /// Path to the shared git directory (refs, objects, config).
    pub common_dir: PathBuf,

    /// Path to the working tree root.
    pub work_dir: PathBuf,
}

impl GitmemPaths {
    /// Create paths from a common_dir and work_dir.
    pub fn new(common_dir: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            common_dir,
            work_dir,
        }
    }

    /// Create paths from a RepoInfo.
    pub fn from_repo_info(info: &RepoInfo) -> Self {
        Self {
            common_dir: info.common_dir.clone(),
            work_dir: info.work_dir.clone(),
        }
    }

    // =========================================================================
    // Repo-scoped paths (shared across worktrees)
    // =========================================================================

    /// Root of gitmem's private data: `<common_dir>/gitmem`.
    pub fn repo_gitmem_dir(&self) -> PathBuf {
        self.common_dir.join("gitmem")
    }

    /// `<common_dir>/gitmem/config.toml`.
    pub fn repo_config_path(&self) -> PathBuf {
        self.repo_gitmem_dir().join("config.toml")
    }

    /// `<common_dir>/gitmem/lock`.
    pub fn repo_lock_path(&self) -> PathBuf {
        self.repo_gitmem_dir().join("lock")
    }

    // =========================================================================
    // Working tree paths
    // =========================================================================

    /// `<work_dir>/memories`.
    pub fn memories_dir(&self) -> PathBuf {
        self.work_dir.join(MEMORY_DIR)
    }

    /// `<work_dir>/memories/<kind>`.
    pub fn symbol_dir(&self, symbol: Symbol) -> PathBuf {
        self.memories_dir().join(symbol.kind())
    }

    /// `<work_dir>/memories/<kind>/<slug>.md`.
    pub fn memory_path(&self, symbol: Symbol, slug: &Slug) -> PathBuf {
        self.symbol_dir(symbol)
            .join(format!("{}.{}", slug.as_str(), MEMORY_EXT))
    }

    /// Resolve a user-supplied relative path against the work tree, refusing
    /// anything that would escape the memories directory.
    ///
    /// Absolute paths and `..` components are rejected outright.
    pub fn memory_file(&self, user_path: &str) -> Option<PathBuf> {
        let candidate = Path::new(user_path);
        if candidate.is_absolute()
            || candidate
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }
        let full = self.work_dir.join(candidate);
        full.starts_with(self.memories_dir()).then_some(full)
    }
}
