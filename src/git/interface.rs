//! git::interface
//!
//! Git interface: repository discovery through git2, commands through the
//! git CLI.
//!
//! # Architecture
//!
//! The `Git` struct is the only way to interact with a repository. Discovery,
//! path layout, HEAD resolution and in-progress state detection use `git2`;
//! every operation that changes or queries history runs the `git` binary with
//! an argument vector (never a shell string), so behaviour matches what a
//! user would see on the command line.
//!
//! # Error Handling
//!
//! Failures are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::BareRepo`]: Repository has no working directory
//! - [`GitError::Spawn`]: The git binary could not be started
//! - [`GitError::CommandFailed`]: git exited with an unexpected status
//!
//! # Example
//!
//! ```ignore
//! use gitmem::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let out = git.run(&["log", "-n", "2", "--oneline"])?;
//! println!("{}", out.stdout);
//! ```

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::core::types::{Oid, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported")]
    BareRepo,

    /// Git operation in progress (rebase, merge, etc.).
    #[error("{operation} in progress")]
    OperationInProgress {
        /// The type of operation in progress
        operation: GitState,
    },

    /// The git binary could not be run at all.
    #[error("failed to run '{command}': {message}")]
    Spawn {
        /// The command line that was attempted
        command: String,
        /// Description of the failure
        message: String,
    },

    /// git exited with a status the caller did not accept.
    #[error("'{command}' failed: {stderr}")]
    CommandFailed {
        /// The command line that was run
        command: String,
        /// Captured standard error
        stderr: String,
        /// Exit code, if the process exited normally
        code: Option<i32>,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::InvalidOid {
            oid: err.to_string(),
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to the shared git directory (the main `.git` inside worktrees)
    pub common_dir: PathBuf,
    /// Path to working directory
    pub work_dir: PathBuf,
}

/// State of in-progress Git operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitState {
    /// No operation in progress.
    Clean,
    /// Rebase in progress.
    Rebase,
    /// Merge in progress.
    Merge,
    /// Cherry-pick in progress.
    CherryPick,
    /// Revert in progress.
    Revert,
    /// Bisect in progress.
    Bisect,
    /// Apply mailbox in progress.
    ApplyMailbox,
}

impl GitState {
    /// Check if any operation is in progress.
    ///
    /// ```
    /// use gitmem::git::GitState;
    ///
    /// assert!(!GitState::Clean.is_in_progress());
    /// assert!(GitState::Merge.is_in_progress());
    /// ```
    pub fn is_in_progress(&self) -> bool {
        !matches!(self, GitState::Clean)
    }

    /// Get a human-readable description of the state.
    pub fn description(&self) -> &'static str {
        match self {
            GitState::Clean => "clean",
            GitState::Rebase => "rebase",
            GitState::Merge => "merge",
            GitState::CherryPick => "cherry-pick",
            GitState::Revert => "revert",
            GitState::Bisect => "bisect",
            GitState::ApplyMailbox => "apply-mailbox",
        }
    }
}

impl std::fmt::Display for GitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Captured result of one git invocation.
#[derive(Debug, Clone)]
pub struct GitOutput {
    /// The command line, for diagnostics
    pub command: String,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Captured standard output (lossy UTF-8)
    pub stdout: String,
    /// Captured standard error (lossy UTF-8)
    pub stderr: String,
}

/// Committer identity passed to git with `-c user.name=... -c user.email=...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

/// The Git interface.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
    /// Executable used for CLI operations
    binary: String,
    /// Optional committer identity override
    identity: Option<Identity>,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .field("binary", &self.binary)
            .finish()
    }
}

impl Git {
    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        Ok(Self {
            repo,
            binary: "git".to_string(),
            identity: None,
        })
    }

    /// Use a different git executable for CLI operations.
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    /// Override the committer identity for commits made through this interface.
    pub fn with_identity(mut self, identity: Option<Identity>) -> Self {
        self.identity = identity;
        self
    }

    /// Get repository information (common_dir and work_dir paths).
    pub fn info(&self) -> Result<RepoInfo, GitError> {
        let work_dir = self.repo.workdir().ok_or(GitError::BareRepo)?.to_path_buf();
        Ok(RepoInfo {
            common_dir: self.repo.commondir().to_path_buf(),
            work_dir,
        })
    }

    /// Get the working directory.
    pub fn work_dir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or(GitError::BareRepo)
    }

    /// Get the current Git state (rebase, merge, etc.).
    pub fn state(&self) -> GitState {
        match self.repo.state() {
            git2::RepositoryState::Clean => GitState::Clean,
            git2::RepositoryState::Rebase
            | git2::RepositoryState::RebaseInteractive
            | git2::RepositoryState::RebaseMerge => GitState::Rebase,
            git2::RepositoryState::Merge => GitState::Merge,
            git2::RepositoryState::CherryPick | git2::RepositoryState::CherryPickSequence => {
                GitState::CherryPick
            }
            git2::RepositoryState::Revert | git2::RepositoryState::RevertSequence => {
                GitState::Revert
            }
            git2::RepositoryState::Bisect => GitState::Bisect,
            git2::RepositoryState::ApplyMailbox | git2::RepositoryState::ApplyMailboxOrRebase => {
                GitState::ApplyMailbox
            }
        }
    }

    /// Fail if a rebase, merge or similar operation is paused.
    pub fn ensure_clean_state(&self) -> Result<(), GitError> {
        let state = self.state();
        if state.is_in_progress() {
            return Err(GitError::OperationInProgress { operation: state });
        }
        Ok(())
    }

    /// Resolve HEAD to a commit id.
    ///
    /// Returns `None` for a repository with no commits yet.
    pub fn head_oid(&self) -> Result<Option<Oid>, GitError> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(None),
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let oid = head.peel_to_commit()?.id();
        Ok(Some(Oid::new(oid.to_string())?))
    }

    /// Run git with `args`, requiring exit status 0.
    pub fn run(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        self.run_accepting(args, &[0])
    }

    /// Run git with `args`, accepting any of the listed exit codes.
    ///
    /// `git grep` exits 1 when nothing matches, which is not a failure for
    /// a search.
    pub fn run_accepting(&self, args: &[&str], accepted: &[i32]) -> Result<GitOutput, GitError> {
        let command = self.command_line(args);
        let mut cmd = Command::new(&self.binary);
        cmd.current_dir(self.work_dir()?)
            .env("GIT_TERMINAL_PROMPT", "0")
            .args(["-c", "core.quotepath=off"]);
        if let Some(identity) = &self.identity {
            cmd.arg("-c")
                .arg(format!("user.name={}", identity.name))
                .arg("-c")
                .arg(format!("user.email={}", identity.email));
        }
        cmd.args(args);

        tracing::debug!(%command, "running git");
        let output = cmd.output().map_err(|e| GitError::Spawn {
            command: command.clone(),
            message: e.to_string(),
        })?;

        let result = GitOutput {
            command,
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        match result.code {
            Some(code) if accepted.contains(&code) => Ok(result),
            code => {
                tracing::debug!(command = %result.command, ?code, "git failed");
                Err(GitError::CommandFailed {
                    command: result.command,
                    stderr: result.stderr.trim().to_string(),
                    code,
                })
            }
        }
    }

    /// Human-readable command line for diagnostics.
    fn command_line(&self, args: &[&str]) -> String {
        let mut line = self.binary.clone();
        for arg in args {
            line.push(' ');
            if arg.is_empty() || arg.chars().any(char::is_whitespace) {
                line.push_str(&format!("{:?}", arg));
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}
