//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. No other module imports
//! `git2` or spawns the git binary. Repository discovery and state checks go
//! through `git2`; history operations shell out to the git CLI with an
//! argument vector.
//!
//! # Responsibilities
//!
//! - Repository discovery and path layout
//! - In-progress operation detection
//! - HEAD resolution
//! - Running git subcommands and capturing their output

mod interface;

pub use interface::{Git, GitError, GitOutput, GitState, Identity, RepoInfo};
