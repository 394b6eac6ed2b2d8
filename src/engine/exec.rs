//! engine::exec
//!
//! The executor: turns validated [`Params`] into git and filesystem actions.
//!
//! # Architecture
//!
//! Each operation runs exactly one command sequence:
//!
//! | Op      | Sequence                                                      |
//! |---------|---------------------------------------------------------------|
//! | search  | `git grep` over `memories/`, `git log -G` for related commits |
//! | create  | write file, `git add`, `git commit`                           |
//! | view    | read memory file, else `git show <ref>`                       |
//! | update  | rewrite body, `git add`, `git commit`                         |
//! | delete  | `git rm`, `git commit`                                        |
//! | history | `git log -- <path>`                                           |
//! | diff    | `git diff <from> <to> -- memories/`                           |
//! | list    | read `memories/<kind>/`                                       |
//!
//! # Invariants
//!
//! - Mutations hold the repository lock from first write to commit
//! - Mutations refuse to run while a rebase, merge or similar is paused
//! - Commits name only the memory's path, so unrelated staged changes are
//!   left alone
//! - A failed commit puts the memory file back the way it was
//! - git always receives an argument vector, never a shell string
//!
//! # Example
//!
//! ```ignore
//! use gitmem::engine::exec::Executor;
//!
//! let executor = Executor::open(Path::new("."))?;
//! let outcome = executor.execute(&params)?;
//! ```

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::core::config::{Config, ConfigError};
use crate::core::lock::{LockError, RepoLock};
use crate::core::memory::{MemoryDocument, MemoryEntry, MemoryStore, StoreError};
use crate::core::paths::{GitmemPaths, MEMORY_DIR};
use crate::core::types::{Depth, Slug, Symbol};
use crate::dsl::{DslError, Params};
use crate::git::{Git, GitError};

/// Errors from executing a validated command.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Lock(#[from] LockError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A reference that must name a memory does not.
    #[error("no memory matches '{reference}'")]
    NotAMemory { reference: String },

    /// A revision argument that git would read as an option.
    #[error("revision '{revision}' cannot start with '-'")]
    OptionLikeRevision { revision: String },
}

impl From<ExecError> for DslError {
    fn from(err: ExecError) -> Self {
        match err {
            ExecError::Git(git) => git_error(git),
            ExecError::Store(StoreError::AlreadyExists { slug, path }) => DslError::memory(
                format!("memory '{}' already exists at {}", slug, path),
                Some(format!("(update \"{}\" \"New content\")", slug)),
            ),
            ExecError::Store(other) => DslError::memory(other.to_string(), None),
            ExecError::Lock(LockError::AlreadyLocked) => DslError::memory(
                LockError::AlreadyLocked.to_string(),
                Some("Retry once the other gitmem command has finished".to_string()),
            ),
            ExecError::Lock(other) => DslError::memory(other.to_string(), None),
            ExecError::Config(config) => DslError::memory(
                config.to_string(),
                Some("Fix or remove the offending config.toml".to_string()),
            ),
            err @ ExecError::NotAMemory { .. } => DslError::memory(
                err.to_string(),
                Some("(list) shows every memory and its slug".to_string()),
            ),
            err @ ExecError::OptionLikeRevision { .. } => DslError::memory(
                err.to_string(),
                Some("(diff \"HEAD~1\" \"HEAD\")".to_string()),
            ),
        }
    }
}

fn git_error(err: GitError) -> DslError {
    let (command, stderr, suggestion) = match err {
        GitError::CommandFailed {
            command, stderr, ..
        } => {
            let suggestion = suggest(&stderr);
            (command, stderr, suggestion)
        }
        GitError::Spawn { command, message } => (
            command,
            message,
            Some("Install git or set git_binary in the gitmem config".to_string()),
        ),
        GitError::NotARepo { path } => (
            "git rev-parse --show-toplevel".to_string(),
            format!("not a git repository: {}", path.display()),
            Some("Run gitmem inside a git work tree or pass --cwd <repo>".to_string()),
        ),
        GitError::BareRepo => (
            "git rev-parse --show-toplevel".to_string(),
            GitError::BareRepo.to_string(),
            Some("Use a clone with a working tree".to_string()),
        ),
        GitError::OperationInProgress { operation } => (
            "git status".to_string(),
            format!("{} in progress", operation),
            Some(format!(
                "Finish or abort the {} before changing memories",
                operation
            )),
        ),
        other => ("git".to_string(), other.to_string(), None),
    };
    DslError::GitError {
        command,
        stderr,
        suggestion,
    }
}

/// Map well-known git complaints to a next step.
fn suggest(stderr: &str) -> Option<String> {
    if stderr.contains("does not have any commits yet") {
        Some("Create a memory first: (create 💡 \"my-insight\" \"What I learned today\")".into())
    } else if stderr.contains("unknown revision") || stderr.contains("bad revision") {
        Some("Check the revision; (history \"memories/\" 5) lists recent commits".into())
    } else if stderr.contains("Please tell me who you are") {
        Some("Set user.name and user.email, or author_name and author_email in the gitmem repo config".into())
    } else {
        None
    }
}

/// One `git grep` hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub path: String,
    pub line: u64,
    pub text: String,
}

/// One `git log` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub hash: String,
    pub date: String,
    pub subject: String,
}

/// Successful result of one operation, tagged by `op`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Outcome {
    Search {
        query: String,
        depth: Depth,
        matches: Vec<SearchMatch>,
        commits: Vec<CommitSummary>,
    },
    Create {
        path: String,
        symbol: Symbol,
        slug: Slug,
        commit: String,
    },
    View {
        #[serde(rename = "ref")]
        reference: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        content: String,
    },
    Update {
        path: String,
        commit: String,
    },
    Delete {
        path: String,
        commit: String,
    },
    History {
        path: String,
        depth: Depth,
        commits: Vec<CommitSummary>,
    },
    Diff {
        from: String,
        to: String,
        diff: String,
    },
    List {
        #[serde(skip_serializing_if = "Option::is_none")]
        symbol: Option<Symbol>,
        memories: Vec<MemoryEntry>,
    },
}

const LOG_FORMAT: &str = "--format=%h %ad %s";

/// Runs validated commands against one repository.
pub struct Executor {
    git: Git,
    paths: GitmemPaths,
    config: Config,
}

impl Executor {
    /// Discover the repository containing `cwd` and load its configuration.
    pub fn open(cwd: &Path) -> Result<Self, ExecError> {
        let git = Git::open(cwd)?;
        let paths = GitmemPaths::from_repo_info(&git.info()?);
        let loaded = Config::load(Some(&paths))?;
        Ok(Self::new(git, paths, loaded.config))
    }

    /// Assemble an executor from parts. The config's git binary and
    /// identity are applied to `git`.
    pub fn new(git: Git, paths: GitmemPaths, config: Config) -> Self {
        let git = git
            .with_binary(config.git_binary())
            .with_identity(config.identity());
        Self { git, paths, config }
    }

    /// Run one validated command.
    pub fn execute(&self, params: &Params) -> Result<Outcome, ExecError> {
        let op = params.operation();
        tracing::debug!(%op, mutating = op.is_mutating(), "executing");
        match params {
            Params::Search { query, depth } => self.search(query, *depth),
            Params::Create {
                symbol,
                slug,
                content,
            } => self.create(*symbol, slug, content),
            Params::View { reference } => self.view(reference),
            Params::Update { reference, content } => self.update(reference, content),
            Params::Delete { reference } => self.delete(reference),
            Params::History { path, depth } => self.history(path, *depth),
            Params::Diff { from, to } => self.diff(from, to),
            Params::List { symbol } => self.list(*symbol),
        }
    }

    fn store(&self) -> MemoryStore<'_> {
        MemoryStore::new(&self.paths)
    }

    fn resolve(&self, reference: &str) -> Result<MemoryEntry, ExecError> {
        self.store()
            .resolve(reference)
            .ok_or_else(|| ExecError::NotAMemory {
                reference: reference.to_string(),
            })
    }

    /// Clean state plus the lock: the precondition of every mutation.
    fn begin_mutation(&self) -> Result<RepoLock, ExecError> {
        self.git.ensure_clean_state()?;
        Ok(RepoLock::acquire(&self.paths)?)
    }

    fn commit(&self, path: &str, verb: &str, entry: &MemoryEntry) -> Result<String, ExecError> {
        let message = format!(
            "{}: {} {} {}",
            self.config.commit_prefix(),
            verb,
            entry.symbol,
            entry.slug
        );
        self.git.run(&["commit", "-q", "-m", &message, "--", path])?;
        let head = self.git.head_oid()?.ok_or_else(|| GitError::Internal {
            message: "HEAD is unborn after commit".to_string(),
        })?;
        Ok(head.to_string())
    }

    fn search(&self, query: &str, depth: Depth) -> Result<Outcome, ExecError> {
        let scope = format!("{}/", MEMORY_DIR);
        let grep = self.git.run_accepting(
            &["grep", "-n", "-i", "-F", "-e", query, "--", &scope],
            &[0, 1],
        )?;
        let matches = grep.stdout.lines().filter_map(parse_grep_line).collect();

        let commits = if self.git.head_oid()?.is_some() {
            let depth_arg = depth.get().to_string();
            let pickaxe = format!("-G{}", escape_ere(query));
            let log = self.git.run(&[
                "log",
                "-n",
                &depth_arg,
                LOG_FORMAT,
                "--date=short",
                "-i",
                &pickaxe,
                "--",
                &scope,
            ])?;
            parse_log(&log.stdout)
        } else {
            Vec::new()
        };

        Ok(Outcome::Search {
            query: query.to_string(),
            depth,
            matches,
            commits,
        })
    }

    fn create(&self, symbol: Symbol, slug: &Slug, content: &str) -> Result<Outcome, ExecError> {
        let _lock = self.begin_mutation()?;
        let store = self.store();
        let entry = store.create(&MemoryDocument::new(symbol, slug.clone(), content))?;

        let committed = self
            .git
            .run(&["add", "--", &entry.rel_path])
            .map_err(ExecError::from)
            .and_then(|_| self.commit(&entry.rel_path, "create", &entry));
        let commit = match committed {
            Ok(commit) => commit,
            Err(err) => {
                let _ = self.git.run(&["reset", "-q", "--", &entry.rel_path]);
                if let Err(cleanup) = store.discard(&entry) {
                    tracing::warn!(path = %entry.rel_path, %cleanup, "could not remove uncommitted memory");
                }
                return Err(err);
            }
        };

        Ok(Outcome::Create {
            path: entry.rel_path,
            symbol,
            slug: slug.clone(),
            commit,
        })
    }

    fn view(&self, reference: &str) -> Result<Outcome, ExecError> {
        if let Some(entry) = self.store().resolve(reference) {
            let content = self.store().read(&entry)?;
            return Ok(Outcome::View {
                reference: reference.to_string(),
                path: Some(entry.rel_path),
                content,
            });
        }

        reject_option_like(reference)?;
        let shown = self.git.run(&["show", reference])?;
        Ok(Outcome::View {
            reference: reference.to_string(),
            path: None,
            content: shown.stdout,
        })
    }

    fn update(&self, reference: &str, content: &str) -> Result<Outcome, ExecError> {
        let _lock = self.begin_mutation()?;
        let store = self.store();
        let entry = self.resolve(reference)?;
        let previous = store.read(&entry)?;
        store.update(&entry, content)?;

        let committed = self
            .git
            .run(&["add", "--", &entry.rel_path])
            .map_err(ExecError::from)
            .and_then(|_| self.commit(&entry.rel_path, "update", &entry));
        let commit = match committed {
            Ok(commit) => commit,
            Err(err) => {
                if let Err(cleanup) = store.restore(&entry, &previous) {
                    tracing::warn!(path = %entry.rel_path, %cleanup, "could not restore memory");
                }
                let _ = self.git.run(&["add", "--", &entry.rel_path]);
                return Err(err);
            }
        };

        Ok(Outcome::Update {
            path: entry.rel_path,
            commit,
        })
    }

    fn delete(&self, reference: &str) -> Result<Outcome, ExecError> {
        let _lock = self.begin_mutation()?;
        let entry = self.resolve(reference)?;
        self.git.run(&["rm", "-q", "--", &entry.rel_path])?;
        let commit = match self.commit(&entry.rel_path, "delete", &entry) {
            Ok(commit) => commit,
            Err(err) => {
                let _ = self
                    .git
                    .run(&["checkout", "HEAD", "--", &entry.rel_path]);
                return Err(err);
            }
        };
        Ok(Outcome::Delete {
            path: entry.rel_path,
            commit,
        })
    }

    fn history(&self, path: &str, depth: Depth) -> Result<Outcome, ExecError> {
        // A slug or memory path narrows history to that file.
        let target = match self.store().resolve(path) {
            Some(entry) => entry.rel_path,
            None => path.to_string(),
        };

        let commits = if self.git.head_oid()?.is_some() {
            let depth_arg = depth.get().to_string();
            let log = self.git.run(&[
                "log",
                "-n",
                &depth_arg,
                LOG_FORMAT,
                "--date=short",
                "--",
                &target,
            ])?;
            parse_log(&log.stdout)
        } else {
            Vec::new()
        };

        Ok(Outcome::History {
            path: target,
            depth,
            commits,
        })
    }

    fn diff(&self, from: &str, to: &str) -> Result<Outcome, ExecError> {
        reject_option_like(from)?;
        reject_option_like(to)?;
        let scope = format!("{}/", MEMORY_DIR);
        let out = self.git.run(&["diff", from, to, "--", &scope])?;
        Ok(Outcome::Diff {
            from: from.to_string(),
            to: to.to_string(),
            diff: out.stdout,
        })
    }

    fn list(&self, symbol: Option<Symbol>) -> Result<Outcome, ExecError> {
        let memories = self.store().list(symbol)?;
        Ok(Outcome::List { symbol, memories })
    }
}

fn reject_option_like(revision: &str) -> Result<(), ExecError> {
    if revision.starts_with('-') {
        return Err(ExecError::OptionLikeRevision {
            revision: revision.to_string(),
        });
    }
    Ok(())
}

/// `path:line:text`, as printed by `git grep -n`.
fn parse_grep_line(line: &str) -> Option<SearchMatch> {
    let mut parts = line.splitn(3, ':');
    let path = parts.next()?;
    let number = parts.next()?.parse().ok()?;
    let text = parts.next()?;
    Some(SearchMatch {
        path: path.to_string(),
        line: number,
        text: text.to_string(),
    })
}

/// Lines of `%h %ad %s` with a short date.
fn parse_log(stdout: &str) -> Vec<CommitSummary> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, ' ');
            Some(CommitSummary {
                hash: parts.next()?.to_string(),
                date: parts.next()?.to_string(),
                subject: parts.next().unwrap_or_default().to_string(),
            })
        })
        .collect()
}

/// Escape text for use as a literal inside a POSIX extended regex, which is
/// what `git log -G` compiles.
fn escape_ere(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if ".[]()*+?{}|^$\\".contains(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
