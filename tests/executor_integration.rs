//! Integration tests for the executor.
//!
//! These tests drive every operation against real git repositories created
//! in temporary directories.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use gitmem::core::lock::RepoLock;
use gitmem::core::memory::MemoryDocument;
use gitmem::core::paths::GitmemPaths;
use gitmem::core::types::{Depth, Symbol};
use gitmem::dsl::{self, DslError};
use gitmem::engine::{CommitSummary, Executor, Outcome};
use gitmem::git::Git;

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit.
    fn new() -> Self {
        let repo = Self::empty();
        std::fs::write(repo.path().join("README.md"), "# Test Repo\n").unwrap();
        run_git(repo.path(), &["add", "README.md"]);
        run_git(repo.path(), &["commit", "-m", "Initial commit"]);
        repo
    }

    /// Create a repository with no commits.
    fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn paths(&self) -> GitmemPaths {
        let git = Git::open(self.path()).expect("open test repo");
        GitmemPaths::from_repo_info(&git.info().unwrap())
    }

    /// Run one expression through the front-end and the executor.
    fn exec(&self, expr: &str) -> Result<Outcome, DslError> {
        let params = dsl::process(expr)?;
        Executor::open(self.path())
            .and_then(|executor| executor.execute(&params))
            .map_err(DslError::from)
    }

    fn exec_ok(&self, expr: &str) -> Outcome {
        match self.exec(expr) {
            Ok(outcome) => outcome,
            Err(err) => panic!("{} failed: {:?}", expr, err),
        }
    }

    fn git_stdout(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("git command failed");
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    fn head(&self) -> String {
        self.git_stdout(&["rev-parse", "HEAD"])
    }

    fn last_subject(&self) -> String {
        self.git_stdout(&["log", "-1", "--format=%s"])
    }
}

/// Run a git command in the given directory.
fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn subjects(commits: &[CommitSummary]) -> Vec<&str> {
    commits.iter().map(|c| c.subject.as_str()).collect()
}

// =============================================================================
// Full lifecycle
// =============================================================================

#[test]
fn memory_lifecycle() {
    let repo = TestRepo::new();

    // create
    match repo.exec_ok(r#"(create 💡 "auth-flow" "Tokens rotate hourly")"#) {
        Outcome::Create {
            path,
            symbol,
            slug,
            commit,
        } => {
            assert_eq!(path, "memories/insight/auth-flow.md");
            assert_eq!(symbol, Symbol::Insight);
            assert_eq!(slug.as_str(), "auth-flow");
            assert_eq!(commit, repo.head());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(repo.last_subject(), "memory: create 💡 auth-flow");
    assert!(repo.path().join("memories/insight/auth-flow.md").is_file());

    // list
    match repo.exec_ok("(list)") {
        Outcome::List { symbol, memories } => {
            assert_eq!(symbol, None);
            assert_eq!(memories.len(), 1);
            assert_eq!(memories[0].rel_path, "memories/insight/auth-flow.md");
        }
        other => panic!("unexpected {:?}", other),
    }
    match repo.exec_ok("(list 🎯)") {
        Outcome::List { memories, .. } => assert!(memories.is_empty()),
        other => panic!("unexpected {:?}", other),
    }

    // view
    match repo.exec_ok(r#"(view "auth-flow")"#) {
        Outcome::View { path, content, .. } => {
            assert_eq!(path.as_deref(), Some("memories/insight/auth-flow.md"));
            let doc = MemoryDocument::parse(&content).unwrap();
            assert_eq!(doc.symbol, Symbol::Insight);
            assert_eq!(doc.slug.as_str(), "auth-flow");
            assert_eq!(doc.content, "Tokens rotate hourly");
            assert!(content.ends_with("\n\nTokens rotate hourly\n"));
        }
        other => panic!("unexpected {:?}", other),
    }

    // search: case-insensitive, in files and in history
    match repo.exec_ok(r#"(search "ROTATE" 3)"#) {
        Outcome::Search {
            query,
            depth,
            matches,
            commits,
        } => {
            assert_eq!(query, "ROTATE");
            assert_eq!(depth.get(), 3);
            assert_eq!(matches.len(), 1);
            assert_eq!(matches[0].path, "memories/insight/auth-flow.md");
            assert_eq!(matches[0].line, 8);
            assert_eq!(matches[0].text, "Tokens rotate hourly");
            assert_eq!(subjects(&commits), vec!["memory: create 💡 auth-flow"]);
        }
        other => panic!("unexpected {:?}", other),
    }

    // update
    match repo.exec_ok(r#"(update "auth-flow" "Tokens rotate every 30 minutes")"#) {
        Outcome::Update { path, commit } => {
            assert_eq!(path, "memories/insight/auth-flow.md");
            assert_eq!(commit, repo.head());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(repo.last_subject(), "memory: update 💡 auth-flow");

    // history of one memory, newest first
    match repo.exec_ok(r#"(history "auth-flow" 5)"#) {
        Outcome::History {
            path,
            depth,
            commits,
        } => {
            assert_eq!(path, "memories/insight/auth-flow.md");
            assert_eq!(depth.get(), 5);
            assert_eq!(
                subjects(&commits),
                vec!["memory: update 💡 auth-flow", "memory: create 💡 auth-flow"]
            );
        }
        other => panic!("unexpected {:?}", other),
    }

    // diff with defaults covers the update
    match repo.exec_ok("(diff)") {
        Outcome::Diff { from, to, diff } => {
            assert_eq!(from, "HEAD~1");
            assert_eq!(to, "HEAD");
            assert!(diff.contains("-Tokens rotate hourly"));
            assert!(diff.contains("+Tokens rotate every 30 minutes"));
        }
        other => panic!("unexpected {:?}", other),
    }

    // delete by path
    match repo.exec_ok(r#"(delete "memories/insight/auth-flow.md")"#) {
        Outcome::Delete { path, commit } => {
            assert_eq!(path, "memories/insight/auth-flow.md");
            assert_eq!(commit, repo.head());
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(repo.last_subject(), "memory: delete 💡 auth-flow");
    assert!(!repo.path().join("memories/insight/auth-flow.md").exists());

    match repo.exec_ok("(list)") {
        Outcome::List { memories, .. } => assert!(memories.is_empty()),
        other => panic!("unexpected {:?}", other),
    }
}

// =============================================================================
// Individual operations
// =============================================================================

#[test]
fn create_refuses_existing_slug_in_any_kind() {
    let repo = TestRepo::new();
    repo.exec_ok(r#"(create 🔄 "retry" "Back off")"#);
    let head = repo.head();

    let err = repo
        .exec(r#"(create 🎯 "retry" "Another")"#)
        .unwrap_err();
    assert_eq!(err.kind(), "memory-error");
    assert_eq!(repo.head(), head);
    assert!(!repo.path().join("memories/goal/retry.md").exists());
}

#[test]
fn update_unknown_memory_fails() {
    let repo = TestRepo::new();
    let err = repo.exec(r#"(update "ghost" "boo")"#).unwrap_err();
    assert_eq!(err.kind(), "memory-error");
}

#[test]
fn view_falls_back_to_revisions() {
    let repo = TestRepo::new();
    match repo.exec_ok(r#"(view "HEAD:README.md")"#) {
        Outcome::View { path, content, .. } => {
            assert_eq!(path, None);
            assert_eq!(content, "# Test Repo\n");
        }
        other => panic!("unexpected {:?}", other),
    }

    let err = repo.exec(r#"(view "missing")"#).unwrap_err();
    match err {
        DslError::GitError { command, stderr, .. } => {
            assert_eq!(command, "git show missing");
            assert!(!stderr.is_empty());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn history_defaults_to_memories_directory() {
    let repo = TestRepo::new();
    repo.exec_ok(r#"(create 💡 "one" "first")"#);
    repo.exec_ok(r#"(create 🌀 "two" "second")"#);
    repo.exec_ok(r#"(create 🎯 "three" "third")"#);

    match repo.exec_ok("(history)") {
        Outcome::History {
            path,
            depth,
            commits,
        } => {
            assert_eq!(path, "memories/");
            assert_eq!(depth, Depth::DEFAULT);
            assert_eq!(
                subjects(&commits),
                vec!["memory: create 🎯 three", "memory: create 🌀 two"]
            );
            assert!(commits.iter().all(|c| c.date.len() == 10));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn search_without_matches_is_success() {
    let repo = TestRepo::new();
    repo.exec_ok(r#"(create 💡 "note" "nothing relevant")"#);
    match repo.exec_ok(r#"(search "zebra.*(")"#) {
        Outcome::Search {
            matches, commits, ..
        } => {
            assert!(matches.is_empty());
            assert!(commits.is_empty());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn read_operations_on_unborn_repository() {
    let repo = TestRepo::empty();
    match repo.exec_ok(r#"(search "anything")"#) {
        Outcome::Search {
            matches, commits, ..
        } => {
            assert!(matches.is_empty());
            assert!(commits.is_empty());
        }
        other => panic!("unexpected {:?}", other),
    }
    match repo.exec_ok("(history)") {
        Outcome::History { commits, .. } => assert!(commits.is_empty()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn first_memory_in_unborn_repository() {
    let repo = TestRepo::empty();
    match repo.exec_ok(r#"(create 🎯 "ship-v1" "Release the first version")"#) {
        Outcome::Create { commit, .. } => assert_eq!(commit, repo.head()),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn diff_needs_two_commits() {
    let repo = TestRepo::new();
    let err = repo.exec("(diff)").unwrap_err();
    match err {
        DslError::GitError {
            command,
            suggestion,
            ..
        } => {
            assert_eq!(command, "git diff HEAD~1 HEAD -- memories/");
            assert!(suggestion.is_some());
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn diff_rejects_option_like_revisions() {
    let repo = TestRepo::new();
    let err = repo.exec(r#"(diff "--output=/tmp/x" "HEAD")"#).unwrap_err();
    assert_eq!(err.kind(), "memory-error");
}

#[test]
fn commits_leave_other_staged_changes_alone() {
    let repo = TestRepo::new();
    std::fs::write(repo.path().join("staged.txt"), "wip\n").unwrap();
    run_git(repo.path(), &["add", "staged.txt"]);

    repo.exec_ok(r#"(create 💡 "focused" "only this file")"#);

    let changed = repo.git_stdout(&["show", "--name-only", "--format=", "HEAD"]);
    assert_eq!(changed, "memories/insight/focused.md");
    let status = repo.git_stdout(&["status", "--porcelain"]);
    assert!(status.contains("A  staged.txt"));
}

// =============================================================================
// Guards
// =============================================================================

#[test]
fn held_lock_blocks_mutations_only() {
    let repo = TestRepo::new();
    let paths = repo.paths();
    let _lock = RepoLock::acquire(&paths).expect("acquire lock");

    let err = repo.exec(r#"(create 💡 "blocked" "x")"#).unwrap_err();
    assert_eq!(err.kind(), "memory-error");
    assert!(!repo.path().join("memories/insight/blocked.md").exists());

    assert!(repo.exec("(list)").is_ok());
}

#[test]
fn mutations_refused_during_merge() {
    let repo = TestRepo::new();
    repo.exec_ok(r#"(create 💡 "stable" "x")"#);
    let head = repo.head();
    std::fs::write(repo.path().join(".git/MERGE_HEAD"), format!("{}\n", head)).unwrap();

    let err = repo.exec(r#"(update "stable" "y")"#).unwrap_err();
    match err {
        DslError::GitError { stderr, suggestion, .. } => {
            assert_eq!(stderr, "merge in progress");
            assert!(suggestion.unwrap().contains("abort"));
        }
        other => panic!("unexpected {:?}", other),
    }

    // Reads still work.
    assert!(repo.exec(r#"(view "stable")"#).is_ok());
}

#[cfg(unix)]
#[test]
fn failed_commit_rolls_back_the_file() {
    use std::os::unix::fs::PermissionsExt;

    let repo = TestRepo::new();
    let hook = repo.path().join(".git/hooks/pre-commit");
    std::fs::create_dir_all(hook.parent().unwrap()).unwrap();
    std::fs::write(&hook, "#!/bin/sh\nexit 1\n").unwrap();
    std::fs::set_permissions(&hook, std::fs::Permissions::from_mode(0o755)).unwrap();
    let head = repo.head();

    let err = repo.exec(r#"(create 💡 "rejected" "x")"#).unwrap_err();
    assert_eq!(err.kind(), "git-error");
    assert_eq!(repo.head(), head);
    assert!(!repo.path().join("memories/insight/rejected.md").exists());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn repo_config_sets_prefix_and_identity() {
    let repo = TestRepo::new();
    let paths = repo.paths();
    std::fs::create_dir_all(paths.repo_gitmem_dir()).unwrap();
    std::fs::write(
        paths.repo_config_path(),
        "commit_prefix = \"notes\"\nauthor_name = \"Memory Bot\"\nauthor_email = \"bot@example.com\"\n",
    )
    .unwrap();

    repo.exec_ok(r#"(create 🔄 "configured" "x")"#);
    assert_eq!(repo.last_subject(), "notes: create 🔄 configured");
    assert_eq!(
        repo.git_stdout(&["log", "-1", "--format=%an <%ae>"]),
        "Memory Bot <bot@example.com>"
    );
}

#[test]
fn invalid_repo_config_is_reported() {
    let repo = TestRepo::new();
    let paths = repo.paths();
    std::fs::create_dir_all(paths.repo_gitmem_dir()).unwrap();
    std::fs::write(paths.repo_config_path(), "commit_prefix = \"\"\n").unwrap();

    let err = repo.exec("(list)").unwrap_err();
    assert_eq!(err.kind(), "memory-error");
}
