//! Shared test utilities for E2E tests.
//!
//! This module provides fixtures for driving the `git-rebranch` binary
//! against real, throwaway git repositories.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let Some(repo) = stacked_repo() else {
//!         return;
//!     };
//!     repo.command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::trees;
    #[allow(unused_imports)]
    pub use super::{build_stacked_repo, stacked_repo, GitRepo, TestFixture};
}

/// Branch tree snippets for testing.
#[allow(dead_code)]
pub mod trees {
    /// The tree built by [`super::stacked_repo`].
    pub const STACKED: &str = "main\n    feature-a\n        feature-a-sub\n    feature-b\n";

    /// Same tree, indented with tabs.
    pub const STACKED_TABS: &str = "main\n\tfeature-a\n\t\tfeature-a-sub\n\tfeature-b\n";

    /// Skips two levels of nesting on line 3.
    pub const BAD_NESTING: &str = "main\n    feature-a\n            feature-b\n";

    /// Uses three spaces after a four-space unit on line 3.
    pub const BAD_INDENT: &str = "main\n    feature-a\n   feature-b\n";
}

/// A test fixture that provides a temporary directory with optional files.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command configured to run in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        command_in(self.path())
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A git repository in a temporary directory, on branch `main`.
pub struct GitRepo {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl GitRepo {
    /// Create an empty repository, or `None` if git is not installed.
    pub fn new() -> Option<Self> {
        let git_available = Command::new("git")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false);
        if !git_available {
            return None;
        }

        let repo = Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Rebranch Test"]);
        repo.git(&["config", "user.email", "rebranch@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        Some(repo)
    }

    /// Get the path to the working tree.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Run git in the repository and return its trimmed stdout.
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    /// Write a file without staging it.
    pub fn write(&self, path: &str, content: &str) {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
    }

    /// Write, stage and commit a file; returns the new revision.
    pub fn commit(&self, path: &str, content: &str, message: &str) -> String {
        self.write(path, content);
        self.git(&["add", path]);
        self.git(&["commit", "-q", "-m", message]);
        self.rev("HEAD")
    }

    /// Write the `.gitrebranch` tree file (left untracked).
    pub fn with_tree(self, content: &str) -> Self {
        self.write(".gitrebranch", content);
        self
    }

    pub fn checkout(&self, target: &str) {
        self.git(&["checkout", "-q", target]);
    }

    pub fn create_branch(&self, name: &str) {
        self.git(&["checkout", "-q", "-b", name]);
    }

    /// Full revision of a reference.
    pub fn rev(&self, reference: &str) -> String {
        self.git(&["rev-parse", reference])
    }

    pub fn current_branch(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
    }

    /// Returns true if `ancestor` is reachable from `descendant`.
    pub fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        Command::new("git")
            .args(["merge-base", "--is-ancestor", ancestor, descendant])
            .current_dir(self.path())
            .status()
            .expect("Failed to run git")
            .success()
    }

    /// Path of the session file.
    pub fn state_file(&self) -> std::path::PathBuf {
        self.path().join(".git").join("REBRANCH_STATE")
    }

    /// Create a command configured to run in this repository.
    pub fn command(&self) -> assert_cmd::Command {
        command_in(self.path())
    }
}

fn command_in(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("git-rebranch");
    cmd.current_dir(dir)
        .env_remove("GIT_REBRANCH_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("RUST_BACKTRACE")
        .env_remove("RUST_LIB_BACKTRACE")
        .env("NO_COLOR", "1");
    cmd
}

/// Builds a repository with the tree in [`trees::STACKED`], then adds a
/// commit to `main` so every other branch needs rebasing.
///
/// `feature-a` and `main` both edit `shared.txt`; pass `conflicting = true`
/// to make those edits clash.
pub fn build_stacked_repo(conflicting: bool) -> Option<GitRepo> {
    let repo = GitRepo::new()?.with_tree(trees::STACKED);
    repo.commit("shared.txt", "base\n", "base");

    repo.create_branch("feature-a");
    repo.commit("shared.txt", "feature-a\n", "feature-a edits shared");
    repo.create_branch("feature-a-sub");
    repo.commit("sub.txt", "sub\n", "feature-a-sub work");

    repo.checkout("main");
    repo.create_branch("feature-b");
    repo.commit("b.txt", "b\n", "feature-b work");

    repo.checkout("main");
    if conflicting {
        repo.commit("shared.txt", "main\n", "main edits shared");
    } else {
        repo.commit("main.txt", "main\n", "main moves on");
    }
    Some(repo)
}

/// [`build_stacked_repo`] without conflicts.
pub fn stacked_repo() -> Option<GitRepo> {
    build_stacked_repo(false)
}
