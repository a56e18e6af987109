//! Shared test utilities: an in-memory git fake, a recording reporter and a
//! throwaway real repository for tests that exercise the `git` binary.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use crate::error::{Error, Result};
use crate::git::CommandOutput;
use crate::output::Reporter;
use crate::repository::GitOperations;

// ============================================================================
// FakeGit
// ============================================================================

#[derive(Debug, Default)]
struct FakeRepo {
    branches: BTreeMap<String, String>,
    current: Option<String>,
    detached_at: Option<String>,
    dirty: bool,
    rebasing: Option<String>,
    conflicts: BTreeSet<String>,
    continue_fails: bool,
    abort_fails: bool,
    commits: BTreeSet<String>,
    calls: Vec<String>,
    next_revision: usize,
}

impl FakeRepo {
    fn fresh_revision(&mut self) -> String {
        self.next_revision += 1;
        let revision = format!("new{:04}", self.next_revision);
        self.commits.insert(revision.clone());
        revision
    }
}

/// In-memory stand-in for a git repository.
///
/// Rebases succeed by giving the rebased branch a fresh revision, unless the
/// branch was registered with [`FakeGit::conflict_on`], in which case the
/// rebase stops with a conflict until `rebase_continue` or `rebase_abort`.
pub struct FakeGit {
    root: PathBuf,
    git_dir: PathBuf,
    repo: RefCell<FakeRepo>,
}

impl FakeGit {
    /// Creates an empty fake whose git directory is `git_dir`.
    pub fn new(git_dir: &Path) -> Self {
        Self {
            root: git_dir.parent().unwrap_or(git_dir).to_path_buf(),
            git_dir: git_dir.to_path_buf(),
            repo: RefCell::new(FakeRepo::default()),
        }
    }

    pub fn with_branch(self, name: &str, revision: &str) -> Self {
        {
            let mut repo = self.repo.borrow_mut();
            repo.branches.insert(name.to_string(), revision.to_string());
            repo.commits.insert(revision.to_string());
        }
        self
    }

    pub fn on_branch(self, name: &str) -> Self {
        {
            let mut repo = self.repo.borrow_mut();
            repo.current = Some(name.to_string());
            repo.detached_at = None;
        }
        self
    }

    pub fn detached_at(self, revision: &str) -> Self {
        {
            let mut repo = self.repo.borrow_mut();
            repo.current = None;
            repo.detached_at = Some(revision.to_string());
            repo.commits.insert(revision.to_string());
        }
        self
    }

    /// Makes every rebase of `branch` stop with a conflict.
    pub fn conflict_on(self, branch: &str) -> Self {
        self.repo
            .borrow_mut()
            .conflicts
            .insert(branch.to_string());
        self
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.repo.borrow_mut().dirty = dirty;
    }

    pub fn set_continue_fails(&self, fails: bool) {
        self.repo.borrow_mut().continue_fails = fails;
    }

    pub fn set_abort_fails(&self, fails: bool) {
        self.repo.borrow_mut().abort_fails = fails;
    }

    pub fn revision(&self, branch: &str) -> Option<String> {
        self.repo.borrow().branches.get(branch).cloned()
    }

    pub fn current(&self) -> Option<String> {
        self.repo.borrow().current.clone()
    }

    /// Every mutating call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.repo.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.repo.borrow_mut().calls.clear();
    }
}

impl GitOperations for FakeGit {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn current_branch(&self) -> Result<Option<String>> {
        Ok(self.repo.borrow().current.clone())
    }

    fn is_dirty(&self) -> Result<bool> {
        Ok(self.repo.borrow().dirty)
    }

    fn checkout(&self, target: &str) -> Result<()> {
        let mut repo = self.repo.borrow_mut();
        repo.calls.push(format!("checkout {}", target));
        if repo.branches.contains_key(target) {
            repo.current = Some(target.to_string());
            repo.detached_at = None;
            Ok(())
        } else if repo.commits.contains(target) {
            repo.current = None;
            repo.detached_at = Some(target.to_string());
            Ok(())
        } else {
            Err(Error::GitCommand {
                command: format!("checkout --quiet {}", target),
                stderr: format!("error: pathspec '{}' did not match", target),
            })
        }
    }

    fn revision_of(&self, reference: &str) -> Result<String> {
        let repo = self.repo.borrow();
        let revision = if reference == "HEAD" {
            match &repo.current {
                Some(branch) => repo.branches.get(branch).cloned(),
                None => repo.detached_at.clone(),
            }
        } else {
            repo.branches.get(reference).cloned()
        };
        revision.ok_or_else(|| Error::UnknownBranch {
            branch: reference.to_string(),
        })
    }

    fn branch_revision(&self, branch: &str) -> Result<String> {
        self.repo
            .borrow()
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| Error::UnknownBranch {
                branch: branch.to_string(),
            })
    }

    fn reset_hard(&self, branch: &str, revision: &str) -> Result<()> {
        let mut repo = self.repo.borrow_mut();
        repo.calls.push(format!("reset {} {}", branch, revision));
        repo.branches
            .insert(branch.to_string(), revision.to_string());
        repo.current = Some(branch.to_string());
        repo.detached_at = None;
        Ok(())
    }

    fn rebase_onto(
        &self,
        new_base: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<CommandOutput> {
        let mut repo = self.repo.borrow_mut();
        repo.calls
            .push(format!("rebase {} {} {}", new_base, range_start, range_end));

        repo.detached_at = None;
        if repo.conflicts.contains(range_end) {
            repo.rebasing = Some(range_end.to_string());
            repo.current = None;
            return Ok(CommandOutput {
                success: false,
                stdout: format!("CONFLICT (content): Merge conflict in {}.txt\n", range_end),
                stderr: "error: could not apply 1234567... change\n".to_string(),
            });
        }

        let revision = repo.fresh_revision();
        repo.branches.insert(range_end.to_string(), revision);
        repo.current = Some(range_end.to_string());
        Ok(CommandOutput {
            success: true,
            stdout: String::new(),
            stderr: format!("Successfully rebased and updated refs/heads/{}.\n", range_end),
        })
    }

    fn rebase_continue(&self) -> Result<CommandOutput> {
        let mut repo = self.repo.borrow_mut();
        repo.calls.push("rebase --continue".to_string());

        if repo.continue_fails {
            return Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: "a.txt: needs merge\nYou must edit all merge conflicts\n".to_string(),
            });
        }
        if let Some(branch) = repo.rebasing.take() {
            let revision = repo.fresh_revision();
            repo.branches.insert(branch.clone(), revision);
            repo.current = Some(branch);
        }
        Ok(CommandOutput {
            success: true,
            ..CommandOutput::default()
        })
    }

    fn rebase_abort(&self) -> Result<CommandOutput> {
        let mut repo = self.repo.borrow_mut();
        repo.calls.push("rebase --abort".to_string());

        if repo.abort_fails {
            return Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: "error: could not move back to HEAD\n".to_string(),
            });
        }
        if let Some(branch) = repo.rebasing.take() {
            repo.current = Some(branch);
        }
        Ok(CommandOutput {
            success: true,
            ..CommandOutput::default()
        })
    }

    fn rebase_in_progress(&self) -> bool {
        self.repo.borrow().rebasing.is_some()
    }
}

// ============================================================================
// RecordingReporter
// ============================================================================

/// Reporter that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    infos: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn infos(&self) -> Vec<String> {
        self.infos.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.infos.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

// ============================================================================
// GitSandbox
// ============================================================================

/// A real git repository in a temporary directory with a `main` branch.
pub struct GitSandbox {
    dir: TempDir,
}

impl GitSandbox {
    /// Returns true if a `git` binary can be run.
    pub fn git_available() -> bool {
        Command::new("git")
            .arg("--version")
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Creates the repository, or `None` when git is not installed.
    pub fn new() -> Option<Self> {
        if !Self::git_available() {
            return None;
        }
        let sandbox = Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        };
        sandbox.git(&["init", "-q"]);
        sandbox.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        sandbox.git(&["config", "user.name", "Rebranch Test"]);
        sandbox.git(&["config", "user.email", "rebranch@example.com"]);
        sandbox.git(&["config", "commit.gpgsign", "false"]);
        Some(sandbox)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Runs git in the sandbox and returns trimmed stdout; panics on failure.
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

    pub fn write_file(&self, name: &str, content: &str) {
        let path = self.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directory");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Writes, stages and commits a file; returns the new HEAD revision.
    pub fn commit_file(&self, name: &str, content: &str, message: &str) -> String {
        self.write_file(name, content);
        self.git(&["add", name]);
        self.git(&["commit", "-q", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }
}
