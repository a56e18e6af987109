//! # Version-Control Collaborator
//!
//! The rebranch engine never runs `git` directly. Everything it needs from
//! the repository goes through the `GitOperations` trait, which keeps the
//! planning and recovery logic independent of the actual version-control
//! plumbing.
//!
//! ## Design
//!
//! - **`GitOperations`**: The narrow interface the engine depends on: working
//!   tree queries, checkout and reset, and the three rebase commands.
//!
//! - **`DefaultGitOperations`**: The production implementation, which wraps
//!   the functions in [`crate::git`] for one working tree.
//!
//! In tests the trait is implemented by an in-memory fake so that conflict,
//! resume and abort scenarios can be driven without a real repository.
//!
//! The trait has no `Send`/`Sync` bound: a repository has a single working
//! tree and index, so every operation runs sequentially on one thread.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::git::{self, CommandOutput};

/// Trait for git operations - allows mocking in tests
pub trait GitOperations {
    /// Root directory of the working tree.
    fn root_dir(&self) -> &Path;

    /// The repository's private metadata directory.
    fn git_dir(&self) -> &Path;

    /// The checked-out branch, or `None` when HEAD is detached.
    fn current_branch(&self) -> Result<Option<String>>;

    /// Full revision of HEAD.
    fn head_revision(&self) -> Result<String> {
        self.revision_of("HEAD")
    }

    /// Returns true if tracked files have uncommitted changes.
    fn is_dirty(&self) -> Result<bool>;

    /// Checks out a branch or revision.
    fn checkout(&self, target: &str) -> Result<()>;

    /// Resolves a reference to a revision; unknown references fail with
    /// `Error::UnknownBranch`.
    fn revision_of(&self, reference: &str) -> Result<String>;

    /// Revision of the local branch `branch`. Tags and raw revisions are
    /// not branches and fail with `Error::UnknownBranch`.
    fn branch_revision(&self, branch: &str) -> Result<String>;

    /// Moves `branch` to `revision`, discarding working tree changes.
    fn reset_hard(&self, branch: &str, revision: &str) -> Result<()>;

    /// Replays `range_start..range_end` onto `new_base`. A failed result is
    /// not an error; it usually means a conflict stopped the rebase.
    fn rebase_onto(
        &self,
        new_base: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<CommandOutput>;

    /// Continues a stopped rebase.
    fn rebase_continue(&self) -> Result<CommandOutput>;

    /// Aborts a stopped rebase.
    fn rebase_abort(&self) -> Result<CommandOutput>;

    /// Returns true if a rebase is stopped in the working tree.
    fn rebase_in_progress(&self) -> bool;
}

/// The default implementation of `GitOperations`, which runs the system
/// `git` command in one working tree.
#[derive(Debug, Clone)]
pub struct DefaultGitOperations {
    root: PathBuf,
    git_dir: PathBuf,
}

impl DefaultGitOperations {
    /// Opens the repository containing `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let root = git::show_toplevel(dir)?;
        let git_dir = git::absolute_git_dir(&root)?;
        Ok(Self { root, git_dir })
    }
}

impl GitOperations for DefaultGitOperations {
    fn root_dir(&self) -> &Path {
        &self.root
    }

    fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    fn current_branch(&self) -> Result<Option<String>> {
        git::symbolic_head(&self.root)
    }

    fn is_dirty(&self) -> Result<bool> {
        git::status_is_dirty(&self.root)
    }

    fn checkout(&self, target: &str) -> Result<()> {
        git::checkout(&self.root, target)
    }

    fn revision_of(&self, reference: &str) -> Result<String> {
        git::resolve_commit(&self.root, reference)?.ok_or_else(|| Error::UnknownBranch {
            branch: reference.to_string(),
        })
    }

    fn branch_revision(&self, branch: &str) -> Result<String> {
        git::resolve_branch(&self.root, branch)?.ok_or_else(|| Error::UnknownBranch {
            branch: branch.to_string(),
        })
    }

    fn reset_hard(&self, branch: &str, revision: &str) -> Result<()> {
        if self.current_branch()?.as_deref() != Some(branch) {
            git::checkout(&self.root, branch)?;
        }
        git::reset_hard(&self.root, revision)
    }

    fn rebase_onto(
        &self,
        new_base: &str,
        range_start: &str,
        range_end: &str,
    ) -> Result<CommandOutput> {
        git::rebase_onto(&self.root, new_base, range_start, range_end)
    }

    fn rebase_continue(&self) -> Result<CommandOutput> {
        git::rebase_continue(&self.root)
    }

    fn rebase_abort(&self) -> Result<CommandOutput> {
        git::rebase_abort(&self.root)
    }

    fn rebase_in_progress(&self) -> bool {
        git::rebase_in_progress(&self.git_dir)
    }
}
