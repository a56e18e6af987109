//! Thin wrappers around the system `git` command.
//!
//! Every function takes the working directory to run in. Queries whose
//! failure means the repository is unusable return `Error::GitCommand` with
//! git's stderr. The rebase commands instead return a [`CommandOutput`],
//! because a failed rebase (usually a conflict) is an expected outcome that
//! the caller reports and recovers from.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Number of hex digits shown when a revision is printed.
const SHORT_REVISION_LEN: usize = 7;

/// Raw result of a git command whose failure is not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout and stderr joined, trimmed, for showing to the user.
    pub fn diagnostics(&self) -> String {
        [self.stdout.trim_end(), self.stderr.trim_end()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Runs `git <args>` in `dir` and captures its output.
pub fn run(dir: &Path, args: &[&str]) -> Result<CommandOutput> {
    run_with_env(dir, args, &[])
}

fn run_with_env(dir: &Path, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
    debug!("git {} (in {})", args.join(" "), dir.display());

    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(env.iter().copied())
        .output()
        .map_err(|e| Error::GitCommand {
            command: args.join(" "),
            stderr: e.to_string(),
        })?;

    Ok(CommandOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs a git command that must succeed and returns its trimmed stdout.
fn run_checked(dir: &Path, args: &[&str]) -> Result<String> {
    let output = run(dir, args)?;
    if !output.success {
        return Err(Error::GitCommand {
            command: args.join(" "),
            stderr: output.stderr,
        });
    }
    Ok(output.stdout.trim().to_string())
}

/// Root directory of the working tree containing `dir`.
pub fn show_toplevel(dir: &Path) -> Result<PathBuf> {
    run_checked(dir, &["rev-parse", "--show-toplevel"]).map(PathBuf::from)
}

/// Absolute path of the git directory (`.git`, or the worktree's private
/// directory for linked worktrees).
pub fn absolute_git_dir(dir: &Path) -> Result<PathBuf> {
    run_checked(dir, &["rev-parse", "--absolute-git-dir"]).map(PathBuf::from)
}

/// Name of the checked-out branch, or `None` when HEAD is detached.
pub fn symbolic_head(dir: &Path) -> Result<Option<String>> {
    let output = run(dir, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;
    if output.success {
        Ok(Some(output.stdout.trim().to_string()))
    } else {
        Ok(None)
    }
}

/// Full hash of the commit a reference points at, or `None` if it does not
/// resolve to a commit.
pub fn resolve_commit(dir: &Path, reference: &str) -> Result<Option<String>> {
    let spec = format!("{}^{{commit}}", reference);
    let output = run(dir, &["rev-parse", "--verify", "--quiet", &spec])?;
    if output.success {
        Ok(Some(output.stdout.trim().to_string()))
    } else {
        Ok(None)
    }
}

/// Full hash of the local branch `branch`, or `None` if there is no such
/// branch.
pub fn resolve_branch(dir: &Path, branch: &str) -> Result<Option<String>> {
    resolve_commit(dir, &format!("refs/heads/{}", branch))
}

/// Returns true if tracked files have uncommitted changes. Untracked files
/// are ignored.
pub fn status_is_dirty(dir: &Path) -> Result<bool> {
    let status = run_checked(dir, &["status", "--porcelain"])?;
    Ok(status
        .lines()
        .any(|line| !line.is_empty() && !line.starts_with("??")))
}

/// Checks out a branch or revision.
pub fn checkout(dir: &Path, target: &str) -> Result<()> {
    run_checked(dir, &["checkout", "--quiet", target]).map(|_| ())
}

/// Resets the current branch, index and working tree to `revision`.
pub fn reset_hard(dir: &Path, revision: &str) -> Result<()> {
    run_checked(dir, &["reset", "--quiet", "--hard", revision]).map(|_| ())
}

/// Replays the commits in `range_start..range_end` onto `new_base`.
///
/// `range_end` must be a branch name; git checks it out and moves it to the
/// rebased result.
pub fn rebase_onto(
    dir: &Path,
    new_base: &str,
    range_start: &str,
    range_end: &str,
) -> Result<CommandOutput> {
    run(
        dir,
        &["rebase", "--merge", "--onto", new_base, range_start, range_end],
    )
}

/// Continues a stopped rebase without opening an editor for commit messages.
pub fn rebase_continue(dir: &Path) -> Result<CommandOutput> {
    run_with_env(dir, &["rebase", "--continue"], &[("GIT_EDITOR", "true")])
}

/// Aborts a stopped rebase, restoring the branch being rebased.
pub fn rebase_abort(dir: &Path) -> Result<CommandOutput> {
    run(dir, &["rebase", "--abort"])
}

/// Returns true if git has a rebase underway in `git_dir`.
pub fn rebase_in_progress(git_dir: &Path) -> bool {
    git_dir.join("rebase-merge").exists() || git_dir.join("rebase-apply").exists()
}

/// Abbreviates a revision hash for display.
pub fn short_revision(revision: &str) -> &str {
    revision
        .char_indices()
        .nth(SHORT_REVISION_LEN)
        .map_or(revision, |(end, _)| &revision[..end])
}
