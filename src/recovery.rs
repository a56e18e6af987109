//! # Continue and Abort
//!
//! An interrupted rebranch is picked up again from its saved session.
//!
//! - [`resume`] finishes the stopped rebase (if git still has one underway)
//!   and then runs the rest of the plan.
//! - [`abort`] stops the rebase and puts every branch touched so far back
//!   where it was, in the order the branches were recorded.
//!
//! Both fail with `Error::NoSession` without touching the repository when
//! nothing was interrupted.

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::executor::{report_rebased, Executor, RunOutcome, Workspace};
use crate::git::short_revision;

/// Continues an interrupted rebranch.
pub fn resume(workspace: &Workspace<'_>) -> Result<RunOutcome> {
    let git = workspace.git;
    let mut session = workspace.store.load()?;

    if git.rebase_in_progress() {
        let Some(step) = session.current_step.clone() else {
            return Err(Error::RebaseInProgress);
        };

        let output = git.rebase_continue()?;
        if !output.success {
            workspace.reporter.diagnostics(&output.diagnostics());
            workspace
                .reporter
                .error("Resolve the conflicts and run \"git rebranch --continue\"");
            workspace
                .reporter
                .error("To stop, run \"git rebranch --abort\"");
            return Ok(RunOutcome::Halted {
                parent: step.parent.unwrap_or_default(),
                child: step.child,
            });
        }
        debug!("git rebase --continue output:\n{}", output.diagnostics());

        match session.original_revisions.get(&step.child) {
            Some(old_revision) => report_rebased(workspace, &step.child, old_revision)?,
            None => warn!("no recorded revision for {}", step.child),
        }
    }
    session.current_step = None;

    let original = session.original_current_branch.clone();
    let outcome = Executor::new(workspace).run(session)?;
    if outcome == RunOutcome::Completed {
        git.checkout(&original)?;
    }
    Ok(outcome)
}

/// Abandons an interrupted rebranch, restoring every rebased branch.
pub fn abort(workspace: &Workspace<'_>) -> Result<()> {
    let git = workspace.git;
    let session = workspace.store.load()?;

    if git.rebase_in_progress() {
        let output = git.rebase_abort()?;
        if !output.success {
            workspace.reporter.diagnostics(&output.diagnostics());
            return Err(Error::RebaseAbortFailed);
        }
    }

    if git.is_dirty()? {
        return Err(Error::DirtyWorkingTree);
    }

    for entry in session.original_revisions.iter() {
        workspace.reporter.info(&format!(
            "Resetting {} to {}",
            entry.branch,
            short_revision(&entry.revision)
        ));
        git.reset_hard(&entry.branch, &entry.revision)?;
    }

    git.checkout(&session.original_current_branch)?;
    workspace.store.clear()
}
