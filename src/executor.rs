//! # Rebranch Executor
//!
//! Works through a [`RebranchSession`]'s remaining plan one step at a time.
//!
//! Before each rebase the session is saved with the step already removed from
//! the plan and the child's pre-rebase revision recorded, so an interruption
//! at any point leaves enough on disk to continue or abort.
//!
//! A child is rebased with `rebase --onto <parent> <parent's old revision>
//! <child>`. Using the parent's revision from *before* it was rebased as the
//! range start means only the child's own commits are replayed, even though
//! the parent itself has already moved.
//!
//! A rebase that fails (normally a merge conflict) halts the run with
//! [`RunOutcome::Halted`]. This is not an error: the session stays on disk
//! and the user resolves the conflict, then continues or aborts.

use log::debug;

use crate::error::{Error, Result};
use crate::git::{short_revision, CommandOutput};
use crate::output::Reporter;
use crate::repository::GitOperations;
use crate::state::{RebranchSession, SessionStore};

/// Lifecycle of one executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    Idle,
    Running,
    HaltedOnConflict,
    Completed,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every step succeeded and the session was cleared.
    Completed,
    /// Rebasing `child` onto `parent` stopped; the session is kept.
    Halted { parent: String, child: String },
}

/// Everything the engine needs from its surroundings: the repository, the
/// session file and somewhere to report progress.
pub struct Workspace<'a> {
    pub git: &'a dyn GitOperations,
    pub store: &'a SessionStore,
    pub reporter: &'a dyn Reporter,
}

impl<'a> Workspace<'a> {
    pub fn new(
        git: &'a dyn GitOperations,
        store: &'a SessionStore,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            git,
            store,
            reporter,
        }
    }
}

/// Drives the rebase plan of a session.
pub struct Executor<'w, 'a> {
    workspace: &'w Workspace<'a>,
    state: ExecutorState,
}

impl<'w, 'a> Executor<'w, 'a> {
    pub fn new(workspace: &'w Workspace<'a>) -> Self {
        Self {
            workspace,
            state: ExecutorState::Idle,
        }
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    /// Runs the remaining plan of `session` until it is exhausted or a
    /// rebase stops.
    pub fn run(&mut self, mut session: RebranchSession) -> Result<RunOutcome> {
        self.state = ExecutorState::Running;
        let git = self.workspace.git;

        while let Some(step) = session.pop_step() {
            // A rebase started elsewhere is never claimed by this step
            if !step.is_root() && git.rebase_in_progress() {
                session.remaining_plan.insert(0, step);
                session.current_step = None;
                self.workspace.store.save(&session)?;
                return Err(Error::RebaseInProgress);
            }

            let old_revision = git.branch_revision(&step.child)?;
            session
                .original_revisions
                .record(&step.child, old_revision.as_str());
            session.current_step = (!step.is_root()).then(|| step.clone());
            self.workspace.store.save(&session)?;

            let Some(parent) = step.parent.as_deref() else {
                debug!("recorded {} at {}", step.child, old_revision);
                continue;
            };

            self.workspace
                .reporter
                .info(&format!("Rebasing {} onto {}", step.child, parent));

            let range_start = session
                .original_revisions
                .get(parent)
                .ok_or_else(|| Error::CorruptSession {
                    message: format!("no recorded revision for parent branch '{}'", parent),
                })?
                .to_string();
            let output = git.rebase_onto(parent, &range_start, &step.child)?;

            if !output.success {
                self.state = ExecutorState::HaltedOnConflict;
                report_conflict(self.workspace.reporter, &output);
                return Ok(RunOutcome::Halted {
                    parent: parent.to_string(),
                    child: step.child,
                });
            }

            debug!("git rebase output:\n{}", output.diagnostics());
            report_rebased(self.workspace, &step.child, &old_revision)?;
        }

        self.workspace.store.clear()?;
        self.state = ExecutorState::Completed;
        Ok(RunOutcome::Completed)
    }
}

/// Reports how far a successful rebase moved `branch`.
pub(crate) fn report_rebased(
    workspace: &Workspace<'_>,
    branch: &str,
    old_revision: &str,
) -> Result<()> {
    let new_revision = workspace.git.branch_revision(branch)?;
    let message = if new_revision == old_revision {
        format!("Rebased {} (no change)", branch)
    } else {
        format!(
            "Rebased {} ({} -> {})",
            branch,
            short_revision(old_revision),
            short_revision(&new_revision)
        )
    };
    workspace.reporter.info(&message);
    Ok(())
}

fn report_conflict(reporter: &dyn Reporter, output: &CommandOutput) {
    reporter.diagnostics(&output.diagnostics());
    reporter.error("Rebranching failed.");
    reporter.error("To continue, resolve conflicts and run \"git rebranch --continue\"");
    reporter.error(
        "To stop rebasing and return everything as it were, run \"git rebranch --abort\"",
    );
}
