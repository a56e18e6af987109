//! Starting a rebranch.
//!
//! [`start`] checks the repository is in a state where rebasing is safe,
//! builds the plan from the branch tree and hands it to the
//! [`Executor`]. [`dry_run`] only parses the tree so it can be shown.

use std::path::Path;

use log::{debug, warn};

use crate::config::{self, Forest};
use crate::error::{Error, Result};
use crate::executor::{Executor, RunOutcome, Workspace};
use crate::plan;
use crate::state::RebranchSession;

/// Rebases every branch in the tree at `config_path` onto its parent.
///
/// Nothing is touched unless the working tree is clean, no other rebranch is
/// interrupted and every configured branch exists. When the plan finishes,
/// the branch that was checked out at the start is checked out again.
pub fn start(workspace: &Workspace<'_>, config_path: &Path) -> Result<RunOutcome> {
    let git = workspace.git;

    if workspace.store.exists() {
        return Err(Error::SessionInProgress);
    }
    if git.is_dirty()? {
        return Err(Error::DirtyWorkingTree);
    }

    let original = match git.current_branch()? {
        Some(branch) => branch,
        None => {
            let revision = git.head_revision()?;
            warn!("HEAD is detached; will return to {} afterwards", revision);
            revision
        }
    };

    let forest = config::from_file(config_path)?;
    let steps = plan::rebase_plan(&forest);
    for name in plan::all_branch_names(&forest) {
        git.branch_revision(&name)?;
    }
    debug!("rebase plan has {} steps", steps.len());

    let outcome = Executor::new(workspace).run(RebranchSession::new(original.as_str(), steps))?;
    if outcome == RunOutcome::Completed {
        git.checkout(&original)?;
    }
    Ok(outcome)
}

/// Parses the branch tree without touching the repository.
pub fn dry_run(config_path: &Path) -> Result<Forest> {
    let forest = config::from_file(config_path)?;
    for step in plan::rebase_plan(&forest) {
        debug!("would {}", step);
    }
    Ok(forest)
}
