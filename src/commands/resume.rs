//! # Continue Command Implementation
//!
//! `git rebranch --continue` finishes the rebase that stopped on a conflict
//! and rebases the rest of the tree.

use anyhow::Result;

use git_rebranch::executor::Workspace;
use git_rebranch::recovery;

use super::{finish, CommandContext};
use crate::cli::GlobalArgs;

/// Execute `--continue`.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::open(global)?;
    let workspace = Workspace::new(&ctx.repo, &ctx.store, &ctx.reporter);
    finish(recovery::resume(&workspace)?)
}
