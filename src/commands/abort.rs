//! # Abort Command Implementation
//!
//! `git rebranch --abort` stops an interrupted rebranch and moves every
//! branch it already rebased back to its original revision.

use anyhow::Result;

use git_rebranch::executor::Workspace;
use git_rebranch::output::Reporter;
use git_rebranch::recovery;

use super::CommandContext;
use crate::cli::GlobalArgs;

/// Execute `--abort`.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = CommandContext::open(global)?;
    let workspace = Workspace::new(&ctx.repo, &ctx.store, &ctx.reporter);
    recovery::abort(&workspace)?;
    ctx.reporter.info("Rebranch aborted");
    Ok(())
}
