//! # Run Command Implementation
//!
//! Starts a new rebranch, or with `--dry-run` prints the branch tree that
//! would be rebased.
//!
//! A dry run with an explicit `--config` works outside a repository; it
//! only reads the file.

use std::io::Write;

use anyhow::Result;
use log::debug;

use git_rebranch::executor::Workspace;
use git_rebranch::rebranch;

use super::{finish, CommandContext};
use crate::cli::GlobalArgs;

/// Execute the default `run` action.
pub fn execute(global: &GlobalArgs) -> Result<()> {
    if global.dry_run {
        return dry_run(global);
    }

    let ctx = CommandContext::open(global)?;
    let config_path = ctx.config_path(global);
    debug!("using branch tree {}", config_path.display());

    let workspace = Workspace::new(&ctx.repo, &ctx.store, &ctx.reporter);
    finish(rebranch::start(&workspace, &config_path)?)
}

fn dry_run(global: &GlobalArgs) -> Result<()> {
    let config_path = match &global.config {
        Some(path) => path.clone(),
        None => CommandContext::open(global)?.config_path(global),
    };

    let forest = rebranch::dry_run(&config_path)?;
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", forest)?;
    stdout.flush()?;
    Ok(())
}
