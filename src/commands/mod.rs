//! # CLI Command Implementations
//!
//! This module contains the implementation for each action of the
//! `git-rebranch` command-line tool: starting a rebranch (`run`, also the
//! default), `--continue`, `--abort` and `completions`.
//!
//! ## Structure
//!
//! Each command module exposes an `execute` function that takes the parsed
//! arguments and calls into the `git_rebranch` library. The helpers below
//! open the repository the current directory belongs to and wire up the
//! console reporter, so every command sees the same workspace.

pub mod abort;
pub mod completions;
pub mod resume;
pub mod run;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use git_rebranch::defaults;
use git_rebranch::executor::RunOutcome;
use git_rebranch::output::{ConsoleReporter, OutputConfig};
use git_rebranch::repository::{DefaultGitOperations, GitOperations};
use git_rebranch::state::SessionStore;

use crate::cli::GlobalArgs;

/// The repository, session file and reporter a command works with.
pub struct CommandContext {
    pub repo: DefaultGitOperations,
    pub store: SessionStore,
    pub reporter: ConsoleReporter,
}

impl CommandContext {
    /// Opens the repository containing the current directory.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to read current directory")?;
        let repo = DefaultGitOperations::discover(&cwd)
            .context("Not inside a git working tree")?;
        let store = SessionStore::in_git_dir(repo.git_dir());
        let reporter = ConsoleReporter::new(OutputConfig::from_env_and_flag(&global.color));
        Ok(Self {
            repo,
            store,
            reporter,
        })
    }

    /// The branch tree file: `--config` if given, else the repository default.
    pub fn config_path(&self, global: &GlobalArgs) -> PathBuf {
        global
            .config
            .clone()
            .unwrap_or_else(|| defaults::default_config_path(self.repo.root_dir()))
    }
}

/// Converts a halted run into an error so the process exits non-zero.
pub fn finish(outcome: RunOutcome) -> Result<()> {
    match outcome {
        RunOutcome::Completed => Ok(()),
        RunOutcome::Halted { parent, child } => {
            anyhow::bail!("Rebase of {} onto {} stopped with conflicts", child, parent)
        }
    }
}
