//! Default values for git-rebranch.
//!
//! This module provides centralized file names and locations used across
//! commands, ensuring consistency and avoiding duplication.

use std::path::{Path, PathBuf};

/// Name of the branch tree configuration file at the repository root.
pub const CONFIG_FILE_NAME: &str = ".gitrebranch";

/// Name of the session file kept inside the git directory while a rebranch
/// is interrupted.
pub const STATE_FILE_NAME: &str = "REBRANCH_STATE";

/// Environment variable that overrides the configuration file location.
pub const CONFIG_ENV_VAR: &str = "GIT_REBRANCH_CONFIG";

/// Returns the default configuration path for a repository rooted at `root`.
///
/// This can be overridden by the `--config` CLI flag or the
/// `GIT_REBRANCH_CONFIG` environment variable.
pub fn default_config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Returns the session file path inside `git_dir`.
pub fn state_file_path(git_dir: &Path) -> PathBuf {
    git_dir.join(STATE_FILE_NAME)
}
