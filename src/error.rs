//! # Error Handling
//!
//! This module defines the centralized error type for the `git-rebranch`
//! library. It uses the `thiserror` library to create a single `Error` enum
//! that covers every failure mode of the rebranch engine, with messages that
//! can be shown to the user as-is.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Variants fall into four groups:
//!   - Configuration errors (`ConfigNotFound`, `MalformedLine`,
//!     `MalformedIndentation`, `InvalidNesting`, `DuplicateBranch`). These
//!     carry the offending line number and are always raised before any
//!     branch has been touched.
//!   - Precondition errors (`DirtyWorkingTree`, `SessionInProgress`,
//!     `NoSession`, `UnknownBranch`). Also raised before any mutation.
//!   - Collaborator errors (`GitCommand`, `RebaseInProgress`,
//!     `RebaseAbortFailed`). These carry git's raw diagnostic text.
//!   - Persistence errors (`CorruptSession`, `Io`, `Json`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! A rebase that stops on a conflict is *not* an error. The executor reports
//! it as `RunOutcome::Halted` so that the persisted session stays in place
//! for `--continue` or `--abort`.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for rebranch operations
#[derive(Error, Debug)]
pub enum Error {
    /// The rebranch configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// A non-blank line does not have the shape `<indent><branch-name>`.
    #[error("Malformed config line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },

    /// A line is indented by something other than a multiple of the indent
    /// unit established by the first indented line.
    #[error("Wrong indentation on line {line}: {indent} columns is not a multiple of {unit}")]
    MalformedIndentation {
        line: usize,
        indent: usize,
        unit: usize,
    },

    /// A line is nested more than one level below the previous line.
    #[error("Bad indentation on line {line}: depth {depth} has no parent branch")]
    InvalidNesting { line: usize, depth: usize },

    /// The same branch is declared twice in the configuration.
    #[error("Branch '{branch}' on line {line} is already declared on line {first_line}")]
    DuplicateBranch {
        branch: String,
        line: usize,
        first_line: usize,
    },

    /// Tracked files have uncommitted changes.
    #[error("Working copy is not clean")]
    DirtyWorkingTree,

    /// A previous rebranch was interrupted and has not been resolved.
    #[error("Rebranch is in progress. Use --continue or --abort")]
    SessionInProgress,

    /// `--continue` or `--abort` was requested without an interrupted rebranch.
    #[error("There is no rebranch in progress")]
    NoSession,

    /// The persisted session exists but cannot be read back.
    #[error("Rebranch state is corrupt: {message}")]
    CorruptSession { message: String },

    /// A branch named in the configuration does not resolve to a commit.
    #[error("Unknown branch '{branch}'")]
    UnknownBranch { branch: String },

    /// A git query or mutation failed.
    #[error("Git command failed: git {command}{}", if stderr.is_empty() { String::new() } else { format!("\n{}", stderr.trim_end()) })]
    GitCommand { command: String, stderr: String },

    /// A git rebase was already underway when a new rebase step started.
    #[error("Rebase in progress")]
    RebaseInProgress,

    /// `git rebase --abort` failed during a rebranch abort.
    #[error("Failed rebase --abort; resolve the repository state manually")]
    RebaseAbortFailed,

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
