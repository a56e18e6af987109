//! # git-rebranch
//!
//! Rebases a whole tree of dependent branches in one go. The tree is declared
//! in a plain-text file at the repository root (`.gitrebranch`), one branch
//! per line, with indentation marking which branch each one is built on:
//!
//! ```text
//! develop
//!     feature-a
//!         feature-a-sub
//!     feature-b
//! ```
//!
//! After `develop` moves, a rebranch replays `feature-a` and `feature-b` onto
//! it, then `feature-a-sub` onto the rebased `feature-a`.
//!
//! ## Quick Example
//!
//! ```
//! use git_rebranch::{config, plan};
//!
//! let forest = config::parse("develop\n    feature-a\n").unwrap();
//! let steps = plan::rebase_plan(&forest);
//!
//! assert_eq!(steps.len(), 2);
//! assert_eq!(steps[1].to_string(), "rebase feature-a onto develop");
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: Parses the indented branch tree into a
//!   `Forest` and renders it back for dry runs.
//! - **Planning (`plan`)**: Flattens the forest into an ordered list of
//!   `(parent, child)` rebase steps.
//! - **Session State (`state`)**: Persists what is needed to continue or undo
//!   an interrupted rebranch in the git directory.
//! - **Execution (`executor`, `rebranch`, `recovery`)**: Runs the plan,
//!   halts on conflicts, and continues or aborts afterwards.
//! - **Repository Access (`repository`, `git`)**: The `GitOperations` trait
//!   and its implementation over the `git` binary.
//!
//! ## Interruption
//!
//! A rebase conflict is not an error. The run stops with
//! `RunOutcome::Halted`, leaving git's own rebase and the saved session in
//! place, and the user either fixes the conflict and continues or aborts to
//! return every branch to where it started.

pub mod config;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod git;
pub mod output;
pub mod plan;
pub mod rebranch;
pub mod recovery;
pub mod repository;
pub mod state;

#[cfg(test)]
mod test_utils;
