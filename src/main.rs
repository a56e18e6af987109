//! # git-rebranch CLI
//!
//! This is the binary entry point for the `git-rebranch` command-line tool.
//! Installed on the `PATH`, git also runs it as `git rebranch`.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Turning library errors and interrupted runs into a non-zero exit status.
//!
//! The rebase engine itself lives in the `git_rebranch` library crate, so the
//! binary stays a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
