//! # Completions Command Implementation
//!
//! Prints a shell completion script for `git-rebranch` to stdout, generated
//! from the `clap` definition so it always matches the real flags.
//!
//! ```bash
//! git-rebranch completions bash > ~/.local/share/bash-completion/completions/git-rebranch
//! git-rebranch completions zsh > ~/.zfunc/_git-rebranch
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use crate::cli::Cli;

const BIN_NAME: &str = "git-rebranch";

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout())
}

fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, BIN_NAME, out);
    out.flush()?;
    Ok(())
}
