//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};

use crate::commands;
use git_rebranch::defaults;

/// Rebase a tree of dependent branches onto their updated parents
#[derive(Parser, Debug)]
#[command(name = "git-rebranch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    command: Option<Commands>,

    /// Continue an interrupted rebranch after resolving conflicts
    #[arg(long = "continue", conflicts_with = "dry_run")]
    cont: bool,

    /// Abandon an interrupted rebranch and restore every branch
    #[arg(long, conflicts_with_all = ["cont", "dry_run"])]
    abort: bool,

    #[command(flatten)]
    global: GlobalArgs,
}

/// Options accepted before or after any subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Print the branch tree without rebasing anything
    #[arg(short = 'n', long, global = true)]
    pub dry_run: bool,

    /// Branch tree file (defaults to .gitrebranch at the repository root)
    #[arg(short, long, global = true, value_name = "FILE", env = defaults::CONFIG_ENV_VAR)]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rebase every branch in the tree onto its parent
    Run,

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        if (self.cont || self.abort) && self.command.is_some() {
            Cli::command()
                .error(
                    ErrorKind::ArgumentConflict,
                    "--continue and --abort cannot be combined with a subcommand",
                )
                .exit();
        }

        self.init_logging();

        if self.cont {
            return commands::resume::execute(&self.global);
        }
        if self.abort {
            return commands::abort::execute(&self.global);
        }

        match self.command {
            None | Some(Commands::Run) => commands::run::execute(&self.global),
            Some(Commands::Completions(args)) => commands::completions::execute(args),
        }
    }

    fn init_logging(&self) {
        let level = if self.global.verbose {
            "debug"
        } else {
            self.global.log_level.as_str()
        };
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .format_timestamp(None)
            .try_init();
    }
}
