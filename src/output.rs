//! # Output and Reporting
//!
//! User-facing messages from the rebranch engine go through the `Reporter`
//! trait instead of being printed directly, so the engine can be driven and
//! inspected in tests without capturing the process's streams.
//!
//! ## Respecting User Preferences
//!
//! Colour follows the `--color` flag and the usual environment variables:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust
//! use git_rebranch::output::{ConsoleReporter, OutputConfig, Reporter};
//!
//! let reporter = ConsoleReporter::new(OutputConfig::from_env_and_flag("never"));
//! reporter.info("Rebasing feature onto develop");
//! ```

use std::env;
use std::io::Write;

use console::{style, Term};

/// Output configuration for controlling colors.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        Term::stdout().features().colors_supported()
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Sink for messages shown to the user while rebranching.
pub trait Reporter {
    /// Progress and success messages.
    fn info(&self, message: &str);

    /// Failures and instructions for recovering from them.
    fn error(&self, message: &str);

    /// Raw output of a failed git command, passed through unchanged.
    fn diagnostics(&self, text: &str) {
        if !text.trim().is_empty() {
            self.error(text.trim_end());
        }
    }
}

/// Writes info messages to stdout in green and errors to stderr in red.
#[derive(Debug, Clone)]
pub struct ConsoleReporter {
    config: OutputConfig,
}

impl ConsoleReporter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        let line = if self.config.use_color {
            style(message).green().force_styling(true).to_string()
        } else {
            message.to_string()
        };
        let _ = writeln!(std::io::stdout(), "{}", line);
    }

    fn error(&self, message: &str) {
        let line = if self.config.use_color {
            style(message).red().force_styling(true).to_string()
        } else {
            message.to_string()
        };
        let _ = writeln!(std::io::stderr(), "{}", line);
    }

    fn diagnostics(&self, text: &str) {
        if !text.trim().is_empty() {
            let _ = writeln!(std::io::stderr(), "{}", text.trim_end());
        }
    }
}
