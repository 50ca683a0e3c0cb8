//! Command-line definitions.
//!
//! Lives in the library so `xtask` can render the man page from the same
//! definitions the binary parses.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Version string: package version, build date and (dev builds) git sha.
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("OPLOGGER_BUILD_DATE"),
    ", ",
    env!("VERGEN_GIT_SHA"),
    ")"
);

/// Version string: package version and build date.
#[cfg(feature = "release")]
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("OPLOGGER_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(
    name = "oplogger",
    version = VERSION,
    about = "Terminal session logger for pentesters & bug bounty hunters",
    long_about = "Captures a shell (or every pane of a tmux session) byte-for-byte and \
                  turns the raw logs into a Markdown transcript and a commands-only digest.",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start logging the current terminal, or all panes when inside tmux
    Start,

    /// Stop logging and generate the Markdown report
    Stop,

    /// Show the active session
    Status,

    /// Re-generate the Markdown report from existing raw logs
    Parse {
        /// Log directory (default: ./oplogs, or capture.logs_dir from config)
        dir: Option<PathBuf>,

        /// Write the full transcript here instead of <DIR>/session_log.md
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Open the configuration file in $EDITOR
    Edit,
    /// Print the highlighted-tools list and where it lives
    Tools,
}
