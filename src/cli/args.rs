//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--prefix <prefix>`: Only consider tags starting with this prefix
//! - `--debug`: Enable debug logging

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// gitversion - Derive a version string from git tags
#[derive(Parser, Debug)]
#[command(name = "gitversion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gitversion was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Only consider tags starting with this prefix (e.g. "my-product@")
    #[arg(long, global = true, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The command to run; `print-version` when none was given.
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::PrintVersion)
    }
}

/// Available commands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the version string (default)
    #[command(
        name = "print-version",
        long_about = "Print the version string.\n\n\
            The version is the nearest tag on the first-parent history of HEAD, \
            with the prefix and a leading 'v' removed. Commits past the tag are \
            appended as '-N-gHASH', and '.dirty' marks uncommitted changes."
    )]
    PrintVersion,

    /// Print every version detail
    #[command(
        after_help = "\
EXAMPLES:
    # Human readable
    gitversion details

    # For scripts
    gitversion --prefix my-product@ details --json"
    )]
    Details {
        /// Print a single JSON object instead of text
        #[arg(long)]
        json: bool,
    },
}
