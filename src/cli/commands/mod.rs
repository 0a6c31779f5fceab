//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves through the shared [`VersionResolver`](crate::version::VersionResolver)
//! 2. Formats and displays output on stdout
//!
//! Handlers never touch the repository directly.

mod details;
mod print_version;

pub use details::details;
pub use print_version::print_version;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::PrintVersion => print_version::print_version(ctx),
        Command::Details { json } => details::details(ctx, json),
    }
}
