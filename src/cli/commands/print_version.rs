//! print-version command - Print the version string and nothing else

use crate::cli::Context;
use anyhow::{Context as _, Result};

/// Print the version of the repository containing `ctx.cwd`.
pub fn print_version(ctx: &Context) -> Result<()> {
    let version = ctx
        .resolver
        .resolve_version(&ctx.cwd, ctx.prefix.as_deref())
        .context("failed to resolve version")?;

    println!("{}", version);
    Ok(())
}
