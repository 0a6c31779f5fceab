//! cli
//!
//! Command-line interface layer for gitversion.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and install logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It settles the prefix (flag, then repo config,
//! then global config) and hands it to [`crate::version::VersionResolver`],
//! which never reads configuration itself.

pub mod args;
pub mod commands;
pub mod logging;

pub use args::{Cli, Command};

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::git::Git;
use crate::version::{Prefix, VersionResolver};

/// Settings shared by all command handlers.
#[derive(Debug, Clone)]
pub struct Context {
    /// Directory to resolve the version for
    pub cwd: PathBuf,
    /// Effective tag prefix after precedence is applied
    pub prefix: Option<String>,
    pub resolver: VersionResolver,
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let cwd = match &cli.cwd {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to determine current directory")?,
    };

    // A bad flag fails before the repository is touched.
    if let Some(prefix) = &cli.prefix {
        Prefix::new(prefix.as_str())?;
    }

    // Outside a repository there is no repo config; the resolver reports
    // the missing repository itself.
    let repo_root = Git::open(&cwd)
        .ok()
        .and_then(|git| git.workdir().ok().map(Path::to_path_buf));

    let loaded = Config::load(repo_root.as_deref()).context("failed to load configuration")?;
    logging::init(cli.debug, loaded.config.log());

    for warning in &loaded.warnings {
        warn!(path = %warning.path.display(), "{}", warning.message);
    }
    if let Some(path) = loaded.config.global_config_loaded_from() {
        debug!(path = %path.display(), "loaded global config");
    }
    if let Some(path) = loaded.config.repo_config_loaded_from() {
        debug!(path = %path.display(), "loaded repo config");
    }

    let ctx = Context {
        cwd,
        prefix: effective_prefix(cli.prefix.as_deref(), loaded.config.prefix()),
        resolver: VersionResolver::new(),
    };

    commands::dispatch(cli.command_or_default(), &ctx)
}

/// Apply prefix precedence: an explicit flag, even an empty one, beats
/// config.
fn effective_prefix(flag: Option<&str>, configured: Option<&str>) -> Option<String> {
    flag.or(configured).map(str::to_string)
}
