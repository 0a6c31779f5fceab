//! version
//!
//! Public entry points: directory (+ optional prefix) in, version out.
//!
//! # Flow
//!
//! 1. Validate the prefix (before touching the repository)
//! 2. Open the repository containing the directory
//! 3. Look up the (worktree root, prefix) key in the [`ResolutionCache`]
//! 4. On a miss: describe HEAD, read branch and cleanliness, format
//!
//! # Example
//!
//! ```no_run
//! use gitversion::version::VersionResolver;
//! use std::path::Path;
//!
//! let resolver = VersionResolver::new();
//! let version = resolver.resolve_version(Path::new("."), None).unwrap();
//! println!("{}", version);
//!
//! let details = resolver
//!     .resolve_version_details(Path::new("."), Some("my-product@"))
//!     .unwrap();
//! println!("{} ({} commits past {:?})", details.version, details.commit_distance, details.last_tag);
//! ```

mod cache;
mod details;
mod prefix;

pub use cache::{CacheKey, ResolutionCache};
pub use details::{
    parse_description, ParsedDescription, VersionDetails, VersionFormatter, DIRTY_SUFFIX,
    UNSPECIFIED_VERSION,
};
pub use prefix::{Prefix, PREFIX_PATTERN};

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, debug_span};

use crate::describe::DescribeEngine;
use crate::git::{Git, GitError, RepositoryQuery};

/// Errors from version resolution.
#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Specified prefix `{prefix}` does not match the allowed format regex `{pattern}`.")]
    InvalidPrefix {
        prefix: String,
        pattern: &'static str,
    },

    #[error("cannot get commit distance for description: '{description}'")]
    MalformedDescription { description: String },

    #[error(transparent)]
    Git(#[from] GitError),
}

/// Resolve fresh version details from any repository query.
///
/// No caching; reads HEAD, tags, branch, and status once each.
pub fn resolve_details<R: RepositoryQuery + ?Sized>(
    repo: &R,
    prefix: &Prefix,
) -> Result<VersionDetails, VersionError> {
    let started = Instant::now();

    let description = DescribeEngine::new(repo).describe(prefix.as_str())?;
    // An unborn HEAD has nothing to compare the working tree against.
    let is_clean = match description {
        Some(_) => repo.is_clean()?,
        None => false,
    };
    let branch = repo.current_branch()?;

    let details =
        VersionFormatter::new(prefix.clone()).format(description.as_ref(), is_clean, &branch)?;
    debug!(
        version = %details.version,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "resolved version"
    );
    Ok(details)
}

/// Resolves versions for directories, memoizing per worktree and prefix.
///
/// Cheap to clone; clones share one cache.
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    cache: Arc<ResolutionCache>,
}

impl VersionResolver {
    /// Create a resolver with its own empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver backed by an existing cache.
    pub fn with_cache(cache: Arc<ResolutionCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// The version string for the repository containing `dir`.
    ///
    /// # Errors
    ///
    /// See [`VersionResolver::resolve_version_details`].
    pub fn resolve_version(&self, dir: &Path, prefix: Option<&str>) -> Result<String, VersionError> {
        Ok(self.resolve_version_details(dir, prefix)?.version.clone())
    }

    /// Full version details for the repository containing `dir`.
    ///
    /// The first call per (worktree root, prefix) computes; later calls
    /// return the same value, even if the repository has changed since.
    ///
    /// # Errors
    ///
    /// - [`VersionError::InvalidPrefix`] if the prefix is malformed
    /// - [`VersionError::Git`] if `dir` is not inside a usable working tree
    ///   or a repository read fails
    /// - [`VersionError::MalformedDescription`] if a description cannot be
    ///   split into tag and distance
    pub fn resolve_version_details(
        &self,
        dir: &Path,
        prefix: Option<&str>,
    ) -> Result<Arc<VersionDetails>, VersionError> {
        let prefix = Prefix::new(prefix.unwrap_or_default())?;
        let _span = debug_span!("resolve", dir = %dir.display(), prefix = %prefix).entered();

        let git = Git::open(dir)?;
        let root = git
            .workdir()?
            .canonicalize()
            .map_err(|e| GitError::from_io(e, "canonicalize worktree root"))?;
        let key = CacheKey::new(root, prefix.as_str());

        self.cache.get(&key, || resolve_details(&git, &prefix))
    }
}
