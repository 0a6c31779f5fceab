//! git::query
//!
//! The read-only repository facts the describe engine is built on.
//!
//! [`RepositoryQuery`] is the seam between the version algorithm and the
//! repository-access strategy. [`crate::git::Git`] implements it over
//! libgit2; tests implement it over an in-memory commit graph.

use chrono::{DateTime, Utc};

use super::GitError;
use crate::core::types::Oid;

/// A tag reference as stored in the repository, uninterpreted.
///
/// `target` is whatever the ref points at directly: the commit itself for a
/// lightweight tag, or the tag object for an annotated tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagRef {
    /// Short tag name (without `refs/tags/`)
    pub name: String,
    /// Direct target of the ref
    pub target: Oid,
}

/// Primitive, read-only facts about a repository.
///
/// Implementations must not mutate tracked state, configuration, or HEAD.
pub trait RepositoryQuery {
    /// Short name of the checked-out branch, or `""` when HEAD is detached
    /// or unborn.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Full id of the commit at HEAD.
    ///
    /// Returns `Ok(None)` exactly when HEAD is unborn (no commits yet).
    fn current_head_full_hash(&self) -> Result<Option<Oid>, GitError>;

    /// Whether the working tree has no staged, unstaged, or untracked
    /// (non-ignored) changes.
    fn is_clean(&self) -> Result<bool, GitError>;

    /// Tags whose short name starts with `prefix` (literal match), sorted by
    /// name.
    fn list_tags(&self, prefix: &str) -> Result<Vec<TagRef>, GitError>;

    /// The commit a tag ultimately points at.
    ///
    /// Returns `Ok(None)` if the tag peels to something other than a commit.
    fn peel_tag(&self, tag: &TagRef) -> Result<Option<Oid>, GitError>;

    /// Parent ids of a commit, first parent first.
    fn parents_of(&self, commit: &Oid) -> Result<Vec<Oid>, GitError>;

    /// Tagger timestamp of an annotated tag; `None` for lightweight tags or
    /// tag objects without a tagger.
    fn tagger_timestamp(&self, tag: &TagRef) -> Result<Option<DateTime<Utc>>, GitError>;
}
