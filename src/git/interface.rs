//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to the repository. All reads
//! flow through this interface, which provides structured results and
//! normalizes errors into typed failure categories.
//!
//! # Architecture
//!
//! The `Git` struct is the only way to interact with a Git repository.
//! No other module should import `git2` directly. The interface is strictly
//! read-only: nothing here writes refs, objects, the index, or configuration.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::RepositoryNotFound`]: Not inside a Git repository
//! - [`GitError::DetachedWorktreeUnsupported`]: Inside a linked worktree
//! - [`GitError::BareRepo`]: Repository has no working tree
//! - [`GitError::OperationFailed`]: Any other libgit2 or I/O failure, with
//!   the underlying status code where one exists
//!
//! # Example
//!
//! ```ignore
//! use gitversion::git::{Git, RepositoryQuery};
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! if let Some(head) = git.current_head_full_hash()? {
//!     println!("HEAD is at {}", head.short(7));
//! }
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, trace};

use super::query::{RepositoryQuery, TagRef};
use crate::core::types::{Oid, TypeError};

const TAGS_NAMESPACE: &str = "refs/tags/";

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository metadata was found from the starting directory upward.
    #[error("not a git repository (or any of the parent directories): {path}")]
    RepositoryNotFound {
        /// The path that was searched from
        path: PathBuf,
    },

    /// The repository is a linked worktree without its own administrative
    /// directory.
    #[error("Cannot find git repository at {path}. Detached work trees are unsupported.")]
    DetachedWorktreeUnsupported {
        /// The worktree root that was discovered
        path: PathBuf,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository not supported: {path}")]
    BareRepo {
        /// The repository path
        path: PathBuf,
    },

    /// Any other failure while reading the repository.
    #[error("git {operation} failed: {message}")]
    OperationFailed {
        /// What was being attempted
        operation: String,
        /// libgit2 status code or OS error number, when available
        code: Option<i32>,
        /// The underlying error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error, keeping its raw status code.
    fn from_git2(err: git2::Error, operation: &str) -> Self {
        GitError::OperationFailed {
            operation: operation.to_string(),
            code: Some(err.raw_code()),
            message: err.message().to_string(),
        }
    }

    /// Create a GitError from an I/O error, keeping the OS error number.
    pub(crate) fn from_io(err: std::io::Error, operation: &str) -> Self {
        GitError::OperationFailed {
            operation: operation.to_string(),
            code: err.raw_os_error(),
            message: err.to_string(),
        }
    }

    /// The underlying status code, if this error carries one.
    pub fn code(&self) -> Option<i32> {
        match self {
            GitError::OperationFailed { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        GitError::OperationFailed {
            operation: "parse object id".to_string(),
            code: None,
            message: err.to_string(),
        }
    }
}

/// Summary of working tree status.
///
/// Ignored files never appear here; they are excluded from the status walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Number of staged changes
    pub staged: usize,
    /// Number of unstaged changes to tracked files
    pub unstaged: usize,
    /// Number of untracked, non-ignored files
    pub untracked: usize,
    /// Whether there are unresolved conflicts
    pub has_conflicts: bool,
}

impl WorktreeStatus {
    /// Check if the worktree is completely clean.
    ///
    /// Untracked files count as dirty; ignored files were never counted.
    pub fn is_clean(&self) -> bool {
        self.staged == 0 && self.unstaged == 0 && self.untracked == 0 && !self.has_conflicts
    }
}

/// The Git interface.
///
/// Opened read-only per repository root. A `Git` is cheap to open and is not
/// shared between threads; each resolving thread opens its own.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open a repository at the given path.
    ///
    /// Uses `git2::Repository::discover` to find the repository root,
    /// so `path` can be any directory within the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::RepositoryNotFound`] if no repository is found
    /// - [`GitError::DetachedWorktreeUnsupported`] for linked worktrees
    /// - [`GitError::BareRepo`] if the repository has no working directory
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                GitError::RepositoryNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                GitError::from_git2(e, "discover repository")
            }
        })?;

        if repo.is_bare() {
            return Err(GitError::BareRepo {
                path: repo.path().to_path_buf(),
            });
        }

        if repo.is_worktree() {
            return Err(GitError::DetachedWorktreeUnsupported {
                path: repo
                    .workdir()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| path.to_path_buf()),
            });
        }

        debug!(git_dir = %repo.path().display(), "opened repository");
        Ok(Self { repo })
    }

    /// Root of the working tree.
    pub fn workdir(&self) -> Result<&Path, GitError> {
        self.repo.workdir().ok_or_else(|| GitError::BareRepo {
            path: self.repo.path().to_path_buf(),
        })
    }

    /// Get direct access to the .git directory path.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Get working tree status summary.
    pub fn worktree_status(&self) -> Result<WorktreeStatus, GitError> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| GitError::from_git2(e, "status"))?;

        let mut result = WorktreeStatus::default();

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_conflicted() {
                result.has_conflicts = true;
            }

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                result.staged += 1;
            }

            if status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
            {
                result.unstaged += 1;
            }

            if status.is_wt_new() {
                result.untracked += 1;
            }
        }

        trace!(?result, "worktree status");
        Ok(result)
    }

    // =========================================================================
    // Object helpers
    // =========================================================================

    fn to_git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
        git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, "parse object id"))
    }

    fn from_git2_oid(oid: git2::Oid) -> Result<Oid, GitError> {
        Oid::new(oid.to_string()).map_err(GitError::from)
    }

    fn find_object(&self, oid: &Oid) -> Result<git2::Object<'_>, GitError> {
        let git_oid = Self::to_git2_oid(oid)?;
        self.repo
            .find_object(git_oid, None)
            .map_err(|e| GitError::from_git2(e, &format!("read object {}", oid)))
    }
}

impl RepositoryQuery for Git {
    fn current_branch(&self) -> Result<String, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => return Ok(String::new()),
            Err(e) => return Err(GitError::from_git2(e, "resolve HEAD")),
        };

        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }

        Ok(String::new()) // Detached HEAD
    }

    fn current_head_full_hash(&self) -> Result<Option<Oid>, GitError> {
        let head = match self.repo.head() {
            Ok(h) => h,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                debug!("HEAD is unborn, repository has no commits");
                return Ok(None);
            }
            Err(e) => return Err(GitError::from_git2(e, "resolve HEAD")),
        };

        let commit = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, "resolve HEAD"))?;

        Self::from_git2_oid(commit.id()).map(Some)
    }

    fn is_clean(&self) -> Result<bool, GitError> {
        Ok(self.worktree_status()?.is_clean())
    }

    fn list_tags(&self, prefix: &str) -> Result<Vec<TagRef>, GitError> {
        let refs = self
            .repo
            .references_glob(&format!("{}*", TAGS_NAMESPACE))
            .map_err(|e| GitError::from_git2(e, "list tags"))?;

        let mut tags = Vec::new();
        for reference in refs {
            let reference = reference.map_err(|e| GitError::from_git2(e, "list tags"))?;

            // Skip refs with non-UTF8 names
            let Some(full_name) = reference.name() else {
                continue;
            };
            let Some(name) = full_name.strip_prefix(TAGS_NAMESPACE) else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }

            let Some(target) = reference.target() else {
                trace!(tag = name, "skipping symbolic tag ref");
                continue;
            };

            tags.push(TagRef {
                name: name.to_string(),
                target: Self::from_git2_oid(target)?,
            });
        }

        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    fn peel_tag(&self, tag: &TagRef) -> Result<Option<Oid>, GitError> {
        let mut object = self.find_object(&tag.target)?;
        loop {
            match object.kind() {
                Some(git2::ObjectType::Commit) => return Self::from_git2_oid(object.id()).map(Some),
                Some(git2::ObjectType::Tag) => {
                    let next = match object.as_tag() {
                        Some(tag_object) => tag_object
                            .target()
                            .map_err(|e| GitError::from_git2(e, &format!("peel tag {}", tag.name)))?,
                        None => return Ok(None),
                    };
                    object = next;
                }
                _ => return Ok(None),
            }
        }
    }

    fn parents_of(&self, commit: &Oid) -> Result<Vec<Oid>, GitError> {
        let git_oid = Self::to_git2_oid(commit)?;
        let commit = self
            .repo
            .find_commit(git_oid)
            .map_err(|e| GitError::from_git2(e, &format!("read commit {}", commit)))?;

        commit.parent_ids().map(Self::from_git2_oid).collect()
    }

    fn tagger_timestamp(&self, tag: &TagRef) -> Result<Option<DateTime<Utc>>, GitError> {
        let object = self.find_object(&tag.target)?;
        let Some(tag_object) = object.as_tag() else {
            return Ok(None);
        };

        Ok(tag_object
            .tagger()
            .and_then(|sig| DateTime::from_timestamp(sig.when().seconds(), 0)))
    }
}
