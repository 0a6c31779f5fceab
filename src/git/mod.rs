//! git
//!
//! Single interface for all Git access.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All repository reads flow
//! through this interface. No other module should import `git2`.
//!
//! We use the `git2` crate exclusively (no shelling out to the git CLI).
//!
//! # Responsibilities
//!
//! - Repository discovery and opening
//! - HEAD, branch, and working tree status queries
//! - Tag enumeration, peeling, and tagger metadata
//! - First-parent ancestry primitives
//!
//! # Invariants
//!
//! - Read-only: no ref, object, index, or config writes
//! - No other module calls git2 directly
//! - All operations return strong types (Oid, TagRef)
//!
//! # Submodules
//!
//! - [`mock`]: In-memory [`RepositoryQuery`] for deterministic testing

mod interface;
pub mod mock;
mod query;

pub use interface::{Git, GitError, WorktreeStatus};
pub use query::{RepositoryQuery, TagRef};
