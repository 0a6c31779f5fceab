//! gitversion - Derive a version string from git tags
//!
//! gitversion names the current state of a working tree the way
//! `git describe --tags --always --first-parent` would, scoped to tags that
//! start with an optional product prefix, and memoizes the answer per
//! working tree and prefix for the life of the process.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to version)
//! - [`version`] - Public entry points, formatting, prefix rules, memoization
//! - [`describe`] - Nearest-tag search over first-parent history
//! - [`git`] - Single interface for all Git access
//! - [`core`] - Strong types and configuration
//!
//! # Correctness Invariants
//!
//! 1. Repositories are only ever read, never written
//! 2. Each (working tree, prefix) is resolved at most once per resolver
//! 3. Every caller for a key observes the identical result
//!
//! # Example
//!
//! ```no_run
//! use gitversion::version::VersionResolver;
//! use std::path::Path;
//!
//! let resolver = VersionResolver::new();
//! println!("{}", resolver.resolve_version(Path::new("."), None).unwrap());
//! ```

pub mod cli;
pub mod core;
pub mod describe;
pub mod git;
pub mod version;
