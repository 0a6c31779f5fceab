//! version::prefix
//!
//! Validated tag prefixes.
//!
//! A prefix scopes version resolution to one product in a repository that
//! tags several (`my-product@1.2.0`, `other/3.0.0`). It is either empty or a
//! run of alphabetic tokens each terminated by `-`, `/`, or `@`, optionally
//! led by a single `/` or `@`.
//!
//! # Example
//!
//! ```
//! use gitversion::version::Prefix;
//!
//! let prefix = Prefix::new("my-product@").unwrap();
//! assert_eq!(prefix.strip("my-product@v1.2.0"), "1.2.0");
//!
//! assert!(Prefix::new("v").is_err());
//! assert!(Prefix::new("1.0@").is_err());
//! ```

use std::sync::OnceLock;

use regex::Regex;

use super::VersionError;

/// The accepted prefix grammar.
pub const PREFIX_PATTERN: &str = "|([/@]?([A-Za-z]+[/@-])+)";

fn prefix_regex() -> &'static Regex {
    static PREFIX_RE: OnceLock<Regex> = OnceLock::new();
    PREFIX_RE.get_or_init(|| {
        Regex::new(&format!("^(?:{})$", PREFIX_PATTERN)).expect("prefix regex should compile")
    })
}

/// A tag prefix that has passed grammar validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Prefix(String);

impl Prefix {
    /// Validate and wrap a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`VersionError::InvalidPrefix`] if `prefix` does not match
    /// [`PREFIX_PATTERN`].
    pub fn new(prefix: impl Into<String>) -> Result<Self, VersionError> {
        let prefix = prefix.into();
        if !prefix_regex().is_match(&prefix) {
            return Err(VersionError::InvalidPrefix {
                prefix,
                pattern: PREFIX_PATTERN,
            });
        }
        Ok(Self(prefix))
    }

    /// Get the prefix as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty prefix.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove the prefix, then one optional `v`, from the start of a tag
    /// name.
    ///
    /// Only an anchored match is stripped, and only once. A tag that does
    /// not start with the prefix is returned unchanged.
    pub fn strip<'t>(&self, tag: &'t str) -> &'t str {
        match tag.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.strip_prefix('v').unwrap_or(rest),
            None => tag,
        }
    }
}

impl TryFrom<&str> for Prefix {
    type Error = VersionError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for Prefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
