//! version::details
//!
//! Turns a raw describe result into the public version record.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::{Prefix, VersionError};
use crate::core::types::DISPLAY_ABBREV_LEN;
use crate::describe::DescribeResult;

/// Version reported for a repository without commits.
pub const UNSPECIFIED_VERSION: &str = "unspecified";

/// Suffix marking a version resolved from a dirty working tree.
pub const DIRTY_SUFFIX: &str = ".dirty";

fn description_regex() -> &'static Regex {
    static DESCRIPTION_RE: OnceLock<Regex> = OnceLock::new();
    DESCRIPTION_RE.get_or_init(|| {
        Regex::new(r"^(?P<tag>.*)-(?P<distance>[0-9]+)-g(?P<hash>[0-9a-fA-F]{3,})$")
            .expect("description regex should compile")
    })
}

/// Everything known about the version of a working tree.
///
/// Immutable once built; the resolver hands out shared references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetails {
    /// Version string, e.g. `1.0.0`, `1.0.0-1-gabc1234.dirty`
    pub version: String,
    /// Nearest tag with the prefix and one leading `v` removed
    pub last_tag: Option<String>,
    /// Commits between the tag and HEAD
    pub commit_distance: u32,
    /// HEAD abbreviated for display
    pub git_hash: String,
    /// Full HEAD id; empty when there are no commits
    pub git_hash_full: String,
    /// Checked-out branch; empty when detached
    pub branch_name: String,
    /// HEAD is exactly on a tag and the working tree is clean
    pub is_clean_tag: bool,
}

impl std::fmt::Display for VersionDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VersionDetails({}, {}, {}, {}, {})",
            self.version, self.git_hash, self.git_hash_full, self.branch_name, self.is_clean_tag
        )
    }
}

/// A describe string of the form `TAG-N-gHASH`, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescription {
    pub tag: String,
    pub distance: u32,
    pub hash: String,
}

/// Split a `TAG-N-gHASH` description.
///
/// The tag part is greedy, so tags that themselves contain `-N-g...`
/// sequences still split on the last one. It may be empty, as for a `v`
/// tag once the `v` is stripped.
///
/// # Errors
///
/// Returns [`VersionError::MalformedDescription`] when the string does not
/// have that shape or the distance does not fit in a `u32`.
pub fn parse_description(description: &str) -> Result<ParsedDescription, VersionError> {
    let malformed = || VersionError::MalformedDescription {
        description: description.to_string(),
    };

    let caps = description_regex().captures(description).ok_or_else(malformed)?;
    let distance = caps["distance"].parse::<u32>().map_err(|_| malformed())?;

    Ok(ParsedDescription {
        tag: caps["tag"].to_string(),
        distance,
        hash: caps["hash"].to_string(),
    })
}

/// Builds [`VersionDetails`] for one prefix.
#[derive(Debug, Clone, Default)]
pub struct VersionFormatter {
    prefix: Prefix,
}

impl VersionFormatter {
    pub fn new(prefix: Prefix) -> Self {
        Self { prefix }
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Format a describe result.
    ///
    /// `description` is `None` only for a repository without commits; the
    /// version is then [`UNSPECIFIED_VERSION`] and `is_clean` is ignored.
    ///
    /// In the hash-only fallback the version is the abbreviated hash, there
    /// is no last tag, and the distance is reported as 0.
    pub fn format(
        &self,
        description: Option<&DescribeResult>,
        is_clean: bool,
        branch_name: &str,
    ) -> Result<VersionDetails, VersionError> {
        let Some(result) = description else {
            return Ok(VersionDetails {
                version: UNSPECIFIED_VERSION.to_string(),
                last_tag: None,
                commit_distance: 0,
                git_hash: String::new(),
                git_hash_full: String::new(),
                branch_name: branch_name.to_string(),
                is_clean_tag: false,
            });
        };

        let (described, last_tag, commit_distance) = match &result.tag {
            None => (result.short_hash.clone(), None, 0),
            Some(_) => {
                let raw = result.description();
                let stripped = self.prefix.strip(&raw).to_string();
                if result.distance == 0 {
                    (stripped.clone(), Some(stripped), 0)
                } else {
                    let parsed = parse_description(&stripped)?;
                    (stripped, Some(parsed.tag), parsed.distance)
                }
            }
        };

        let version = if is_clean {
            described
        } else {
            format!("{}{}", described, DIRTY_SUFFIX)
        };
        let is_clean_tag = is_clean && commit_distance == 0 && last_tag.is_some();

        Ok(VersionDetails {
            version,
            last_tag,
            commit_distance,
            git_hash: result.head.short(DISPLAY_ABBREV_LEN).to_string(),
            git_hash_full: result.head.as_str().to_string(),
            branch_name: branch_name.to_string(),
            is_clean_tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Oid;

    const HEAD: &str = "abc1234def5678901234567890abcdef12345678";

    fn result(tag: Option<&str>, distance: u32) -> DescribeResult {
        let head = Oid::new(HEAD).unwrap();
        DescribeResult {
            tag: tag.map(str::to_string),
            distance,
            short_hash: head.short(7).to_string(),
            head,
        }
    }

    fn formatter(prefix: &str) -> VersionFormatter {
        VersionFormatter::new(Prefix::new(prefix).unwrap())
    }

    mod parse {
        use super::*;

        #[test]
        fn splits_on_last_distance() {
            let parsed = parse_description("1.0.0-rc-2-3-gabc1234").unwrap();
            assert_eq!(parsed.tag, "1.0.0-rc-2");
            assert_eq!(parsed.distance, 3);
            assert_eq!(parsed.hash, "abc1234");
        }

        #[test]
        fn rejects_plain_tag() {
            let err = parse_description("1.0.0").unwrap_err();
            assert!(matches!(err, VersionError::MalformedDescription { .. }));
        }

        #[test]
        fn empty_tag_part() {
            let parsed = parse_description("-1-gabc1234").unwrap();
            assert_eq!(parsed.tag, "");
            assert_eq!(parsed.distance, 1);
            assert_eq!(parsed.hash, "abc1234");
        }

        #[test]
        fn pattern_compiles() {
            assert!(description_regex().is_match("1.0.0-1-gabc"));
        }

        #[test]
        fn rejects_oversized_distance() {
            assert!(parse_description("1.0.0-99999999999-gabc1234").is_err());
        }
    }

    mod format {
        use super::*;

        #[test]
        fn clean_on_tag() {
            let details = formatter("")
                .format(Some(&result(Some("v1.0.0"), 0)), true, "main")
                .unwrap();
            assert_eq!(details.version, "1.0.0");
            assert_eq!(details.last_tag.as_deref(), Some("1.0.0"));
            assert_eq!(details.commit_distance, 0);
            assert_eq!(details.git_hash, "abc1234def");
            assert_eq!(details.git_hash_full, HEAD);
            assert_eq!(details.branch_name, "main");
            assert!(details.is_clean_tag);
        }

        #[test]
        fn dirty_on_tag_is_not_clean_tag() {
            let details = formatter("")
                .format(Some(&result(Some("1.0.0"), 0)), false, "main")
                .unwrap();
            assert_eq!(details.version, "1.0.0.dirty");
            assert!(!details.is_clean_tag);
        }

        #[test]
        fn past_tag() {
            let details = formatter("")
                .format(Some(&result(Some("1.0.0"), 1)), true, "main")
                .unwrap();
            assert_eq!(details.version, "1.0.0-1-gabc1234");
            assert_eq!(details.last_tag.as_deref(), Some("1.0.0"));
            assert_eq!(details.commit_distance, 1);
            assert!(!details.is_clean_tag);
        }

        #[test]
        fn strips_prefix_and_v() {
            let details = formatter("my-product@")
                .format(Some(&result(Some("my-product@v2.0.0"), 2)), false, "dev")
                .unwrap();
            assert_eq!(details.version, "2.0.0-2-gabc1234.dirty");
            assert_eq!(details.last_tag.as_deref(), Some("2.0.0"));
            assert_eq!(details.commit_distance, 2);
        }

        #[test]
        fn hash_fallback() {
            let details = formatter("").format(Some(&result(None, 5)), true, "").unwrap();
            assert_eq!(details.version, "abc1234");
            assert_eq!(details.last_tag, None);
            assert_eq!(details.commit_distance, 0);
            assert!(!details.is_clean_tag);

            let dirty = formatter("").format(Some(&result(None, 5)), false, "").unwrap();
            assert_eq!(dirty.version, "abc1234.dirty");
        }

        #[test]
        fn no_commits() {
            let details = formatter("").format(None, false, "main").unwrap();
            assert_eq!(details.version, UNSPECIFIED_VERSION);
            assert_eq!(details.git_hash, "");
            assert_eq!(details.git_hash_full, "");
            assert_eq!(details.branch_name, "main");
            assert!(!details.is_clean_tag);
        }

        #[test]
        fn tag_that_is_only_the_prefix() {
            let details = formatter("p@")
                .format(Some(&result(Some("p@v"), 0)), true, "main")
                .unwrap();
            assert_eq!(details.version, "");
            assert_eq!(details.last_tag.as_deref(), Some(""));
        }

        #[test]
        fn past_tag_that_is_only_v() {
            let details = formatter("")
                .format(Some(&result(Some("v"), 1)), true, "main")
                .unwrap();
            assert_eq!(details.version, "-1-gabc1234");
            assert_eq!(details.last_tag.as_deref(), Some(""));
            assert_eq!(details.commit_distance, 1);
            assert!(!details.is_clean_tag);
        }
    }

    mod render {
        use super::*;

        #[test]
        fn display() {
            let details = formatter("")
                .format(Some(&result(Some("1.0.0"), 0)), true, "main")
                .unwrap();
            assert_eq!(
                details.to_string(),
                format!("VersionDetails(1.0.0, abc1234def, {}, main, true)", HEAD)
            );
        }

        #[test]
        fn json_uses_camel_case() {
            let details = formatter("")
                .format(Some(&result(Some("1.0.0"), 1)), true, "main")
                .unwrap();
            let json = serde_json::to_value(&details).unwrap();
            assert_eq!(json["version"], "1.0.0-1-gabc1234");
            assert_eq!(json["lastTag"], "1.0.0");
            assert_eq!(json["commitDistance"], 1);
            assert_eq!(json["gitHash"], "abc1234def");
            assert_eq!(json["gitHashFull"], HEAD);
            assert_eq!(json["branchName"], "main");
            assert_eq!(json["isCleanTag"], false);
        }
    }
}
