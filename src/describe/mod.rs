//! describe
//!
//! Names HEAD by its nearest first-parent tag, the way
//! `git describe --tags --always --first-parent --abbrev=7 --match=<prefix>*`
//! does.
//!
//! # Algorithm
//!
//! 1. Resolve HEAD. An unborn HEAD yields no description at all.
//! 2. Collect candidate tags (name starts with the prefix), grouped by the
//!    commit they peel to.
//! 3. Walk first parents from HEAD until a commit carrying a candidate is
//!    reached or the walk runs out of parents.
//! 4. Several candidates on one commit are tie-broken: annotated over
//!    lightweight, then latest tagger time, then smallest name.
//!
//! When nothing is reached the result is the "always" fallback: no tag, and
//! the abbreviated HEAD hash stands in for the description.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use gitversion::describe::DescribeEngine;
//! use gitversion::git::mock::MockRepo;
//!
//! let repo = MockRepo::new();
//! let root = repo.commit_head();
//! repo.annotated_tag("1.0.0", &root, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
//! let tip = repo.commit_head();
//!
//! let result = DescribeEngine::new(&repo).describe("").unwrap().unwrap();
//! assert_eq!(result.tag.as_deref(), Some("1.0.0"));
//! assert_eq!(result.distance, 1);
//! assert_eq!(result.description(), format!("1.0.0-1-g{}", tip.short(7)));
//! ```

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::core::types::{Oid, DESCRIBE_ABBREV_LEN};
use crate::git::{GitError, RepositoryQuery, TagRef};

/// A candidate tag, resolved against the commit it sits on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Short tag name
    pub name: String,
    /// Direct target of the tag ref
    pub target: Oid,
    /// Commit the tag peels to
    pub peeled: Oid,
    /// Whether the tag is a tag object rather than a bare pointer
    pub annotated: bool,
    /// Tagger time; only ever present for annotated tags
    pub tagger_time: Option<DateTime<Utc>>,
}

impl Tag {
    /// Preference order among tags on the same commit. Greater wins.
    fn preference(&self) -> (bool, Option<DateTime<Utc>>, Reverse<&str>) {
        (self.annotated, self.tagger_time, Reverse(self.name.as_str()))
    }
}

/// Pick the preferred tag among tags on one commit.
///
/// Annotated tags beat lightweight ones; among annotated tags the latest
/// tagger time wins; remaining ties go to the lexicographically smallest
/// name.
pub fn select_tag(tags: &[Tag]) -> Option<&Tag> {
    tags.iter().max_by(|a, b| a.preference().cmp(&b.preference()))
}

/// Raw outcome of describing HEAD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeResult {
    /// Nearest tag on the first-parent chain; `None` in the fallback case
    pub tag: Option<String>,
    /// Commits walked past the tag (or to the end of the walk)
    pub distance: u32,
    /// HEAD abbreviated to [`DESCRIBE_ABBREV_LEN`] characters
    pub short_hash: String,
    /// Full id of HEAD
    pub head: Oid,
}

impl DescribeResult {
    /// True when no tag was found and the abbreviated hash is the
    /// description.
    pub fn is_fallback(&self) -> bool {
        self.tag.is_none()
    }

    /// The describe string: `tag`, `tag-N-gHASH`, or the bare hash.
    pub fn description(&self) -> String {
        match &self.tag {
            Some(tag) if self.distance == 0 => tag.clone(),
            Some(tag) => format!("{}-{}-g{}", tag, self.distance, self.short_hash),
            None => self.short_hash.clone(),
        }
    }
}

impl std::fmt::Display for DescribeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Describes HEAD of a repository.
///
/// Stateless apart from the borrowed repository; performs no retries and
/// passes repository failures through unchanged.
pub struct DescribeEngine<'a, R: RepositoryQuery + ?Sized> {
    repo: &'a R,
}

impl<'a, R: RepositoryQuery + ?Sized> DescribeEngine<'a, R> {
    /// Create an engine over a repository.
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// Describe HEAD against tags starting with `prefix`.
    ///
    /// Returns `Ok(None)` only when the repository has no commits.
    pub fn describe(&self, prefix: &str) -> Result<Option<DescribeResult>, GitError> {
        let Some(head) = self.repo.current_head_full_hash()? else {
            return Ok(None);
        };
        let short_hash = head.short(DESCRIBE_ABBREV_LEN).to_string();

        let mut candidates = self.candidates(prefix)?;
        debug!(
            prefix,
            tagged_commits = candidates.len(),
            "collected candidate tags"
        );

        let mut commit = head.clone();
        let mut distance: u32 = 0;
        loop {
            if let Some(refs) = candidates.remove(&commit) {
                let tag = self.select(&commit, refs)?;
                debug!(tag = %tag.name, distance, "found nearest tag");
                return Ok(Some(DescribeResult {
                    tag: Some(tag.name),
                    distance,
                    short_hash,
                    head,
                }));
            }

            let parents = self.repo.parents_of(&commit)?;
            match parents.into_iter().next() {
                Some(first) => {
                    trace!(from = %commit, to = %first, "following first parent");
                    commit = first;
                    distance += 1;
                }
                None => break,
            }
        }

        debug!(distance, "no matching tag on first-parent chain");
        Ok(Some(DescribeResult {
            tag: None,
            distance,
            short_hash,
            head,
        }))
    }

    /// Candidate tag refs grouped by the commit they peel to.
    ///
    /// Each group keeps the name order of `list_tags`.
    fn candidates(&self, prefix: &str) -> Result<HashMap<Oid, Vec<(TagRef, Oid)>>, GitError> {
        let mut by_commit: HashMap<Oid, Vec<(TagRef, Oid)>> = HashMap::new();
        for tag in self.repo.list_tags(prefix)? {
            match self.repo.peel_tag(&tag)? {
                Some(peeled) => by_commit
                    .entry(peeled.clone())
                    .or_default()
                    .push((tag, peeled)),
                None => debug!(tag = %tag.name, "ignoring tag that does not point at a commit"),
            }
        }
        Ok(by_commit)
    }

    /// Resolve the tags on `commit` and apply the tie-break.
    fn select(&self, commit: &Oid, refs: Vec<(TagRef, Oid)>) -> Result<Tag, GitError> {
        let mut tags = Vec::with_capacity(refs.len());
        for (tag_ref, peeled) in refs {
            let annotated = tag_ref.target != peeled;
            let tagger_time = if annotated {
                self.repo.tagger_timestamp(&tag_ref)?
            } else {
                None
            };
            tags.push(Tag {
                name: tag_ref.name,
                target: tag_ref.target,
                peeled,
                annotated,
                tagger_time,
            });
        }

        if tags.len() > 1 {
            trace!(commit = %commit, count = tags.len(), "tie-breaking tags on one commit");
        }

        select_tag(&tags)
            .cloned()
            .ok_or_else(|| GitError::OperationFailed {
                operation: format!("select tag on {}", commit),
                code: None,
                message: "no tags on commit".to_string(),
            })
    }
}
