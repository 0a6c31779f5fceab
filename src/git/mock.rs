//! git::mock
//!
//! In-memory repository for deterministic testing.
//!
//! # Design
//!
//! `MockRepo` implements [`RepositoryQuery`] over a hand-built commit graph.
//! Tagger timestamps are explicit inputs, so tie-breaks between annotated
//! tags never depend on wall-clock ordering. Failures can be injected per
//! operation to exercise error propagation.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use gitversion::git::mock::MockRepo;
//! use gitversion::git::RepositoryQuery;
//!
//! let repo = MockRepo::new();
//! let root = repo.commit_head();
//! repo.annotated_tag("1.0.0", &root, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
//! let tip = repo.commit_head();
//!
//! assert_eq!(repo.current_head_full_hash().unwrap(), Some(tip.clone()));
//! assert_eq!(repo.parents_of(&tip).unwrap(), vec![root]);
//! assert_eq!(repo.list_tags("").unwrap().len(), 1);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use super::query::{RepositoryQuery, TagRef};
use super::GitError;
use crate::core::types::Oid;

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    CurrentBranch,
    HeadHash,
    IsClean,
    ListTags,
    PeelTag,
    ParentsOf,
    TaggerTimestamp,
}

impl MockOp {
    fn name(self) -> &'static str {
        match self {
            MockOp::CurrentBranch => "current branch",
            MockOp::HeadHash => "resolve HEAD",
            MockOp::IsClean => "status",
            MockOp::ListTags => "list tags",
            MockOp::PeelTag => "peel tag",
            MockOp::ParentsOf => "read commit",
            MockOp::TaggerTimestamp => "read tag",
        }
    }
}

/// Mock repository for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockRepo {
    inner: Arc<Mutex<MockRepoInner>>,
}

#[derive(Debug)]
struct MockRepoInner {
    /// Parents of each commit, first parent first.
    commits: HashMap<Oid, Vec<Oid>>,
    /// Tag name -> tag data.
    tags: BTreeMap<String, MockTag>,
    /// Tag objects (annotated tags) -> tagger time.
    tag_objects: HashMap<Oid, (Oid, Option<DateTime<Utc>>)>,
    head: Option<Oid>,
    branch: String,
    clean: bool,
    next_id: u64,
    failures: HashMap<MockOp, i32>,
    calls: usize,
}

#[derive(Debug, Clone)]
struct MockTag {
    target: Oid,
}

impl Default for MockRepoInner {
    fn default() -> Self {
        Self {
            commits: HashMap::new(),
            tags: BTreeMap::new(),
            tag_objects: HashMap::new(),
            head: None,
            branch: "main".to_string(),
            clean: true,
            next_id: 0,
            failures: HashMap::new(),
            calls: 0,
        }
    }
}

impl MockRepoInner {
    fn fresh_id(&mut self) -> Oid {
        self.next_id += 1;
        let mixed = u128::from(self.next_id).wrapping_mul(0x9e37_79b9_7f4a_7c15_f39c_c060_5ced_c835);
        Oid::new(format!("{:032x}{:08x}", mixed, self.next_id))
            .expect("mock ids are always 40 hex characters")
    }

    fn enter(&mut self, op: MockOp) -> Result<(), GitError> {
        self.calls += 1;
        match self.failures.get(&op) {
            Some(code) => Err(GitError::OperationFailed {
                operation: op.name().to_string(),
                code: Some(*code),
                message: "injected failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl MockRepo {
    /// Create an empty repository: unborn HEAD on `main`, clean tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a commit with the given parents without moving HEAD.
    pub fn commit(&self, parents: &[Oid]) -> Oid {
        let mut inner = self.inner.lock();
        let id = inner.fresh_id();
        inner.commits.insert(id.clone(), parents.to_vec());
        id
    }

    /// Create a commit whose only parent is the current HEAD, and move HEAD
    /// to it.
    pub fn commit_head(&self) -> Oid {
        let mut inner = self.inner.lock();
        let id = inner.fresh_id();
        let parents = inner.head.iter().cloned().collect();
        inner.commits.insert(id.clone(), parents);
        inner.head = Some(id.clone());
        id
    }

    /// Create a merge commit on HEAD with `other` as its second parent.
    pub fn merge_head(&self, other: &Oid) -> Oid {
        let mut inner = self.inner.lock();
        let id = inner.fresh_id();
        let mut parents: Vec<Oid> = inner.head.iter().cloned().collect();
        parents.push(other.clone());
        inner.commits.insert(id.clone(), parents);
        inner.head = Some(id.clone());
        id
    }

    /// Point HEAD at a commit, keeping the current branch name.
    pub fn set_head(&self, commit: &Oid) {
        self.inner.lock().head = Some(commit.clone());
    }

    /// Point HEAD directly at a commit (detached).
    pub fn checkout_detached(&self, commit: &Oid) {
        let mut inner = self.inner.lock();
        inner.head = Some(commit.clone());
        inner.branch.clear();
    }

    /// Set the branch name reported for HEAD.
    pub fn set_branch(&self, name: &str) {
        self.inner.lock().branch = name.to_string();
    }

    /// Set whether the working tree is clean.
    pub fn set_clean(&self, clean: bool) {
        self.inner.lock().clean = clean;
    }

    /// Add a lightweight tag pointing directly at `commit`.
    pub fn lightweight_tag(&self, name: &str, commit: &Oid) {
        self.inner.lock().tags.insert(
            name.to_string(),
            MockTag {
                target: commit.clone(),
            },
        );
    }

    /// Add an annotated tag on `commit` with an explicit tagger time.
    pub fn annotated_tag(&self, name: &str, commit: &Oid, tagged_at: DateTime<Utc>) {
        self.tag_object(name, commit, Some(tagged_at));
    }

    /// Add an annotated tag whose tag object has no tagger signature.
    pub fn annotated_tag_without_tagger(&self, name: &str, commit: &Oid) {
        self.tag_object(name, commit, None);
    }

    fn tag_object(&self, name: &str, commit: &Oid, tagged_at: Option<DateTime<Utc>>) {
        let mut inner = self.inner.lock();
        let object = inner.fresh_id();
        inner
            .tag_objects
            .insert(object.clone(), (commit.clone(), tagged_at));
        inner
            .tags
            .insert(name.to_string(), MockTag { target: object });
    }

    /// Add a tag that points at something other than a commit.
    pub fn non_commit_tag(&self, name: &str) {
        let mut inner = self.inner.lock();
        let blob = inner.fresh_id();
        inner.tags.insert(name.to_string(), MockTag { target: blob });
    }

    /// Make every subsequent call of `op` fail with the given status code.
    pub fn fail_on(&self, op: MockOp, code: i32) {
        self.inner.lock().failures.insert(op, code);
    }

    /// Total number of queries answered (or failed) so far.
    pub fn call_count(&self) -> usize {
        self.inner.lock().calls
    }
}

impl RepositoryQuery for MockRepo {
    fn current_branch(&self) -> Result<String, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::CurrentBranch)?;
        if inner.head.is_none() {
            return Ok(String::new());
        }
        Ok(inner.branch.clone())
    }

    fn current_head_full_hash(&self) -> Result<Option<Oid>, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::HeadHash)?;
        Ok(inner.head.clone())
    }

    fn is_clean(&self) -> Result<bool, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::IsClean)?;
        Ok(inner.clean)
    }

    fn list_tags(&self, prefix: &str) -> Result<Vec<TagRef>, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::ListTags)?;
        Ok(inner
            .tags
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, tag)| TagRef {
                name: name.clone(),
                target: tag.target.clone(),
            })
            .collect())
    }

    fn peel_tag(&self, tag: &TagRef) -> Result<Option<Oid>, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::PeelTag)?;
        if inner.commits.contains_key(&tag.target) {
            return Ok(Some(tag.target.clone()));
        }
        Ok(inner
            .tag_objects
            .get(&tag.target)
            .map(|(commit, _)| commit.clone()))
    }

    fn parents_of(&self, commit: &Oid) -> Result<Vec<Oid>, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::ParentsOf)?;
        inner
            .commits
            .get(commit)
            .cloned()
            .ok_or_else(|| GitError::OperationFailed {
                operation: MockOp::ParentsOf.name().to_string(),
                code: Some(-3),
                message: format!("commit {} not found", commit),
            })
    }

    fn tagger_timestamp(&self, tag: &TagRef) -> Result<Option<DateTime<Utc>>, GitError> {
        let mut inner = self.inner.lock();
        inner.enter(MockOp::TaggerTimestamp)?;
        Ok(inner
            .tag_objects
            .get(&tag.target)
            .and_then(|(_, tagged_at)| *tagged_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fresh_ids_are_distinct_and_spread() {
        let repo = MockRepo::new();
        let a = repo.commit(&[]);
        let b = repo.commit(&[]);
        assert_ne!(a, b);
        assert_ne!(a.short(7), b.short(7));
    }

    #[test]
    fn unborn_repo_has_no_head_and_no_branch() {
        let repo = MockRepo::new();
        assert_eq!(repo.current_head_full_hash().unwrap(), None);
        assert_eq!(repo.current_branch().unwrap(), "");
    }

    #[test]
    fn annotated_tag_peels_to_commit() {
        let repo = MockRepo::new();
        let c = repo.commit_head();
        repo.annotated_tag("v1", &c, Utc.timestamp_opt(10, 0).unwrap());
        let tags = repo.list_tags("").unwrap();
        assert_ne!(tags[0].target, c);
        assert_eq!(repo.peel_tag(&tags[0]).unwrap(), Some(c));
        assert_eq!(
            repo.tagger_timestamp(&tags[0]).unwrap(),
            Some(Utc.timestamp_opt(10, 0).unwrap())
        );
    }

    #[test]
    fn lightweight_tag_has_no_tagger() {
        let repo = MockRepo::new();
        let c = repo.commit_head();
        repo.lightweight_tag("v1", &c);
        let tags = repo.list_tags("v").unwrap();
        assert_eq!(tags[0].target, c);
        assert_eq!(repo.tagger_timestamp(&tags[0]).unwrap(), None);
    }

    #[test]
    fn list_tags_filters_by_literal_prefix() {
        let repo = MockRepo::new();
        let c = repo.commit_head();
        repo.lightweight_tag("my-product@1.0.0", &c);
        repo.lightweight_tag("1.0.0", &c);
        let names: Vec<_> = repo
            .list_tags("my-product@")
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["my-product@1.0.0"]);
    }

    #[test]
    fn injected_failure_carries_code() {
        let repo = MockRepo::new();
        repo.fail_on(MockOp::IsClean, 128);
        let err = repo.is_clean().unwrap_err();
        assert_eq!(err.code(), Some(128));
    }

    #[test]
    fn counts_calls() {
        let repo = MockRepo::new();
        assert_eq!(repo.call_count(), 0);
        let _ = repo.current_branch();
        let _ = repo.is_clean();
        assert_eq!(repo.call_count(), 2);
    }
}
