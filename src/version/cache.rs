//! version::cache
//!
//! Memoizes resolved versions per (working tree root, prefix).
//!
//! # Concurrency
//!
//! Each key owns a slot with its own lock. The first caller for a key holds
//! the slot lock while computing; concurrent callers for the same key block
//! on it and then read the stored value, so the computation runs at most
//! once per key. Callers for different keys only contend on the short map
//! lookup.
//!
//! Failed computations store nothing. The error goes to the caller that
//! ran the computation and the next caller for that key computes afresh.
//!
//! Entries are never invalidated: a resolved key keeps its value for the
//! life of the cache even if the repository changes underneath it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use super::VersionDetails;

/// Identifies one resolution: canonical working tree root plus prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub root: PathBuf,
    pub prefix: String,
}

impl CacheKey {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.into(),
        }
    }
}

type Slot = Arc<Mutex<Option<Arc<VersionDetails>>>>;

/// Process-lifetime memo of resolved versions.
///
/// Constructed explicitly and shared by `Arc`; there is no global instance.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value stored for `key`, computing it with `compute` if
    /// no value is stored yet.
    pub fn get<E, F>(&self, key: &CacheKey, compute: F) -> Result<Arc<VersionDetails>, E>
    where
        F: FnOnce() -> Result<VersionDetails, E>,
    {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut stored = slot.lock();
        if let Some(details) = stored.as_ref() {
            trace!(root = %key.root.display(), prefix = %key.prefix, "cache hit");
            return Ok(Arc::clone(details));
        }

        trace!(root = %key.root.display(), prefix = %key.prefix, "cache miss");
        let details = Arc::new(compute()?);
        *stored = Some(Arc::clone(&details));
        Ok(details)
    }

    /// The stored value for `key`, without computing.
    pub fn peek(&self, key: &CacheKey) -> Option<Arc<VersionDetails>> {
        let slot = self.slots.lock().get(key).cloned()?;
        let stored = slot.lock();
        stored.clone()
    }

    /// Number of keys holding a value.
    ///
    /// Waits for any computation in progress.
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = self.slots.lock().values().cloned().collect();
        slots.iter().filter(|slot| slot.lock().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
