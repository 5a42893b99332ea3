//! Publish-once validator cache.
//!
//! Entries map a [`CacheKey`] to a compiled [`Validator`] and are never
//! mutated or removed. Publishing is insert-if-absent under a shard write
//! lock: when two threads compile the same hint concurrently, the first to
//! publish wins and the other adopts the published validator, discarding its
//! own. Readers only ever see fully built validators, since a validator is
//! immutable before it is published.
//!
//! No lock is held while compiling; sessions look entries up and publish
//! them, nothing more.

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use vigil_types::HintId;

use crate::Validator;

/// Scope a relative forward reference resolves in.
///
/// Hints without forward references are context-free and always use
/// [`ScopeId::GLOBAL`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct ScopeId(u32);

impl ScopeId {
    pub(crate) const GLOBAL: Self = Self(0);

    pub(crate) const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

/// Identity of a cache entry.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub(crate) struct CacheKey {
    pub(crate) hint: HintId,
    pub(crate) scope: ScopeId,
}

/// Counters describing cache traffic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct CacheStats {
    /// Lookups answered by a published entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Hint nodes compiled.
    pub compiled: u64,
    /// Publishes that found an entry already present.
    pub races_lost: u64,
}

/// Number of shards.
const NUM_SHARDS: usize = 16;

/// Sharded map from hint identity to validator.
pub struct ValidatorCache {
    shards: [RwLock<FxHashMap<CacheKey, Validator>>; NUM_SHARDS],
    hits: AtomicU64,
    misses: AtomicU64,
    compiled: AtomicU64,
    races_lost: AtomicU64,
}

impl ValidatorCache {
    pub fn new() -> Self {
        ValidatorCache {
            shards: std::array::from_fn(|_| RwLock::new(FxHashMap::default())),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            compiled: AtomicU64::new(0),
            races_lost: AtomicU64::new(0),
        }
    }

    #[inline]
    fn shard(&self, key: &CacheKey) -> &RwLock<FxHashMap<CacheKey, Validator>> {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let idx = hasher.finish() as usize % NUM_SHARDS;
        &self.shards[idx]
    }

    /// Look up a published validator.
    pub(crate) fn get(&self, key: CacheKey) -> Option<Validator> {
        let found = self.shard(&key).read().get(&key).cloned();
        match found {
            Some(validator) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(hint = ?key.hint, "validator cache hit");
                Some(validator)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(hint = ?key.hint, "validator cache miss");
                None
            }
        }
    }

    /// Publish `validator` unless an entry exists; return the published one.
    pub(crate) fn publish(&self, key: CacheKey, validator: Validator) -> Validator {
        let mut shard = self.shard(&key).write();
        match shard.get(&key) {
            Some(existing) => {
                self.races_lost.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(hint = ?key.hint, "lost validator publish race");
                existing.clone()
            }
            None => {
                shard.insert(key, validator.clone());
                validator
            }
        }
    }

    pub(crate) fn record_compile(&self) {
        self.compiled.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the traffic counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            compiled: self.compiled.load(Ordering::Relaxed),
            races_lost: self.races_lost.load(Ordering::Relaxed),
        }
    }

    /// Number of published entries.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ValidatorCache {
    fn default() -> Self {
        Self::new()
    }
}
