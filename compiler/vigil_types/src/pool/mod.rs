//! Sharded hint interner.
//!
//! Provides O(1) hint interning, lookup and equality comparison via `HintId`.
//! Follows the same pattern as the compiler's type interner: 16 shards, each
//! behind its own `RwLock`, with a read-locked fast path and a double-checked
//! write-locked slow path.
//!
//! The pool also owns the [`ClassRegistry`] (class hints refer into it) and
//! memoizes [`classify`](crate::classify) results, so a hint's shape is
//! derived once per distinct hint.

mod construct;
mod format;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHasher};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{classify, ClassId, ClassRegistry, HintData, HintFlags, HintId, HintShape};

/// Error when interning a hint fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintInternError {
    /// Shard exceeded capacity (over 268 million hints per shard).
    ShardOverflow { shard_idx: usize },
}

impl fmt::Display for HintInternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HintInternError::ShardOverflow { shard_idx } => {
                write!(f, "hint pool shard {shard_idx} exceeded its capacity")
            }
        }
    }
}

impl std::error::Error for HintInternError {}

/// One interned hint.
struct Entry {
    data: HintData,
    flags: HintFlags,
}

/// Per-shard storage for interned hints.
struct HintShard {
    /// Map from hint data to local index for deduplication.
    map: FxHashMap<HintData, u32>,
    /// Storage for hints, indexed by local index.
    entries: Vec<Entry>,
}

impl HintShard {
    fn new() -> Self {
        Self {
            map: FxHashMap::default(),
            entries: Vec::with_capacity(64),
        }
    }

    /// Create shard 0 with the pre-interned hints at fixed indices.
    fn with_pre_interned() -> Self {
        let mut shard = Self::new();

        let pre_interned = [
            (HintData::Any, HintFlags::IS_IGNORABLE), // 0 = HintId::ANY
            (HintData::Class(ClassId::OBJECT), HintFlags::IS_IGNORABLE), // 1 = HintId::OBJECT
            (HintData::Class(ClassId::NONE_TYPE), HintFlags::empty()), // 2 = HintId::NONE
            (HintData::Class(ClassId::BOOL), HintFlags::empty()), // 3 = HintId::BOOL
            (HintData::Class(ClassId::INT), HintFlags::empty()), // 4 = HintId::INT
            (HintData::Class(ClassId::FLOAT), HintFlags::empty()), // 5 = HintId::FLOAT
            (HintData::Class(ClassId::STR), HintFlags::empty()), // 6 = HintId::STR
            (HintData::Class(ClassId::BYTES), HintFlags::empty()), // 7 = HintId::BYTES
        ];

        for (local, (data, flags)) in (0u32..).zip(pre_interned) {
            shard.map.insert(data.clone(), local);
            shard.entries.push(Entry { data, flags });
        }

        shard
    }
}

/// Number of shards for hint interning.
const NUM_SHARDS: usize = 16;

/// Sharded hint interner for concurrent access.
///
/// # Thread Safety
/// Uses `RwLock` per shard for concurrent read/write access. Share it across
/// threads behind an `Arc`.
///
/// # Pre-interned Hints
/// `Any`, `object`, `None` and the scalar classes have fixed `HintId`
/// constants ([`HintId::INT`], ...).
pub struct HintPool {
    shards: [RwLock<HintShard>; NUM_SHARDS],
    classes: ClassRegistry,
    shapes: RwLock<FxHashMap<HintId, HintShape>>,
}

impl HintPool {
    /// Create a new pool with pre-interned hints and builtin classes.
    pub fn new() -> Self {
        let shards = std::array::from_fn(|i| {
            if i == 0 {
                RwLock::new(HintShard::with_pre_interned())
            } else {
                RwLock::new(HintShard::new())
            }
        });

        Self {
            shards,
            classes: ClassRegistry::new(),
            shapes: RwLock::new(FxHashMap::default()),
        }
    }

    /// Compute shard index for a hint based on its hash.
    #[inline]
    fn shard_for(data: &HintData) -> usize {
        let mut hasher = FxHasher::default();
        data.hash(&mut hasher);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "truncation is fine for hash-based shard selection"
        )]
        let hash_usize = hasher.finish() as usize;
        hash_usize % NUM_SHARDS
    }

    /// Fixed id for hints pre-interned in shard 0.
    #[inline]
    fn pre_interned(data: &HintData) -> Option<HintId> {
        match data {
            HintData::Any => Some(HintId::ANY),
            HintData::Class(class) => match *class {
                ClassId::OBJECT => Some(HintId::OBJECT),
                ClassId::NONE_TYPE => Some(HintId::NONE),
                ClassId::BOOL => Some(HintId::BOOL),
                ClassId::INT => Some(HintId::INT),
                ClassId::FLOAT => Some(HintId::FLOAT),
                ClassId::STR => Some(HintId::STR),
                ClassId::BYTES => Some(HintId::BYTES),
                _ => None,
            },
            _ => None,
        }
    }

    /// Try to intern a hint, returning its `HintId` or an error on overflow.
    ///
    /// If the hint is already interned, returns the existing `HintId`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "shard_idx is bounded by NUM_SHARDS (16)"
    )]
    pub fn try_intern(&self, data: HintData) -> Result<HintId, HintInternError> {
        if let Some(id) = Self::pre_interned(&data) {
            return Ok(id);
        }

        let shard_idx = Self::shard_for(&data);
        let shard = &self.shards[shard_idx];

        // Fast path: check if already interned
        {
            let guard = shard.read();
            if let Some(&local) = guard.map.get(&data) {
                return Ok(HintId::from_shard_local(shard_idx as u32, local));
            }
        }

        // Flags come from already-interned children; compute before locking
        // this shard since a child may live in it.
        let flags = self.compute_flags(&data);

        // Slow path: need to insert
        let mut guard = shard.write();

        // Double-check after acquiring write lock
        if let Some(&local) = guard.map.get(&data) {
            return Ok(HintId::from_shard_local(shard_idx as u32, local));
        }

        let local = u32::try_from(guard.entries.len())
            .ok()
            .filter(|&local| local < HintId::MAX_PER_SHARD)
            .ok_or(HintInternError::ShardOverflow { shard_idx })?;

        guard.map.insert(data.clone(), local);
        guard.entries.push(Entry { data, flags });

        Ok(HintId::from_shard_local(shard_idx as u32, local))
    }

    /// Intern a hint, returning its `HintId`.
    ///
    /// # Panics
    /// Panics if a shard exceeds capacity. Use `try_intern` for fallible
    /// interning.
    pub fn intern(&self, data: HintData) -> HintId {
        self.try_intern(data).unwrap_or_else(|e| panic!("{e}"))
    }

    fn compute_flags(&self, data: &HintData) -> HintFlags {
        let children = HintFlags::propagate_all(data.children().map(|child| self.flags(child)));
        let own = match data {
            HintData::Any => HintFlags::IS_IGNORABLE,
            HintData::Class(class) if *class == ClassId::OBJECT => HintFlags::IS_IGNORABLE,
            HintData::Union(members) if members.iter().any(|&m| self.flags(m).is_ignorable()) => {
                HintFlags::IS_IGNORABLE
            }
            HintData::TypeVar {
                bound: None,
                constraints,
                ..
            } if constraints.is_empty() => HintFlags::IS_IGNORABLE,
            HintData::ForwardRef(_) => HintFlags::HAS_FORWARD_REF,
            _ => HintFlags::empty(),
        };
        children | own
    }

    /// Look up the hint data for a `HintId`.
    ///
    /// # Panics
    /// Panics if the `HintId` was not created by this pool.
    pub fn lookup(&self, id: HintId) -> HintData {
        let guard = self.shards[id.shard()].read();
        guard.entries[id.local()].data.clone()
    }

    /// Run `f` against the hint data without cloning it.
    ///
    /// # Panics
    /// Panics if the `HintId` was not created by this pool.
    pub fn with_data<R>(&self, id: HintId, f: impl FnOnce(&HintData) -> R) -> R {
        let guard = self.shards[id.shard()].read();
        f(&guard.entries[id.local()].data)
    }

    /// Get the pre-computed flags for a hint.
    ///
    /// # Panics
    /// Panics if the `HintId` was not created by this pool.
    #[inline]
    pub fn flags(&self, id: HintId) -> HintFlags {
        let guard = self.shards[id.shard()].read();
        guard.entries[id.local()].flags
    }

    /// Check if `id` was created by this pool.
    pub fn contains(&self, id: HintId) -> bool {
        id.shard() < NUM_SHARDS && id.local() < self.shards[id.shard()].read().entries.len()
    }

    /// The class registry that class hints refer into.
    pub fn classes(&self) -> &ClassRegistry {
        &self.classes
    }

    /// Classified shape of a hint, memoized per `HintId`.
    ///
    /// Classification is pure, so two threads racing on the same hint compute
    /// equal shapes and whichever lands second is dropped.
    pub fn shape(&self, id: HintId) -> HintShape {
        if let Some(shape) = self.shapes.read().get(&id) {
            return shape.clone();
        }
        let shape = classify(self, id);
        self.shapes.write().entry(id).or_insert(shape).clone()
    }

    /// Number of interned hints (including pre-interned ones).
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().entries.len()).sum()
    }

    /// Check if the pool is empty (never true: hints are pre-interned).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HintPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
