//! Compact handles for interned hints and registered classes.
//!
//! # Design
//!
//! - `HintId` packs a shard index (high 4 bits) and a shard-local index
//!   (low 28 bits) so lookups go straight to the owning shard
//! - Well-known hints have fixed ids in shard 0 for O(1) construction
//! - `ClassId` is a plain index into the class registry; builtin classes
//!   occupy fixed slots below [`ClassId::FIRST_USER`]

use std::fmt;

/// Number of bits used for the shard-local index.
const LOCAL_BITS: u32 = 28;

/// Mask selecting the shard-local index.
const LOCAL_MASK: u32 = (1 << LOCAL_BITS) - 1;

/// A 32-bit handle to a hint interned in a [`HintPool`](crate::HintPool).
///
/// Hint equality is handle equality: structurally equal hints intern to the
/// same `HintId`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct HintId(u32);

impl HintId {
    // === Pre-interned Hints (shard 0, locals 0-7) ===

    /// `Any`: accepts every value.
    pub const ANY: Self = Self(0);
    /// `object`.
    pub const OBJECT: Self = Self(1);
    /// `None` (the `NoneType` class).
    pub const NONE: Self = Self(2);
    /// `bool`.
    pub const BOOL: Self = Self(3);
    /// `int`.
    pub const INT: Self = Self(4);
    /// `float`.
    pub const FLOAT: Self = Self(5);
    /// `str`.
    pub const STR: Self = Self(6);
    /// `bytes`.
    pub const BYTES: Self = Self(7);

    /// Number of pre-interned hints.
    pub const PRE_INTERNED_COUNT: u32 = 8;

    /// Maximum number of shards addressable by the encoding.
    pub const MAX_SHARDS: usize = 1 << (32 - LOCAL_BITS);

    /// Maximum number of hints per shard.
    pub const MAX_PER_SHARD: u32 = LOCAL_MASK;

    /// Build a handle from a shard index and a shard-local index.
    #[inline]
    pub const fn from_shard_local(shard: u32, local: u32) -> Self {
        Self((shard << LOCAL_BITS) | (local & LOCAL_MASK))
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index of the shard owning this hint.
    #[inline]
    pub const fn shard(self) -> usize {
        (self.0 >> LOCAL_BITS) as usize
    }

    /// Index of this hint within its shard.
    #[inline]
    pub const fn local(self) -> usize {
        (self.0 & LOCAL_MASK) as usize
    }

    /// Check if this is one of the pre-interned hints.
    #[inline]
    pub const fn is_pre_interned(self) -> bool {
        self.0 < Self::PRE_INTERNED_COUNT
    }
}

impl fmt::Debug for HintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HintId({}:{})", self.shard(), self.local())
    }
}

/// Handle to a class registered in a [`ClassRegistry`](crate::ClassRegistry).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct ClassId(u32);

impl ClassId {
    // === Concrete Builtins ===

    /// Root of the class hierarchy.
    pub const OBJECT: Self = Self(0);
    /// Type of the `None` singleton.
    pub const NONE_TYPE: Self = Self(1);
    /// `bool` (a subclass of `int`).
    pub const BOOL: Self = Self(2);
    /// `int`.
    pub const INT: Self = Self(3);
    /// `float`.
    pub const FLOAT: Self = Self(4);
    /// `str`.
    pub const STR: Self = Self(5);
    /// `bytes`.
    pub const BYTES: Self = Self(6);
    /// `list`.
    pub const LIST: Self = Self(7);
    /// `tuple`.
    pub const TUPLE: Self = Self(8);
    /// `dict`.
    pub const DICT: Self = Self(9);
    /// `set`.
    pub const SET: Self = Self(10);
    /// Plain functions and other host callables.
    pub const FUNCTION: Self = Self(11);

    // === Abstract Builtins ===

    /// Ordered, indexable collections.
    pub const SEQUENCE: Self = Self(12);
    /// Key-value collections.
    pub const MAPPING: Self = Self(13);
    /// Unordered unique collections.
    pub const ABSTRACT_SET: Self = Self(14);
    /// Anything with a length that can be iterated.
    pub const COLLECTION: Self = Self(15);
    /// Anything invocable.
    pub const CALLABLE: Self = Self(16);

    /// Number of builtin classes.
    pub const BUILTIN_COUNT: u32 = 17;

    /// First id handed out to integrator-defined classes.
    pub const FIRST_USER: u32 = 32;

    /// Create an id from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a builtin class.
    #[inline]
    pub const fn is_builtin(self) -> bool {
        self.0 < Self::BUILTIN_COUNT
    }
}
