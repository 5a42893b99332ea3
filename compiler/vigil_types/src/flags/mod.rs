//! Pre-computed hint metadata flags.
//!
//! `HintFlags` are computed once at interning time and cached alongside the
//! hint, so the compiler and check engine can answer "does this hint need
//! cycle tracking?" or "can this site be skipped?" without a traversal.

use bitflags::bitflags;

bitflags! {
    /// Pre-computed hint properties for O(1) queries.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct HintFlags: u16 {
        // === Presence Flags (bits 0-7) ===
        // Propagate from children to parents.

        /// Contains a forward reference (may be self-referential).
        const HAS_FORWARD_REF = 1 << 0;

        // === Category Flags (bits 8-15) ===
        // Describe the hint itself, never propagated.

        /// Accepts every value; checking it is a no-op.
        const IS_IGNORABLE = 1 << 8;
    }
}

impl HintFlags {
    /// Flags that propagate from child hints to parents.
    pub const PROPAGATE_MASK: Self = Self::HAS_FORWARD_REF;

    /// Combine propagated flags from multiple children.
    #[inline]
    pub fn propagate_all(children: impl IntoIterator<Item = Self>) -> Self {
        children
            .into_iter()
            .fold(Self::empty(), |acc, child| acc.union(child.intersection(Self::PROPAGATE_MASK)))
    }

    /// Check if checking this hint can be skipped entirely.
    #[inline]
    pub const fn is_ignorable(self) -> bool {
        self.contains(Self::IS_IGNORABLE)
    }

    /// Check if compiling this hint may revisit itself through a forward reference.
    #[inline]
    pub const fn may_cycle(self) -> bool {
        self.contains(Self::HAS_FORWARD_REF)
    }
}

impl Default for HintFlags {
    fn default() -> Self {
        Self::empty()
    }
}
