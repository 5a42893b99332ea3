//! Hint model for the vigil runtime checker.
//!
//! - `HintId`: interned handle to a hint, THE cache key for compiled validators
//! - `HintData`: the raw hint vocabulary a host hands to the checker
//! - `HintPool`: sharded, thread-safe interner with structural deduplication
//! - `HintShape`: the closed set of shapes a hint classifies to
//! - `Pith`: the runtime value model checked against hints
//!
//! # Hint Identity
//!
//! Hints are interned by structural equality, so two hints built from the
//! same parts share one `HintId` and every downstream memo table can key on
//! a 32-bit handle instead of re-hashing whole hint trees.

mod class;
mod data;
mod flags;
mod idx;
mod pith;
mod pool;
mod shape;

pub use class::{ClassError, ClassRegistry};
pub use data::{HintData, Literal};
pub use flags::HintFlags;
pub use idx::{ClassId, HintId};
pub use pith::{Arity, CallableValue, Heap, Instance, Pith, SampleIndices, SampleStrategy};
pub use pool::{HintInternError, HintPool};
pub use shape::{classify, HintShape, ShapeTag};

// Size assertions to prevent accidental regressions.
// Handles are passed by value through every hot loop.
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{ClassId, HintId};
    const _: () = assert!(std::mem::size_of::<HintId>() == 4);
    const _: () = assert!(std::mem::size_of::<ClassId>() == 4);
}
