//! Stack growth for deep hint graphs.
//!
//! Compiling, checking and explaining all recurse once per nesting level of
//! a hint (or of a pith, for recursive hints). Recursive entry points wrap
//! themselves in [`ensure_sufficient_stack`].
//!
//! - **Red zone**: 100KB - If less than this remains, we grow the stack
//! - **Growth size**: 1MB - Each growth allocates this much additional space

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
