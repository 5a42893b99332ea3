//! Checked callables.

use smallvec::SmallVec;

use vigil_check::{Bound, CompiledSignature, VigilError};
use vigil_types::Pith;

/// A callable body guarded by its compiled signature.
///
/// Arguments are checked before the body runs and the result after it
/// returns. For suspending callables the immediate result is handed back
/// unchecked; the host passes the value it eventually obtains to
/// [`check_resolved`](Self::check_resolved).
pub struct Checked<F> {
    signature: CompiledSignature,
    body: F,
}

impl<F> Checked<F>
where
    F: Fn(&[Pith]) -> Pith,
{
    pub(crate) fn new(signature: CompiledSignature, body: F) -> Self {
        Checked { signature, body }
    }

    pub fn signature(&self) -> &CompiledSignature {
        &self.signature
    }

    /// Call with one positional argument per declared parameter.
    pub fn call(&self, args: &[Pith]) -> Result<Pith, VigilError> {
        let bound: SmallVec<[Bound<'_>; 8]> = args.iter().map(Bound::Value).collect();
        self.call_bound(&bound, args)
    }

    /// Call with explicit bindings, for signatures with variadic or
    /// defaulted parameters. `args` is what the body receives.
    pub fn call_bound(&self, bound: &[Bound<'_>], args: &[Pith]) -> Result<Pith, VigilError> {
        self.signature.check_call(bound)?;
        let result = (self.body)(args);
        if !self.signature.is_suspending() {
            self.signature.check_return(&result)?;
        }
        Ok(result)
    }

    /// Check the value a suspending callable eventually produced.
    pub fn check_resolved(&self, value: Pith) -> Result<Pith, VigilError> {
        self.signature.check_return(&value)?;
        Ok(value)
    }
}
