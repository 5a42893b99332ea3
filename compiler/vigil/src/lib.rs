//! Vigil: runtime type-hint checking.
//!
//! Hints are compiled once into validators and checked on every call:
//!
//! ```text
//! Signature ──compile_signature──▶ CompiledSignature
//!                                       │
//!     call(args) ──check_call──▶ body ──check_return──▶ result
//! ```
//!
//! A [`Session`] bundles what a host needs: a hint pool, a name table for
//! forward references and a [`Checker`] with its validator cache.
//! [`Checked`] wraps a Rust closure standing in for a host callable.
//!
//! # Logging
//!
//! Everything logs through `tracing`. Call [`init_tracing`] to print logs
//! filtered by `RUST_LOG`, e.g. `RUST_LOG=vigil_check=debug`.

mod checked;

use std::sync::{Arc, Once};

pub use checked::Checked;
pub use vigil_check::{
    is_valid_reference, parse_sample, Audience, Bound, CacheStats, CheckConfig, CheckSite,
    Checker, CompiledSignature, ForwardRefPolicy, InternalInvariant, NameResolver, NullResolver,
    Param, ParamKind, Phase, Resolution, ResolveContext, ScopeResolver, Signature, SiteKind,
    Validator, ValidatorCache, VigilError, Violation,
};
pub use vigil_diagnostic::{Diagnostic, ErrorCode, PathSegment, PithPath, Severity};
pub use vigil_types::{
    classify, Arity, ClassError, ClassId, ClassRegistry, HintData, HintFlags, HintId, HintPool,
    HintShape, Literal, Pith, SampleStrategy, ShapeTag,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debugging.
///
/// Call this once at startup. Set `RUST_LOG` to control output:
/// - `RUST_LOG=vigil_check=debug` - compile cycles, forward references, failed checks
/// - `RUST_LOG=vigil_check=trace` - every cache lookup
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// A hint pool, a forward reference table and a checker over both.
pub struct Session {
    pool: Arc<HintPool>,
    resolver: Arc<ScopeResolver>,
    checker: Checker,
}

impl Session {
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// A session whose policy comes from `VIGIL_*` environment variables.
    pub fn from_env() -> Self {
        Self::with_config(CheckConfig::from_env())
    }

    pub fn with_config(config: CheckConfig) -> Self {
        let pool = Arc::new(HintPool::new());
        let resolver = Arc::new(ScopeResolver::new());
        let checker = Checker::with_config(Arc::clone(&pool), resolver.clone(), config);
        Session {
            pool,
            resolver,
            checker,
        }
    }

    pub fn pool(&self) -> &HintPool {
        &self.pool
    }

    pub fn resolver(&self) -> &ScopeResolver {
        &self.resolver
    }

    pub fn checker(&self) -> &Checker {
        &self.checker
    }

    /// Register a class, returning it with its hint.
    pub fn define_class(&self, name: &str, bases: &[ClassId]) -> Result<(ClassId, HintId), ClassError> {
        self.pool.define_class(name, bases)
    }

    /// Bind a forward reference name (e.g. `shapes.Node`) to a hint.
    pub fn define(&self, qualified: &str, hint: HintId) {
        tracing::debug!(name = qualified, hint = %self.pool.format_hint(hint), "binding forward reference");
        self.resolver.define(qualified, hint);
    }

    /// Compile `signature` and wrap `body` so every call is checked.
    pub fn wrap<F>(&self, signature: &Signature, body: F) -> Result<Checked<F>, VigilError>
    where
        F: Fn(&[Pith]) -> Pith,
    {
        let compiled = self.checker.compile_signature(signature)?;
        tracing::trace!(callable = %compiled.qualname(), checks = compiled.checks_anything(), "wrapped callable");
        Ok(Checked::new(compiled, body))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
