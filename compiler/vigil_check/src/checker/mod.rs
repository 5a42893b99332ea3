//! The checker: one hint pool, one resolver, one policy, one cache.
//!
//! A `Checker` is the explicit owner of the validator cache. Clone it freely;
//! clones share everything. Lazy forward references hold a weak handle back
//! to the checker's state, so dropping every clone detaches them.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use vigil_diagnostic::{Diagnostic, ErrorCode};
use vigil_types::{HintId, HintPool, HintShape, Pith};

use crate::cache::{CacheKey, CacheStats, ScopeId, ValidatorCache};
use crate::compile::CompileSession;
use crate::engine::{self, CheckSite};
use crate::explain;
use crate::resolve::{NameResolver, Resolution, ResolveContext};
use crate::signature::{CompiledSignature, Signature};
use crate::{CheckConfig, Validator, VigilError};

pub(crate) struct CheckerState {
    pub(crate) pool: Arc<HintPool>,
    pub(crate) cache: ValidatorCache,
    pub(crate) config: CheckConfig,
    resolver: Arc<dyn NameResolver>,
    scopes: RwLock<FxHashMap<Box<str>, ScopeId>>,
}

impl CheckerState {
    /// Cache scope for `hint` compiled on behalf of `module`.
    fn scope_for(&self, hint: HintId, module: Option<&str>) -> ScopeId {
        let Some(module) = module else {
            return ScopeId::GLOBAL;
        };
        if !self.pool.flags(hint).may_cycle() {
            return ScopeId::GLOBAL;
        }
        if let Some(&scope) = self.scopes.read().get(module) {
            return scope;
        }
        let mut scopes = self.scopes.write();
        let next = u32::try_from(scopes.len() + 1).unwrap_or(u32::MAX);
        *scopes
            .entry(module.into())
            .or_insert(ScopeId::from_raw(next))
    }

    /// Resolve a forward reference name to a hint.
    pub(crate) fn resolve(&self, name: &str, module: Option<&str>) -> Result<HintId, VigilError> {
        match self.resolver.resolve(name, &ResolveContext { module }) {
            Resolution::Found(hint) => {
                tracing::debug!(name, ?hint, "resolved forward reference");
                Ok(hint)
            }
            Resolution::NotFound => Err(VigilError::unsupported(
                ErrorCode::V2003,
                format!("'{name}'"),
                format!("`{name}` does not name a known hint"),
            )),
        }
    }

    pub(crate) fn get_or_compile(
        self: &Arc<Self>,
        hint: HintId,
        module: Option<&str>,
    ) -> Result<Validator, VigilError> {
        let scope = self.scope_for(hint, module);
        if let Some(validator) = self.cache.get(CacheKey { hint, scope }) {
            return Ok(validator);
        }
        let mut session = CompileSession::new(self, module, scope);
        let validator = session.compile(hint)?;
        session.publish(hint, validator)
    }
}

/// Compiles, caches and runs validators.
#[derive(Clone)]
pub struct Checker {
    state: Arc<CheckerState>,
}

impl Checker {
    /// Create a checker with the default policy.
    pub fn new(pool: Arc<HintPool>, resolver: Arc<dyn NameResolver>) -> Self {
        Self::with_config(pool, resolver, CheckConfig::default())
    }

    pub fn with_config(
        pool: Arc<HintPool>,
        resolver: Arc<dyn NameResolver>,
        config: CheckConfig,
    ) -> Self {
        tracing::debug!(?config, "creating checker");
        Checker {
            state: Arc::new(CheckerState {
                pool,
                cache: ValidatorCache::new(),
                config,
                resolver,
                scopes: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    pub fn pool(&self) -> &Arc<HintPool> {
        &self.state.pool
    }

    pub fn config(&self) -> &CheckConfig {
        &self.state.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.state.cache.stats()
    }

    /// Number of published validators.
    pub fn cached_validators(&self) -> usize {
        self.state.cache.len()
    }

    /// Classify `hint` (memoized by the pool).
    pub fn classify(&self, hint: HintId) -> HintShape {
        self.state.pool.shape(hint)
    }

    /// Compile `hint` without publishing it.
    ///
    /// Sub-hints already in the cache are reused.
    pub fn compile(&self, hint: HintId) -> Result<Validator, VigilError> {
        self.compile_in(hint, None)
    }

    /// Compile `hint` without publishing it, resolving relative forward
    /// references in `module`.
    pub fn compile_in(&self, hint: HintId, module: Option<&str>) -> Result<Validator, VigilError> {
        let scope = self.state.scope_for(hint, module);
        let mut session = CompileSession::new(&self.state, module, scope);
        let validator = session.compile(hint)?;
        session.finish(validator)
    }

    /// The published validator for `hint`, compiling and publishing it first
    /// if needed.
    pub fn get_or_compile(&self, hint: HintId) -> Result<Validator, VigilError> {
        self.state.get_or_compile(hint, None)
    }

    /// Like [`get_or_compile`](Self::get_or_compile), resolving relative
    /// forward references in `module`.
    pub fn get_or_compile_in(
        &self,
        hint: HintId,
        module: Option<&str>,
    ) -> Result<Validator, VigilError> {
        self.state.get_or_compile(hint, module)
    }

    /// Run check sites in order, stopping at the first violation.
    pub fn check(&self, sites: &[CheckSite<'_>]) -> Result<(), VigilError> {
        engine::run(sites, self.state.pool.classes(), self.state.config.max_repr_len)
    }

    /// Explain why `pith` violates `hint`.
    ///
    /// Only meaningful after a check rejected the pair; explaining an
    /// accepted pair is an internal invariant failure.
    pub fn explain(&self, pith: &Pith, hint: HintId) -> Result<Diagnostic, VigilError> {
        let validator = self.get_or_compile(hint)?;
        self.explain_validator(pith, &validator)
    }

    /// Explain why `pith` violates `validator`.
    pub fn explain_validator(
        &self,
        pith: &Pith,
        validator: &Validator,
    ) -> Result<Diagnostic, VigilError> {
        explain::explain(
            pith,
            validator,
            self.state.pool.classes(),
            self.state.config.max_repr_len,
        )
    }

    /// Compile every hint of a signature, all or nothing.
    pub fn compile_signature(&self, signature: &Signature) -> Result<CompiledSignature, VigilError> {
        CompiledSignature::compile(self, signature)
    }

    pub(crate) fn state(&self) -> &Arc<CheckerState> {
        &self.state
    }
}

#[cfg(test)]
mod tests;
