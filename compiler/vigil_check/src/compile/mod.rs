//! Validator compiler.
//!
//! A `CompileSession` compiles one root hint and everything reachable from
//! it. Sub-hints already in the cache are reused; new ones accumulate in a
//! session-local memo and are published together once the whole graph has
//! compiled, so a failed compile publishes nothing.
//!
//! # Cycles
//!
//! A hint is "in progress" from the moment its compile starts until it
//! returns. Reaching an in-progress hint again (only possible through a
//! forward reference) yields a `Deferred` placeholder whose slot is filled
//! when the outer compile finishes. Every slot is verified filled before
//! anything is published.

use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use vigil_diagnostic::ErrorCode;
use vigil_types::{ClassId, HintId, HintShape};

use crate::cache::{CacheKey, ScopeId};
use crate::checker::CheckerState;
use crate::config::ForwardRefPolicy;
use crate::error::{InternalInvariant, VigilError};
use crate::resolve::is_valid_reference;
use crate::stack::ensure_sufficient_stack;
use crate::validator::{reaches_unguarded, Kind, LazyRef, UNGUARDED_CYCLE};
use crate::Validator;

type Slot = Arc<OnceCell<Validator>>;

pub(crate) struct CompileSession<'a> {
    state: &'a Arc<CheckerState>,
    module: Option<&'a str>,
    scope: ScopeId,
    /// Hints being compiled, with the placeholder slot handed out if a cycle
    /// reached them.
    in_progress: FxHashMap<HintId, Option<Slot>>,
    /// Compiled in this session, in completion order.
    memo: FxHashMap<HintId, Validator>,
    order: Vec<HintId>,
    placeholders: Vec<(HintId, Slot)>,
}

impl<'a> CompileSession<'a> {
    pub(crate) fn new(state: &'a Arc<CheckerState>, module: Option<&'a str>, scope: ScopeId) -> Self {
        CompileSession {
            state,
            module,
            scope,
            in_progress: FxHashMap::default(),
            memo: FxHashMap::default(),
            order: Vec::new(),
            placeholders: Vec::new(),
        }
    }

    fn key(&self, hint: HintId) -> CacheKey {
        let scope = if self.state.pool.flags(hint).may_cycle() {
            self.scope
        } else {
            ScopeId::GLOBAL
        };
        CacheKey { hint, scope }
    }

    /// Compile `hint`, reusing published and session-local results.
    pub(crate) fn compile(&mut self, hint: HintId) -> Result<Validator, VigilError> {
        if let Some(validator) = self.memo.get(&hint) {
            return Ok(validator.clone());
        }
        if let Some(validator) = self.state.cache.get(self.key(hint)) {
            return Ok(validator);
        }
        if let Some(slot) = self.in_progress.get_mut(&hint) {
            let slot = slot.get_or_insert_with(|| Arc::new(OnceCell::new())).clone();
            let label = self.state.pool.format_hint(hint);
            tracing::debug!(hint = %label, "compile cycle; inserting placeholder");
            self.placeholders.push((hint, Arc::clone(&slot)));
            return Ok(Validator::new(hint, label, Kind::Deferred(slot)));
        }

        self.in_progress.insert(hint, None);
        let result = ensure_sufficient_stack(|| self.compile_shape(hint));
        let slot = self.in_progress.remove(&hint).flatten();
        let validator = result?;

        if let Some(slot) = slot {
            let is_placeholder =
                |v: &Validator| matches!(v.kind(), Kind::Deferred(inner) if Arc::ptr_eq(inner, &slot));
            if reaches_unguarded(&validator, &is_placeholder) {
                return Err(VigilError::unsupported(
                    ErrorCode::V1001,
                    self.state.pool.format_hint(hint),
                    UNGUARDED_CYCLE.to_string(),
                ));
            }
            if slot.set(validator.clone()).is_err() {
                return Err(VigilError::internal(InternalInvariant::UnfilledPlaceholder {
                    hint: validator.label().to_string(),
                }));
            }
        }

        self.memo.insert(hint, validator.clone());
        self.order.push(hint);
        Ok(validator)
    }

    fn compile_shape(&mut self, hint: HintId) -> Result<Validator, VigilError> {
        let state = self.state;
        let config = &state.config;
        let shape = state.pool.shape(hint);
        let label = state.pool.format_hint(hint);
        state.cache.record_compile();

        let kind = match shape {
            HintShape::Primitive {
                class: ClassId::OBJECT,
                exact: false,
            } => Kind::Accept,
            HintShape::Primitive { class, exact } => Kind::Instance {
                class,
                exact,
                tower: config.numeric_tower && class == ClassId::FLOAT && !exact,
            },
            HintShape::Union(members) => Kind::Union(self.compile_all(&members)?),
            HintShape::Sequence { origin, elem } => Kind::Sequence {
                origin,
                elem: self.compile(elem)?,
                sample: config.sample,
            },
            HintShape::FixedTuple(items) => Kind::FixedTuple(self.compile_all(&items)?),
            HintShape::Mapping { origin, key, value } => Kind::Mapping {
                origin,
                key: self.compile(key)?,
                value: self.compile(value)?,
                sample: config.sample,
            },
            HintShape::TypeVar {
                bound: None,
                constraints,
                ..
            } if constraints.is_empty() => Kind::Accept,
            HintShape::TypeVar {
                name,
                bound,
                constraints,
            } => Kind::TypeVar {
                name,
                bound: bound.map(|b| self.compile(b)).transpose()?,
                constraints: self.compile_all(&constraints)?,
            },
            HintShape::ForwardRef { name } => return self.forward_ref(hint, &name, label),
            HintShape::Literal(values) => Kind::Literal(values),
            HintShape::Protocol { params, .. } => Kind::Callable {
                arity: params.map(|p| p.len()),
            },
            HintShape::Unsupported(reason) => {
                return Err(VigilError::unsupported(
                    ErrorCode::V1001,
                    label,
                    reason.into_string(),
                ));
            }
        };

        Ok(Validator::new(hint, label, kind))
    }

    fn compile_all(&mut self, hints: &[HintId]) -> Result<Box<[Validator]>, VigilError> {
        hints.iter().map(|&hint| self.compile(hint)).collect()
    }

    fn forward_ref(&mut self, hint: HintId, name: &str, label: String) -> Result<Validator, VigilError> {
        if !is_valid_reference(name) {
            return Err(VigilError::invalid_signature(
                ErrorCode::V2002,
                format!("forward reference `{name}` is not a dotted name"),
            ));
        }
        match self.state.config.forward_refs {
            ForwardRefPolicy::Eager => {
                let target = self.state.resolve(name, self.module)?;
                self.compile(target)
            }
            ForwardRefPolicy::Lazy => Ok(Validator::new(
                hint,
                label,
                Kind::Lazy(LazyRef::new(name, self.module, Arc::downgrade(self.state))),
            )),
        }
    }

    fn verify_placeholders(&self) -> Result<(), VigilError> {
        for (hint, slot) in &self.placeholders {
            if slot.get().is_none() {
                return Err(VigilError::internal(InternalInvariant::UnfilledPlaceholder {
                    hint: self.state.pool.format_hint(*hint),
                }));
            }
        }
        Ok(())
    }

    /// Verify the session and return `root` without publishing anything.
    pub(crate) fn finish(self, root: Validator) -> Result<Validator, VigilError> {
        self.verify_placeholders()?;
        Ok(root)
    }

    /// Verify the session, publish everything it compiled and return the
    /// published validator for `root`.
    pub(crate) fn publish(self, root: HintId, validator: Validator) -> Result<Validator, VigilError> {
        self.verify_placeholders()?;
        let mut published_root = validator;
        for hint in &self.order {
            let Some(compiled) = self.memo.get(hint) else {
                continue;
            };
            let published = self.state.cache.publish(self.key(*hint), compiled.clone());
            if *hint == root {
                published_root = published;
            }
        }
        Ok(published_root)
    }
}
