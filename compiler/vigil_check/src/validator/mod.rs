//! Compiled validators.
//!
//! A [`Validator`] is an immutable, reference-counted node tree compiled from
//! one hint. Checking is a walk of that tree alongside the pith; policy
//! (sample strategy, numeric tower) was baked in at compile time, so the
//! walk needs only the class registry.
//!
//! # Indirection Nodes
//!
//! - `Deferred` breaks compile cycles: it points at a slot filled once the
//!   hint it stands for finishes compiling
//! - `Lazy` defers forward reference resolution to the first check
//!
//! Neither is ever observable as a partially built validator: a deferred
//! slot is verified filled before its session publishes anything, and a
//! lazy target is initialized at most once.

use once_cell::sync::OnceCell;
use rustc_hash::FxHashSet;
use std::fmt;
use std::sync::{Arc, Weak};

use vigil_diagnostic::ErrorCode;
use vigil_types::{Arity, ClassId, ClassRegistry, HintId, Literal, Pith, SampleStrategy};

use crate::checker::CheckerState;
use crate::error::{InternalInvariant, VigilError};
use crate::stack::ensure_sufficient_stack;

/// A compiled check for one hint.
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct Validator(Arc<Node>);

pub(crate) struct Node {
    hint: HintId,
    label: Box<str>,
    kind: Kind,
}

pub(crate) enum Kind {
    /// Accepts everything.
    Accept,
    Instance {
        class: ClassId,
        exact: bool,
        /// Also accept `int` (a `float` hint under the numeric tower).
        tower: bool,
    },
    Union(Box<[Validator]>),
    Sequence {
        origin: ClassId,
        elem: Validator,
        sample: SampleStrategy,
    },
    FixedTuple(Box<[Validator]>),
    Mapping {
        origin: ClassId,
        key: Validator,
        value: Validator,
        sample: SampleStrategy,
    },
    TypeVar {
        name: Box<str>,
        bound: Option<Validator>,
        constraints: Box<[Validator]>,
    },
    Literal(Box<[Literal]>),
    Callable {
        /// Required arity; `None` for `Callable[..., R]`.
        arity: Option<usize>,
    },
    Deferred(Arc<OnceCell<Validator>>),
    Lazy(LazyRef),
}

impl Validator {
    pub(crate) fn new(hint: HintId, label: String, kind: Kind) -> Self {
        Validator(Arc::new(Node {
            hint,
            label: label.into_boxed_str(),
            kind,
        }))
    }

    /// The hint this validator was compiled from.
    pub fn hint(&self) -> HintId {
        self.0.hint
    }

    /// The hint as written, for diagnostics.
    pub fn label(&self) -> &str {
        &self.0.label
    }

    /// Check if this validator accepts every value.
    pub fn accepts_everything(&self) -> bool {
        matches!(self.0.kind, Kind::Accept)
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// Check if two handles share one compiled node.
    pub fn ptr_eq(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Follow `Deferred` and `Lazy` indirections to a concrete node.
    pub(crate) fn resolved(&self) -> Result<&Validator, VigilError> {
        let mut current = self;
        loop {
            current = match &current.0.kind {
                Kind::Deferred(slot) => slot.get().ok_or_else(|| {
                    VigilError::internal(InternalInvariant::UnfilledPlaceholder {
                        hint: current.label().to_string(),
                    })
                })?,
                Kind::Lazy(lazy) => lazy.target()?,
                _ => return Ok(current),
            };
        }
    }

    /// Check `pith` against this validator.
    ///
    /// `Ok(false)` is a violation. `Err` is raised only by forward reference
    /// indirections: a lazy reference that cannot be resolved, or a broken
    /// internal invariant.
    pub fn accepts(&self, pith: &Pith, classes: &ClassRegistry) -> Result<bool, VigilError> {
        match &self.0.kind {
            Kind::Accept => Ok(true),
            Kind::Instance {
                class,
                exact,
                tower,
            } => Ok(is_instance(pith, *class, *exact, *tower, classes)),
            Kind::Union(members) => {
                for member in members.iter() {
                    if member.accepts(pith, classes)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Kind::Sequence {
                origin,
                elem,
                sample,
            } => {
                if !classes.is_subclass(pith.class_id(), *origin) {
                    return Ok(false);
                }
                if elem.accepts_everything() {
                    return Ok(true);
                }
                ensure_sufficient_stack(|| {
                    for (_, item) in pith.iterate_sample(*sample) {
                        if !elem.accepts(&item, classes)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                })
            }
            Kind::FixedTuple(items) => {
                if !classes.is_subclass(pith.class_id(), ClassId::TUPLE)
                    || pith.length() != Some(items.len())
                {
                    return Ok(false);
                }
                ensure_sufficient_stack(|| {
                    for (index, item) in items.iter().enumerate() {
                        let Some(value) = pith.item_at(index) else {
                            return Ok(false);
                        };
                        if !item.accepts(&value, classes)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                })
            }
            Kind::Mapping {
                origin,
                key,
                value,
                sample,
            } => {
                if !classes.is_subclass(pith.class_id(), *origin) {
                    return Ok(false);
                }
                if key.accepts_everything() && value.accepts_everything() {
                    return Ok(true);
                }
                ensure_sufficient_stack(|| {
                    for (_, k, v) in pith.mapping_sample(*sample) {
                        if !key.accepts(k, classes)? || !value.accepts(v, classes)? {
                            return Ok(false);
                        }
                    }
                    Ok(true)
                })
            }
            Kind::TypeVar {
                bound, constraints, ..
            } => {
                if let Some(bound) = bound {
                    return bound.accepts(pith, classes);
                }
                for constraint in constraints.iter() {
                    if constraint.accepts(pith, classes)? {
                        return Ok(true);
                    }
                }
                Ok(constraints.is_empty())
            }
            Kind::Literal(values) => Ok(values.iter().any(|value| pith.matches_literal(value))),
            Kind::Callable { arity } => Ok(is_invocable(pith, *arity)),
            Kind::Deferred(_) | Kind::Lazy(_) => {
                let target = self.resolved()?;
                ensure_sufficient_stack(|| target.accepts(pith, classes))
            }
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.0.label)
    }
}

/// Class membership, honoring subclassing unless `exact`.
pub(crate) fn is_instance(
    pith: &Pith,
    class: ClassId,
    exact: bool,
    tower: bool,
    classes: &ClassRegistry,
) -> bool {
    let actual = pith.class_id();
    if exact {
        return actual == class;
    }
    classes.is_subclass(actual, class) || (tower && classes.is_subclass(actual, ClassId::INT))
}

/// Invocable, and accepting `arity` positional arguments if given.
pub(crate) fn is_invocable(pith: &Pith, arity: Option<usize>) -> bool {
    match pith.invocable_arity() {
        Some(actual) => arity.map_or(true, |n| actual.accepts(n)),
        None => false,
    }
}

/// Describe an arity for diagnostics.
pub(crate) fn describe_arity(arity: Arity) -> String {
    match arity.max {
        Some(max) if max == arity.required => format!("{max}"),
        Some(max) => format!("{} to {max}", arity.required),
        None => format!("at least {}", arity.required),
    }
}

/// Reason reported for a recursive hint that could never finish a check.
pub(crate) const UNGUARDED_CYCLE: &str =
    "recursive hint reaches itself without passing through a container";

/// Check if `root` reaches a node matching `is_target` without descending
/// into a container.
///
/// Such a cycle would recurse forever on any value it rejects, since no
/// step of it moves to a smaller sub-value.
pub(crate) fn reaches_unguarded(root: &Validator, is_target: &dyn Fn(&Validator) -> bool) -> bool {
    let mut pending = vec![root];
    let mut seen: FxHashSet<*const Node> = FxHashSet::default();

    while let Some(validator) = pending.pop() {
        if !seen.insert(Arc::as_ptr(&validator.0)) {
            continue;
        }
        match &validator.0.kind {
            Kind::Union(members) => pending.extend(members.iter()),
            Kind::TypeVar {
                bound, constraints, ..
            } => {
                pending.extend(bound.iter());
                pending.extend(constraints.iter());
            }
            Kind::Deferred(slot) => {
                if is_target(validator) {
                    return true;
                }
                pending.extend(slot.get());
            }
            Kind::Lazy(lazy) => {
                if is_target(validator) {
                    return true;
                }
                pending.extend(lazy.target.get());
            }
            _ => {}
        }
    }
    false
}

/// A forward reference resolved on first use.
pub(crate) struct LazyRef {
    name: Box<str>,
    module: Option<Box<str>>,
    checker: Weak<CheckerState>,
    target: OnceCell<Validator>,
}

impl LazyRef {
    pub(crate) fn new(name: &str, module: Option<&str>, checker: Weak<CheckerState>) -> Self {
        LazyRef {
            name: name.into(),
            module: module.map(Into::into),
            checker,
            target: OnceCell::new(),
        }
    }

    /// The referenced validator, resolving and compiling it on first call.
    ///
    /// A failed resolution is not remembered; the next call retries.
    pub(crate) fn target(&self) -> Result<&Validator, VigilError> {
        self.target.get_or_try_init(|| {
            let checker = self.checker.upgrade().ok_or_else(|| {
                VigilError::internal(InternalInvariant::DetachedSession {
                    name: self.name.to_string(),
                })
            })?;
            tracing::debug!(name = %self.name, "resolving lazy forward reference");
            let module = self.module.as_deref();
            let hint = checker.resolve(&self.name, module)?;
            let target = checker.get_or_compile(hint, module)?;
            let is_self = |v: &Validator| matches!(v.kind(), Kind::Lazy(lazy) if std::ptr::eq(lazy, self));
            if reaches_unguarded(&target, &is_self) {
                return Err(VigilError::unsupported(
                    ErrorCode::V1001,
                    format!("'{}'", self.name),
                    UNGUARDED_CYCLE.to_string(),
                ));
            }
            Ok(target)
        })
    }
}
