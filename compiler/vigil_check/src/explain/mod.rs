//! Diagnostic walker.
//!
//! Re-derives why a value was rejected by descending the validator in
//! lock-step with the value, stopping at the shallowest sub-value whose
//! mismatch cannot be broken down further.
//!
//! The walker scans containers exhaustively and reports the first failing
//! item, whatever sample the check engine used. It runs only after a
//! rejection, so its cost never reaches the success path.
//!
//! # Unions
//!
//! Every member is walked. The reported failure is the one from the member
//! closest to the value's own shape:
//! - a container member whose class the value already has
//! - a literal member listing a value of the same kind
//!
//! Ties keep the deepest failure, then the first member in declared order.
//! When no member is close, the union itself is reported.

use std::fmt::Write;

use vigil_diagnostic::{Diagnostic, ErrorCode, PathSegment, PithPath};
use vigil_types::{ClassId, ClassRegistry, Literal, Pith, SampleStrategy};

use crate::error::{InternalInvariant, VigilError};
use crate::stack::ensure_sufficient_stack;
use crate::validator::{describe_arity, is_instance, is_invocable, Kind};
use crate::Validator;

/// Explain why `validator` rejects `pith`.
pub(crate) fn explain(
    pith: &Pith,
    validator: &Validator,
    classes: &ClassRegistry,
    max_repr: usize,
) -> Result<Diagnostic, VigilError> {
    let mut walker = Walker {
        classes,
        max_repr,
        path: PithPath::root(),
    };
    match walker.walk(pith, validator)? {
        Some(diagnostic) => Ok(diagnostic),
        None => Err(VigilError::internal(InternalInvariant::DiagnosticDesync {
            hint: validator.label().to_string(),
            value: pith.repr(max_repr),
        })),
    }
}

struct Walker<'a> {
    classes: &'a ClassRegistry,
    max_repr: usize,
    path: PithPath,
}

/// One union member's failure.
struct Candidate {
    affinity: u8,
    member: usize,
    diagnostic: Diagnostic,
}

impl Walker<'_> {
    /// `Ok(None)` when the validator accepts the value after all.
    fn walk(&mut self, pith: &Pith, validator: &Validator) -> Result<Option<Diagnostic>, VigilError> {
        ensure_sufficient_stack(|| self.walk_node(pith, validator))
    }

    fn walk_node(&mut self, pith: &Pith, validator: &Validator) -> Result<Option<Diagnostic>, VigilError> {
        match validator.kind() {
            Kind::Accept => Ok(None),
            Kind::Instance {
                class,
                exact,
                tower,
            } => {
                if is_instance(pith, *class, *exact, *tower, self.classes) {
                    Ok(None)
                } else {
                    Ok(Some(self.mismatch(ErrorCode::V3001, validator, pith)))
                }
            }
            Kind::Union(members) => self.walk_union(pith, validator, members),
            Kind::Sequence { origin, elem, .. } => {
                if !self.classes.is_subclass(pith.class_id(), *origin) {
                    return Ok(Some(self.mismatch(ErrorCode::V3001, validator, pith)));
                }
                if elem.accepts_everything() {
                    return Ok(None);
                }
                for (index, item) in pith.iterate_sample(SampleStrategy::Exhaustive) {
                    self.path.push(PathSegment::Index(index));
                    let found = self.walk(&item, elem);
                    self.path.pop();
                    if let Some(diagnostic) = found? {
                        return Ok(Some(diagnostic));
                    }
                }
                Ok(None)
            }
            Kind::FixedTuple(items) => {
                if !self.classes.is_subclass(pith.class_id(), ClassId::TUPLE) {
                    return Ok(Some(self.mismatch(ErrorCode::V3001, validator, pith)));
                }
                let Some(len) = pith.length() else {
                    return Ok(Some(self.mismatch(ErrorCode::V3001, validator, pith)));
                };
                if len != items.len() {
                    let diagnostic = Diagnostic::error(ErrorCode::V3002)
                        .with_message(format!(
                            "expected tuple of length {}, got length {len}",
                            items.len()
                        ))
                        .with_path(self.path.clone())
                        .with_expected(validator.label())
                        .with_found(pith.repr(self.max_repr));
                    return Ok(Some(diagnostic));
                }
                for (index, item) in items.iter().enumerate() {
                    let Some(value) = pith.item_at(index) else {
                        return Ok(Some(self.mismatch(ErrorCode::V3001, validator, pith)));
                    };
                    self.path.push(PathSegment::Index(index));
                    let found = self.walk(&value, item);
                    self.path.pop();
                    if let Some(diagnostic) = found? {
                        return Ok(Some(diagnostic));
                    }
                }
                Ok(None)
            }
            Kind::Mapping {
                origin, key, value, ..
            } => {
                if !self.classes.is_subclass(pith.class_id(), *origin) {
                    return Ok(Some(self.mismatch(ErrorCode::V3001, validator, pith)));
                }
                for (_, k, v) in pith.mapping_sample(SampleStrategy::Exhaustive) {
                    let key_repr = k.repr(self.max_repr);

                    self.path.push(PathSegment::Key(key_repr.clone()));
                    let found = self.walk(k, key);
                    self.path.pop();
                    if let Some(diagnostic) = found? {
                        return Ok(Some(diagnostic));
                    }

                    self.path.push(PathSegment::Value(key_repr));
                    let found = self.walk(v, value);
                    self.path.pop();
                    if let Some(diagnostic) = found? {
                        return Ok(Some(diagnostic));
                    }
                }
                Ok(None)
            }
            Kind::TypeVar {
                name,
                bound,
                constraints,
            } => {
                if let Some(bound) = bound {
                    let found = self.walk(pith, bound)?;
                    return Ok(found.map(|diagnostic| {
                        diagnostic.with_note(format!("type variable `{name}` is bound to `{}`", bound.label()))
                    }));
                }
                for constraint in constraints.iter() {
                    if constraint.accepts(pith, self.classes)? {
                        return Ok(None);
                    }
                }
                if constraints.is_empty() {
                    return Ok(None);
                }
                let mut listed = String::new();
                for (i, constraint) in constraints.iter().enumerate() {
                    if i > 0 {
                        listed.push_str(", ");
                    }
                    let _ = write!(listed, "`{}`", constraint.label());
                }
                let diagnostic = self
                    .mismatch(ErrorCode::V3006, validator, pith)
                    .with_note(format!("type variable `{name}` is constrained to {listed}"));
                Ok(Some(diagnostic))
            }
            Kind::Literal(values) => {
                if values.iter().any(|value| pith.matches_literal(value)) {
                    Ok(None)
                } else {
                    Ok(Some(self.mismatch(ErrorCode::V3003, validator, pith)))
                }
            }
            Kind::Callable { arity } => {
                if is_invocable(pith, *arity) {
                    return Ok(None);
                }
                let Some(actual) = pith.invocable_arity() else {
                    return Ok(Some(self.mismatch(ErrorCode::V3004, validator, pith)));
                };
                let expected = arity.unwrap_or(0);
                let diagnostic = Diagnostic::error(ErrorCode::V3004)
                    .with_message(format!(
                        "expected `{}`, got {} accepting {} arguments, not {expected}",
                        validator.label(),
                        pith.repr(self.max_repr),
                        describe_arity(actual),
                    ))
                    .with_path(self.path.clone())
                    .with_expected(validator.label())
                    .with_found(pith.repr(self.max_repr));
                Ok(Some(diagnostic))
            }
            Kind::Deferred(_) | Kind::Lazy(_) => {
                let target = validator.resolved()?;
                self.walk(pith, target)
            }
        }
    }

    fn walk_union(
        &mut self,
        pith: &Pith,
        union: &Validator,
        members: &[Validator],
    ) -> Result<Option<Diagnostic>, VigilError> {
        let mut best: Option<Candidate> = None;

        for (member, validator) in members.iter().enumerate() {
            let Some(diagnostic) = self.walk(pith, validator)? else {
                return Ok(None);
            };
            let affinity = self.affinity(pith, validator)?;
            let better = match &best {
                None => true,
                Some(current) => {
                    (affinity, diagnostic.path.depth())
                        > (current.affinity, current.diagnostic.path.depth())
                }
            };
            if better {
                best = Some(Candidate {
                    affinity,
                    member,
                    diagnostic,
                });
            }
        }

        match best {
            Some(candidate) if candidate.affinity > 0 => {
                let closest = members[candidate.member].label();
                Ok(Some(candidate.diagnostic.with_note(format!(
                    "`{closest}` is the closest member of `{}`",
                    union.label()
                ))))
            }
            _ => Ok(Some(self.mismatch(ErrorCode::V3005, union, pith))),
        }
    }

    /// How closely a union member matches the value's own shape.
    fn affinity(&self, pith: &Pith, member: &Validator) -> Result<u8, VigilError> {
        let affinity = match member.resolved()?.kind() {
            Kind::Sequence { origin, .. } | Kind::Mapping { origin, .. }
                if self.classes.is_subclass(pith.class_id(), *origin) =>
            {
                2
            }
            Kind::FixedTuple(_) if self.classes.is_subclass(pith.class_id(), ClassId::TUPLE) => 2,
            Kind::Literal(values) if values.iter().any(|value| same_kind(pith, value)) => 1,
            _ => 0,
        };
        Ok(affinity)
    }

    /// "expected `hint`, got class repr" at the current path.
    fn mismatch(&self, code: ErrorCode, validator: &Validator, pith: &Pith) -> Diagnostic {
        let repr = pith.repr(self.max_repr);
        let mut message = format!("expected `{}`, got ", validator.label());
        if !matches!(pith, Pith::None) {
            self.classes.write_name(pith.class_id(), &mut message);
            message.push(' ');
        }
        message.push_str(&repr);

        Diagnostic::error(code)
            .with_message(message)
            .with_path(self.path.clone())
            .with_expected(validator.label())
            .with_found(repr)
    }
}

fn same_kind(pith: &Pith, literal: &Literal) -> bool {
    matches!(
        (pith, literal),
        (Pith::None, Literal::None)
            | (Pith::Bool(_), Literal::Bool(_))
            | (Pith::Int(_), Literal::Int(_))
            | (Pith::Str(_), Literal::Str(_))
            | (Pith::Bytes(_), Literal::Bytes(_))
    )
}
