//! Error taxonomy.
//!
//! Every failure is a [`VigilError`], partitioned by the phase that raised
//! it and by who has to act on it:
//!
//! | Variant | Phase | Audience |
//! |---|---|---|
//! | `UnsupportedHint` | classification / compile | integrator |
//! | `InvalidSignature` | compile | integrator |
//! | `ArgumentViolation` | call | caller |
//! | `ReturnViolation` | call | caller |
//! | `InternalInvariant` | any | maintainer |
//!
//! `InternalInvariant` means the checker itself is broken. It is logged at
//! `error` level when raised and must never be treated as "no check
//! performed".

use std::fmt;
use vigil_diagnostic::{Diagnostic, ErrorCode};

/// Phase that raised an error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Classification,
    Compile,
    Call,
    Any,
}

/// Who has to act on an error.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Audience {
    /// Whoever wrote the hints or configured the checker.
    Integrator,
    /// Whoever passed the offending value.
    Caller,
    /// The checker's own maintainers.
    Maintainer,
}

/// A call-time check failure, with the diagnostic that explains it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// The checked site, e.g. ``parameter `xs` of `demo.total()` ``.
    pub label: String,
    /// Where and why the value failed.
    pub diagnostic: Diagnostic,
}

impl Violation {
    /// The one-line message with the site label filled in.
    pub fn message(&self) -> String {
        self.diagnostic.render(&self.label)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// A broken checker invariant.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InternalInvariant {
    #[error("cycle placeholder for `{hint}` was never filled")]
    UnfilledPlaceholder { hint: String },
    #[error("`{hint}` rejected {value} but no failing component was found")]
    DiagnosticDesync { hint: String, value: String },
    #[error("forward reference `{name}` outlived the checker that compiled it")]
    DetachedSession { name: String },
}

impl InternalInvariant {
    pub fn code(&self) -> ErrorCode {
        match self {
            InternalInvariant::UnfilledPlaceholder { .. } => ErrorCode::V9001,
            InternalInvariant::DiagnosticDesync { .. } => ErrorCode::V9002,
            InternalInvariant::DetachedSession { .. } => ErrorCode::V9003,
        }
    }
}

/// Every error the checker raises.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VigilError {
    /// A hint the checker cannot validate, or a forward reference nothing
    /// resolves to.
    #[error("unsupported type hint `{hint}`{}: {reason}", in_callable(.callable))]
    UnsupportedHint {
        code: ErrorCode,
        hint: String,
        reason: String,
        callable: Option<String>,
    },

    /// Self-contradictory declared hints.
    #[error("invalid signature{}: {reason}", in_callable(.callable))]
    InvalidSignature {
        code: ErrorCode,
        reason: String,
        callable: Option<String>,
    },

    #[error("{0}")]
    ArgumentViolation(Box<Violation>),

    #[error("{0}")]
    ReturnViolation(Box<Violation>),

    #[error("internal checker invariant broken: {0}")]
    InternalInvariant(InternalInvariant),
}

fn in_callable(callable: &Option<String>) -> String {
    match callable {
        Some(name) => format!(" in `{name}()`"),
        None => String::new(),
    }
}

impl VigilError {
    /// Raise an internal invariant failure, logging it.
    #[cold]
    pub(crate) fn internal(invariant: InternalInvariant) -> Self {
        tracing::error!(code = %invariant.code(), "{invariant}");
        VigilError::InternalInvariant(invariant)
    }

    #[cold]
    pub(crate) fn unsupported(code: ErrorCode, hint: String, reason: String) -> Self {
        VigilError::UnsupportedHint {
            code,
            hint,
            reason,
            callable: None,
        }
    }

    #[cold]
    pub(crate) fn invalid_signature(code: ErrorCode, reason: String) -> Self {
        VigilError::InvalidSignature {
            code,
            reason,
            callable: None,
        }
    }

    /// Attach the callable a compile-time error was raised for.
    #[must_use]
    pub fn with_callable(mut self, name: &str) -> Self {
        match &mut self {
            VigilError::UnsupportedHint { callable, .. }
            | VigilError::InvalidSignature { callable, .. } => {
                if callable.is_none() {
                    *callable = Some(name.to_string());
                }
            }
            _ => {}
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            VigilError::UnsupportedHint { code, .. } | VigilError::InvalidSignature { code, .. } => {
                *code
            }
            VigilError::ArgumentViolation(violation) | VigilError::ReturnViolation(violation) => {
                violation.diagnostic.code
            }
            VigilError::InternalInvariant(invariant) => invariant.code(),
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            VigilError::UnsupportedHint { code, .. } if code.is_classification_error() => {
                Phase::Classification
            }
            VigilError::UnsupportedHint { .. } | VigilError::InvalidSignature { .. } => {
                Phase::Compile
            }
            VigilError::ArgumentViolation(_) | VigilError::ReturnViolation(_) => Phase::Call,
            VigilError::InternalInvariant(_) => Phase::Any,
        }
    }

    pub fn audience(&self) -> Audience {
        match self {
            VigilError::UnsupportedHint { .. } | VigilError::InvalidSignature { .. } => {
                Audience::Integrator
            }
            VigilError::ArgumentViolation(_) | VigilError::ReturnViolation(_) => Audience::Caller,
            VigilError::InternalInvariant(_) => Audience::Maintainer,
        }
    }

    /// Check if this is a call-time violation.
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            VigilError::ArgumentViolation(_) | VigilError::ReturnViolation(_)
        )
    }

    /// The violation, for call-time errors.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            VigilError::ArgumentViolation(violation) | VigilError::ReturnViolation(violation) => {
                Some(violation)
            }
            _ => None,
        }
    }

    /// Convert to a structured diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            VigilError::UnsupportedHint { code, hint, .. } => Diagnostic::error(*code)
                .with_message(self.to_string())
                .with_expected(hint.clone()),
            VigilError::InvalidSignature { code, .. } => {
                Diagnostic::error(*code).with_message(self.to_string())
            }
            VigilError::ArgumentViolation(violation) | VigilError::ReturnViolation(violation) => {
                violation.diagnostic.clone()
            }
            VigilError::InternalInvariant(invariant) => Diagnostic::error(invariant.code())
                .with_message(invariant.to_string())
                .with_note("this is a bug in vigil, not in the checked code"),
        }
    }
}
