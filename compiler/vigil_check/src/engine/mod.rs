//! Runtime check engine.
//!
//! Evaluates check sites in the order given (declared parameters, then the
//! return) and stops at the first rejection. The success path never builds
//! a label or a diagnostic; both are produced only for the failing site.

use std::fmt;

use vigil_diagnostic::{PathSegment, PithPath};
use vigil_types::{ClassRegistry, Pith};

use crate::error::{VigilError, Violation};
use crate::explain;
use crate::Validator;

/// What a check site checks.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SiteKind<'a> {
    /// A named parameter.
    Parameter {
        callable: &'a str,
        name: &'a str,
        position: usize,
    },
    /// One item passed to a `*args` parameter.
    VariadicItem {
        callable: &'a str,
        name: &'a str,
        index: usize,
    },
    /// One value passed to a `**kwargs` parameter.
    KeywordItem {
        callable: &'a str,
        name: &'a str,
        key: &'a str,
    },
    /// The return value.
    Return { callable: &'a str },
}

impl SiteKind<'_> {
    pub fn is_return(&self) -> bool {
        matches!(self, SiteKind::Return { .. })
    }

    /// Step prepended to the diagnostic path of a variadic item.
    fn path_prefix(&self) -> Option<PathSegment> {
        match self {
            SiteKind::VariadicItem { index, .. } => Some(PathSegment::Index(*index)),
            SiteKind::KeywordItem { key, .. } => Some(PathSegment::Value(format!("'{key}'"))),
            SiteKind::Parameter { .. } | SiteKind::Return { .. } => None,
        }
    }
}

impl fmt::Display for SiteKind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteKind::Parameter { callable, name, .. }
            | SiteKind::VariadicItem { callable, name, .. }
            | SiteKind::KeywordItem { callable, name, .. } => {
                write!(f, "parameter `{name}` of `{callable}()`")
            }
            SiteKind::Return { callable } => write!(f, "return of `{callable}()`"),
        }
    }
}

/// One value to check against one validator.
#[derive(Copy, Clone, Debug)]
pub struct CheckSite<'a> {
    pub kind: SiteKind<'a>,
    pub pith: &'a Pith,
    pub validator: &'a Validator,
}

impl<'a> CheckSite<'a> {
    pub fn new(kind: SiteKind<'a>, pith: &'a Pith, validator: &'a Validator) -> Self {
        CheckSite {
            kind,
            pith,
            validator,
        }
    }
}

/// Check every site in order, failing on the first rejection.
pub(crate) fn run(
    sites: &[CheckSite<'_>],
    classes: &ClassRegistry,
    max_repr: usize,
) -> Result<(), VigilError> {
    for site in sites {
        if !site.validator.accepts(site.pith, classes)? {
            return Err(violation(site, classes, max_repr)?);
        }
    }
    Ok(())
}

#[cold]
fn violation(
    site: &CheckSite<'_>,
    classes: &ClassRegistry,
    max_repr: usize,
) -> Result<VigilError, VigilError> {
    let mut diagnostic = explain::explain(site.pith, site.validator, classes, max_repr)?;
    if let Some(prefix) = site.kind.path_prefix() {
        let mut path = PithPath::root();
        path.push(prefix);
        for segment in diagnostic.path.segments() {
            path.push(segment.clone());
        }
        diagnostic.path = path;
    }

    let violation = Box::new(Violation {
        label: site.kind.to_string(),
        diagnostic,
    });
    tracing::debug!(site = %violation.label, code = %violation.diagnostic.code, "check failed");

    Ok(if site.kind.is_return() {
        VigilError::ReturnViolation(violation)
    } else {
        VigilError::ArgumentViolation(violation)
    })
}
