//! Core diagnostic type for structured error reporting.
//!
//! Defines [`Diagnostic`] and [`Severity`], the building blocks that the
//! classifier, compiler, check engine and diagnostic walker use to report
//! problems.

use std::fmt;

use crate::{ErrorCode, PithPath};

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic with everything needed to explain one failure.
///
/// For call-time violations `path`, `expected` and `found` pinpoint the
/// innermost sub-value that broke its hint. Compile-time diagnostics leave
/// the path at the root.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main message, without the site label.
    pub message: String,
    /// Path from the checked value to the failing sub-value.
    pub path: PithPath,
    /// Rendering of the sub-hint that was violated.
    pub expected: Option<String>,
    /// Rendering of the sub-value that violated it.
    pub found: Option<String>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            path: PithPath::root(),
            expected: None,
            found: None,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Set the path to the failing sub-value.
    pub fn with_path(mut self, path: PithPath) -> Self {
        self.path = path;
        self
    }

    /// Record the violated sub-hint.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Record the violating sub-value.
    pub fn with_found(mut self, found: impl Into<String>) -> Self {
        self.found = Some(found.into());
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Fill the site-label slot and produce the final one-line message.
    ///
    /// `label` names the checked site, e.g. ``parameter `xs` of `demo.f()` ``.
    pub fn render(&self, label: &str) -> String {
        let mut out = String::with_capacity(label.len() + self.message.len() + 16);
        out.push_str(label);
        if !self.path.is_root() {
            out.push_str(" at ");
            out.push_str(&self.path.to_string());
        }
        out.push_str(": ");
        out.push_str(&self.message);
        for note in &self.notes {
            out.push_str("; ");
            out.push_str(note);
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)?;

        if !self.path.is_root() {
            write!(f, "\n  --> {}", self.path)?;
        }
        if let Some(ref expected) = self.expected {
            write!(f, "\n  = expected: {expected}")?;
        }
        if let Some(ref found) = self.found {
            write!(f, "\n  = found: {found}")?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}
