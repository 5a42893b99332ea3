//! Diagnostic system for runtime type-check reporting.
//!
//! Every failure the checker reports, whether a violation at call time or a
//! configuration problem at decoration time, is described by a [`Diagnostic`]:
//! - Error code for searchability
//! - Clear message (what went wrong)
//! - Path from the checked value to the failing sub-value (where)
//! - Expected hint and found value (why)
//! - Notes with surrounding context
//!
//! # Substitution Slot
//!
//! Diagnostics are built before the checker knows which parameter they
//! belong to. [`Diagnostic::render`] fills the site label in afterwards:
//!
//! ```text
//! let text = diagnostic.render("parameter `xs` of `demo.total()`");
//! // parameter `xs` of `demo.total()` at [2]: expected `int`, got str 'x'
//! ```

mod diagnostic;
mod error_code;
mod path;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
pub use path::{PathSegment, PithPath};
