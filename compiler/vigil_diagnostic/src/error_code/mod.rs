//! Error codes for all checker diagnostics.
//!
//! Each error code is a unique identifier (e.g., `V3001`) with the first digit
//! indicating the phase that produced it.

use std::fmt;

/// Error codes for all checker diagnostics.
///
/// Format: V#### where first digit indicates phase:
/// - V1xxx: Classification errors
/// - V2xxx: Compile (decoration-time) errors
/// - V3xxx: Call-time violations
/// - V9xxx: Internal checker errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorCode {
    // Classification Errors (V1xxx)
    /// Hint shape not recognized
    V1001,

    // Compile Errors (V2xxx)
    /// Self-contradictory signature (duplicate or reserved parameter names)
    V2001,
    /// Malformed forward reference name
    V2002,
    /// Forward reference names nothing the resolver knows
    V2003,

    // Call-time Violations (V3xxx)
    /// Value is not an instance of the expected class
    V3001,
    /// Fixed-length tuple has the wrong number of items
    V3002,
    /// Value equals no member of a literal set
    V3003,
    /// Value is not invocable with the expected arity
    V3004,
    /// Value matched no member of a union
    V3005,
    /// Value satisfies neither the bound nor a constraint of a type variable
    V3006,

    // Internal Errors (V9xxx)
    /// Cycle placeholder was never filled
    V9001,
    /// Diagnostic walker found no failure for a rejected value
    V9002,
    /// Lazy forward reference outlived its session
    V9003,
}

impl ErrorCode {
    /// All error codes, in declaration order.
    pub const ALL: &[ErrorCode] = &[
        ErrorCode::V1001,
        ErrorCode::V2001,
        ErrorCode::V2002,
        ErrorCode::V2003,
        ErrorCode::V3001,
        ErrorCode::V3002,
        ErrorCode::V3003,
        ErrorCode::V3004,
        ErrorCode::V3005,
        ErrorCode::V3006,
        ErrorCode::V9001,
        ErrorCode::V9002,
        ErrorCode::V9003,
    ];

    /// Get the code as a string (e.g., "V3001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::V1001 => "V1001",
            ErrorCode::V2001 => "V2001",
            ErrorCode::V2002 => "V2002",
            ErrorCode::V2003 => "V2003",
            ErrorCode::V3001 => "V3001",
            ErrorCode::V3002 => "V3002",
            ErrorCode::V3003 => "V3003",
            ErrorCode::V3004 => "V3004",
            ErrorCode::V3005 => "V3005",
            ErrorCode::V3006 => "V3006",
            ErrorCode::V9001 => "V9001",
            ErrorCode::V9002 => "V9002",
            ErrorCode::V9003 => "V9003",
        }
    }

    /// Short human-readable summary of what the code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::V1001 => "unsupported type hint",
            ErrorCode::V2001 => "invalid signature",
            ErrorCode::V2002 => "malformed forward reference",
            ErrorCode::V2003 => "unresolved forward reference",
            ErrorCode::V3001 => "type mismatch",
            ErrorCode::V3002 => "length mismatch",
            ErrorCode::V3003 => "literal mismatch",
            ErrorCode::V3004 => "not invocable",
            ErrorCode::V3005 => "no union member matched",
            ErrorCode::V3006 => "type variable not satisfied",
            ErrorCode::V9001 => "unfilled cycle placeholder",
            ErrorCode::V9002 => "diagnostic desynchronization",
            ErrorCode::V9003 => "detached lazy reference",
        }
    }

    /// Check if this is a classification error.
    pub fn is_classification_error(&self) -> bool {
        matches!(self, ErrorCode::V1001)
    }

    /// Check if this is a compile-time (decoration-time) error.
    pub fn is_compile_error(&self) -> bool {
        matches!(self, ErrorCode::V2001 | ErrorCode::V2002 | ErrorCode::V2003)
    }

    /// Check if this is a call-time violation.
    pub fn is_call_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::V3001
                | ErrorCode::V3002
                | ErrorCode::V3003
                | ErrorCode::V3004
                | ErrorCode::V3005
                | ErrorCode::V3006
        )
    }

    /// Check if this is an internal checker error.
    pub fn is_internal_error(&self) -> bool {
        matches!(self, ErrorCode::V9001 | ErrorCode::V9002 | ErrorCode::V9003)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parse an error code string like `"V3001"`.
///
/// Case-insensitive. Derived from [`ErrorCode::ALL`] and [`ErrorCode::as_str()`].
impl std::str::FromStr for ErrorCode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_uppercase();
        Self::ALL
            .iter()
            .find(|code| code.as_str() == upper)
            .copied()
            .ok_or(())
    }
}
