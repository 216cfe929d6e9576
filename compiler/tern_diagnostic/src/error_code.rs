//! Error codes for backend diagnostics.

use std::fmt;

/// Error codes for backend diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E5xxx: Codegen errors
/// - E9xxx: Internal compiler errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Codegen Errors (E5xxx)
    /// Two members of one class map to the same emitted signature
    E5001,
    /// A class name was already emitted by another unit
    E5002,
    /// More than one superclass constructor call in a supertype clause
    E5003,
    /// Interface supertype clause delegates to an implementation
    E5004,

    // Internal Errors (E9xxx)
    /// Internal codegen error
    E9001,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E5001 => "E5001",
            ErrorCode::E5002 => "E5002",
            ErrorCode::E5003 => "E5003",
            ErrorCode::E5004 => "E5004",
            ErrorCode::E9001 => "E9001",
        }
    }

    /// One-line summary, as shown by `--explain` listings.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E5001 => "conflicting platform declarations",
            ErrorCode::E5002 => "duplicate class name",
            ErrorCode::E5003 => "multiple superclass constructor calls",
            ErrorCode::E5004 => "delegation in an interface",
            ErrorCode::E9001 => "internal codegen error",
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, ErrorCode::E9001)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
