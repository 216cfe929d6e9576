//! Diagnostics for backend failures.
//!
//! Every per-unit codegen failure reaches the error handler as a
//! [`Diagnostic`]:
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary span (where it went wrong)
//! - Notes (why it's wrong)
//!
//! # Error Guarantees
//!
//! [`ErrorGuaranteed`] is type-level proof that at least one error was
//! reported. Only code that actually counted reported errors can produce one.

mod diagnostic;
mod error_code;
mod guarantee;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
pub use guarantee::ErrorGuaranteed;
