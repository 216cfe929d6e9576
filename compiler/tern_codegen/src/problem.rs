//! Per-unit codegen problems.
//!
//! Each variant carries what is needed to build a [`Diagnostic`] via
//! [`CodegenProblem::into_diagnostic`]. Strategies report at most one problem
//! per failing unit.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{DeclId, Span};

/// Problem encountered while lowering one compilation unit.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum CodegenProblem {
    /// Two members of one class map to the same emitted signature (E5001).
    ConflictingDeclarations {
        class: String,
        signature: String,
        first: Span,
        second: Span,
    },

    /// A class name was already emitted in this run (E5002).
    DuplicateClass {
        class: String,
        first_unit: String,
        span: Span,
    },

    /// More than one supertype clause entry calls a superclass constructor (E5003).
    MultipleSuperCalls {
        class: String,
        first: Span,
        second: Span,
    },

    /// An interface delegates a supertype to an implementation (E5004).
    InterfaceDelegation { class: String, span: Span },

    /// A unit refers to a declaration the arena does not hold (E9001).
    DanglingDeclaration { id: DeclId },
}

impl CodegenProblem {
    /// Convert this problem into a [`Diagnostic`], consuming `self`.
    #[cold]
    pub fn into_diagnostic(self) -> Diagnostic {
        match self {
            Self::ConflictingDeclarations {
                class,
                signature,
                first,
                second,
            } => Diagnostic::error(ErrorCode::E5001)
                .with_message(format!(
                    "platform declaration clash in `{class}`: `{signature}` is emitted twice"
                ))
                .with_label(second, "this declaration")
                .with_secondary_label(first, "clashes with this declaration"),

            Self::DuplicateClass {
                class,
                first_unit,
                span,
            } => Diagnostic::error(ErrorCode::E5002)
                .with_message(format!("duplicate class name `{class}`"))
                .with_label(span, "declared here")
                .with_note(format!("already emitted from `{first_unit}`")),

            Self::MultipleSuperCalls {
                class,
                first,
                second,
            } => Diagnostic::error(ErrorCode::E5003)
                .with_message(format!(
                    "`{class}` calls more than one superclass constructor"
                ))
                .with_label(second, "second constructor call")
                .with_secondary_label(first, "first constructor call")
                .with_note("this declaration should have been rejected before code generation"),

            Self::InterfaceDelegation { class, span } => Diagnostic::error(ErrorCode::E5004)
                .with_message(format!("interface `{class}` cannot delegate to an implementation"))
                .with_label(span, "delegation here")
                .with_note("interfaces have no fields to hold a delegate"),

            Self::DanglingDeclaration { id } => Diagnostic::error(ErrorCode::E9001)
                .with_message(format!("declaration {id:?} is missing from the arena"))
                .with_note("this is a compiler bug in the stage that produced the declarations"),
        }
    }
}
