//! Supertype clauses and delegation specifiers.
//!
//! ```text
//! class Impl : Base(1, 2), Named, Printer by printer
//!              ^^^^^^^^^^  ^^^^^  ^^^^^^^^^^^^^^^^^^
//!              SuperCall   Supertype  DelegatedBy
//! ```

use crate::{FqName, Span};

/// A resolved reference to a supertype.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeRef {
    pub fq_name: FqName,
    pub span: Span,
}

impl TypeRef {
    pub fn new(fq_name: FqName, span: Span) -> Self {
        TypeRef { fq_name, span }
    }
}

/// Opaque handle to a resolved expression owned by the upstream stage.
///
/// The backend never looks inside; it only hands the handle to the
/// instruction encoder when initializing a delegate field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprRef(pub u32);

/// One entry of a supertype clause.
///
/// This is a closed set. Consumers match it exhaustively, so adding a
/// variant breaks every emission site at compile time.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DelegationSpecifier {
    /// Plain supertype reference: `: Named`
    Supertype(TypeRef),
    /// Supertype with constructor-call arguments: `: Base(1, 2)`
    SuperCall {
        ty: TypeRef,
        /// Number of constructor arguments.
        args: u32,
    },
    /// Interface implementation forwarded to a held value: `: Printer by printer`
    DelegatedBy { ty: TypeRef, delegate: ExprRef },
}

impl DelegationSpecifier {
    /// The referenced supertype, whatever the specifier kind.
    pub fn type_ref(&self) -> &TypeRef {
        match self {
            DelegationSpecifier::Supertype(ty)
            | DelegationSpecifier::SuperCall { ty, .. }
            | DelegationSpecifier::DelegatedBy { ty, .. } => ty,
        }
    }

    pub fn span(&self) -> Span {
        self.type_ref().span
    }
}

/// An explicitly written supertype clause.
///
/// A declaration without any clause stores `None` instead of an empty
/// `SupertypeClause`; the two states are kept apart on purpose.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SupertypeClause {
    pub specifiers: Vec<DelegationSpecifier>,
    pub span: Span,
}

impl SupertypeClause {
    pub fn new(specifiers: Vec<DelegationSpecifier>, span: Span) -> Self {
        SupertypeClause { specifiers, span }
    }

    /// A clause that was written but lists nothing.
    pub fn empty(span: Span) -> Self {
        SupertypeClause {
            specifiers: Vec::new(),
            span,
        }
    }

    pub fn len(&self) -> usize {
        self.specifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }
}
