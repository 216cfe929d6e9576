//! Class/object declaration nodes.

use super::{DeclId, DelegationSpecifier, SupertypeClause};
use crate::{Name, Span};

/// What kind of type a declaration introduces.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ClassKind {
    Class,
    Interface,
    /// `object Foo`
    Object,
    /// `companion object` nested in a class
    CompanionObject,
}

impl ClassKind {
    /// Objects are singletons and get an `INSTANCE` field.
    pub fn is_singleton(self) -> bool {
        matches!(self, ClassKind::Object | ClassKind::CompanionObject)
    }
}

/// A function member or top-level function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDecl {
    pub name: Name,
    /// Number of value parameters.
    pub arity: u32,
    /// `false` for abstract and interface members without a default body.
    pub has_body: bool,
    pub span: Span,
}

impl FunctionDecl {
    pub fn new(name: Name, arity: u32, span: Span) -> Self {
        FunctionDecl {
            name,
            arity,
            has_body: true,
            span,
        }
    }

    #[must_use]
    pub fn without_body(mut self) -> Self {
        self.has_body = false;
        self
    }
}

/// A property member or top-level property.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PropertyDecl {
    pub name: Name,
    /// `var` rather than `val`
    pub is_mutable: bool,
    /// Has an initializer, so it needs a backing field.
    pub has_initializer: bool,
    pub span: Span,
}

impl PropertyDecl {
    /// An immutable property with an initializer: `val x = ...`
    pub fn val(name: Name, span: Span) -> Self {
        PropertyDecl {
            name,
            is_mutable: false,
            has_initializer: true,
            span,
        }
    }

    /// A mutable property with an initializer: `var x = ...`
    pub fn var(name: Name, span: Span) -> Self {
        PropertyDecl {
            is_mutable: true,
            ..Self::val(name, span)
        }
    }

    #[must_use]
    pub fn without_initializer(mut self) -> Self {
        self.has_initializer = false;
        self
    }
}

/// One member of a class body, in source order.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Member {
    Function(FunctionDecl),
    Property(PropertyDecl),
    /// Nested class, object, or companion object.
    Nested(DeclId),
}

impl Member {
    pub fn span(&self) -> Option<Span> {
        match self {
            Member::Function(f) => Some(f.span),
            Member::Property(p) => Some(p.span),
            Member::Nested(_) => None,
        }
    }
}

/// A class, interface, or object declaration.
///
/// ```text
/// class Point(val x: Int) : Shape(), Printable by DefaultPrinter {
///     fun area() = 0
///     object Origin
/// }
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassOrObject {
    pub name: Name,
    pub kind: ClassKind,
    /// Members in source order; this order is the emission order.
    pub members: Vec<Member>,
    /// `None` when no clause was written at all.
    pub supertype_clause: Option<SupertypeClause>,
    pub span: Span,
}

impl ClassOrObject {
    pub fn new(name: Name, kind: ClassKind, span: Span) -> Self {
        ClassOrObject {
            name,
            kind,
            members: Vec::new(),
            supertype_clause: None,
            span,
        }
    }

    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_members(mut self, members: impl IntoIterator<Item = Member>) -> Self {
        self.members.extend(members);
        self
    }

    #[must_use]
    pub fn with_supertype_clause(mut self, clause: SupertypeClause) -> Self {
        self.supertype_clause = Some(clause);
        self
    }

    /// Flattened view of the supertype clause.
    ///
    /// An absent clause and an explicitly empty one both read as `[]`; use
    /// [`supertype_clause`](Self::supertype_clause) when the difference matters.
    pub fn delegation_specifiers(&self) -> &[DelegationSpecifier] {
        match &self.supertype_clause {
            Some(clause) => &clause.specifiers,
            None => &[],
        }
    }

    /// Whether the source wrote a supertype clause, even an empty one.
    pub fn has_explicit_supertype_clause(&self) -> bool {
        self.supertype_clause.is_some()
    }

    /// Nested declarations in member order.
    pub fn nested(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.members.iter().filter_map(|m| match m {
            Member::Nested(id) => Some(*id),
            Member::Function(_) | Member::Property(_) => None,
        })
    }
}
