//! Class and object declarations.
//!
//! Declarations live in a single-owner [`DeclArena`] and refer to each other
//! (nested classes) through [`DeclId`] indices. The arena is append-only:
//! once a node is pushed it is never mutated, so every reader sees the same
//! tree for the whole compilation.

mod class;
mod specifier;

use std::fmt;
use std::ops::Index;

pub use class::{ClassKind, ClassOrObject, FunctionDecl, Member, PropertyDecl};
pub use specifier::{DelegationSpecifier, ExprRef, SupertypeClause, TypeRef};

/// Index of a declaration in a [`DeclArena`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        DeclId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// Append-only storage for class/object declarations.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DeclArena {
    decls: Vec<ClassOrObject>,
}

impl DeclArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a declaration, returning its ID.
    ///
    /// # Panics
    /// Panics if the arena exceeds `u32::MAX` declarations.
    pub fn push(&mut self, decl: ClassOrObject) -> DeclId {
        let index = u32::try_from(self.decls.len())
            .unwrap_or_else(|_| panic!("declaration arena exceeded {} entries", u32::MAX));
        self.decls.push(decl);
        DeclId::new(index)
    }

    /// Get a declaration, or `None` for an ID from another arena.
    #[inline]
    pub fn get(&self, id: DeclId) -> Option<&ClassOrObject> {
        self.decls.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

impl Index<DeclId> for DeclArena {
    type Output = ClassOrObject;

    #[inline]
    fn index(&self, id: DeclId) -> &Self::Output {
        &self.decls[id.index()]
    }
}
