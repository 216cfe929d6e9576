//! Tern IR - Declaration Model
//!
//! The backend's read-only view of a resolved program:
//! - Names for interned identifiers, `FqName` for package and class paths
//! - Spans for diagnostic locations
//! - `DeclArena` holding class/object declarations, addressed by `DeclId`
//! - `CompilationUnit`s wrapping one source file's top-level declarations
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)`
//! - **Flatten Everything**: nested declarations are `DeclId` indices, not boxes
//! - **Closed Variants**: `DelegationSpecifier` and `Member` are sum types;
//!   every consumer matches them exhaustively
//!
//! Declarations are produced once by the resolution stage and only read here.

mod decl;
mod fq_name;
mod interner;
mod name;
mod span;
mod unit;

pub use decl::{
    ClassKind, ClassOrObject, DeclArena, DeclId, DelegationSpecifier, ExprRef, FunctionDecl,
    Member, PropertyDecl, SupertypeClause, TypeRef,
};
pub use fq_name::FqName;
pub use interner::{SharedInterner, StringInterner};
pub use name::Name;
pub use span::Span;
pub use unit::{CompilationUnit, TopLevel, UnitId, UnitOrigin};
