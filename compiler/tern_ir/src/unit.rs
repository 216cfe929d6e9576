//! Compilation units: one source file's top-level declarations.

use std::fmt;

use crate::{DeclId, FqName, FunctionDecl, PropertyDecl};

/// Identity of a compilation unit within one compilation run.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct UnitId(u32);

impl UnitId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        UnitId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnitId({})", self.0)
    }
}

/// A top-level declaration of a source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TopLevel {
    Class(DeclId),
    Function(FunctionDecl),
    Property(PropertyDecl),
}

/// Where a unit came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum UnitOrigin {
    /// Parsed from a source file.
    #[default]
    Source,
    /// Injected by a pre-compile hook, optionally derived from another unit.
    Synthetic { from: Option<UnitId> },
}

/// One source file after parsing and resolution.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CompilationUnit {
    pub id: UnitId,
    /// Path as given to the compiler, used for diagnostics and file-facade names.
    pub path: String,
    pub package: FqName,
    /// Top-level declarations in source order.
    pub declarations: Vec<TopLevel>,
    /// Script files get their top level wrapped into a class before codegen.
    pub is_script: bool,
    pub origin: UnitOrigin,
}

impl CompilationUnit {
    pub fn new(id: UnitId, path: impl Into<String>, package: FqName) -> Self {
        CompilationUnit {
            id,
            path: path.into(),
            package,
            declarations: Vec::new(),
            is_script: false,
            origin: UnitOrigin::Source,
        }
    }

    #[must_use]
    pub fn with_declaration(mut self, declaration: TopLevel) -> Self {
        self.declarations.push(declaration);
        self
    }

    #[must_use]
    pub fn with_declarations(mut self, declarations: impl IntoIterator<Item = TopLevel>) -> Self {
        self.declarations.extend(declarations);
        self
    }

    #[must_use]
    pub fn script(mut self) -> Self {
        self.is_script = true;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, origin: UnitOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// File name without directories or extension: `src/app/Main.kts` -> `Main`.
    pub fn file_stem(&self) -> &str {
        let file = self
            .path
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.path.as_str());
        match file.find('.') {
            Some(0) | None => file,
            Some(dot) => &file[..dot],
        }
    }

    /// Top-level class declarations in source order.
    pub fn classes(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.declarations.iter().filter_map(|d| match d {
            TopLevel::Class(id) => Some(*id),
            TopLevel::Function(_) | TopLevel::Property(_) => None,
        })
    }

    /// Whether the file declares top-level functions or properties, which
    /// live in a file facade class.
    pub fn has_top_level_callables(&self) -> bool {
        self.declarations.iter().any(|d| match d {
            TopLevel::Function(_) | TopLevel::Property(_) => true,
            TopLevel::Class(_) => false,
        })
    }
}
