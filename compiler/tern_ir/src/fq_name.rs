//! Fully qualified names for packages and classes.

use crate::{Name, StringInterner};

/// A dotted path such as `org.example.model`, stored as interned segments.
///
/// The root package has no segments.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct FqName {
    segments: Vec<Name>,
}

impl FqName {
    /// The root (unnamed) package.
    pub fn root() -> Self {
        FqName::default()
    }

    pub fn from_segments(segments: Vec<Name>) -> Self {
        FqName { segments }
    }

    /// Intern every segment of a dotted path. Empty segments are dropped,
    /// so `""` parses to the root package.
    pub fn parse(interner: &StringInterner, dotted: &str) -> Self {
        let segments = dotted
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| interner.intern(s))
            .collect();
        FqName { segments }
    }

    #[must_use]
    pub fn child(&self, name: Name) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(name);
        FqName { segments }
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(FqName {
            segments: init.to_vec(),
        })
    }

    /// Last segment, or `None` for the root.
    pub fn short_name(&self) -> Option<Name> {
        self.segments.last().copied()
    }

    pub fn segments(&self) -> &[Name] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Render as `a.b.c`.
    pub fn display(&self, interner: &StringInterner) -> String {
        self.join(interner, '.')
    }

    /// Render as the slash-separated internal form `a/b/c`.
    pub fn internal_name(&self, interner: &StringInterner) -> String {
        self.join(interner, '/')
    }

    fn join(&self, interner: &StringInterner, separator: char) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(separator);
            }
            out.push_str(interner.lookup(*segment));
        }
        out
    }
}
