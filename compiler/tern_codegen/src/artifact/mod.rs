//! Emitted artifacts and the sink that accumulates them.
//!
//! An [`Artifact`] is the class-level shape handed to the external class-file
//! writer: name, supertypes, and members in emission order. Instruction
//! encoding happens downstream and is not modelled here.

use rustc_hash::FxHashMap;
use tern_ir::{Span, UnitId};

use crate::error::ContractViolation;

/// What an artifact represents.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArtifactKind {
    Class,
    Interface,
    /// Singleton object or companion object.
    Object,
    /// File facade holding a unit's top-level functions and properties.
    PackagePart,
    /// Class wrapping a script's top level.
    Script,
}

/// Kind of an emitted member.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    Method { arity: u32 },
    Field,
    Getter,
    Setter,
}

impl MemberKind {
    /// Number of value parameters of the emitted member.
    pub fn arity(self) -> u32 {
        match self {
            MemberKind::Method { arity } => arity,
            MemberKind::Setter => 1,
            MemberKind::Field | MemberKind::Getter => 0,
        }
    }

    pub fn is_callable(self) -> bool {
        match self {
            MemberKind::Method { .. } | MemberKind::Getter | MemberKind::Setter => true,
            MemberKind::Field => false,
        }
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EmittedMember {
    pub name: String,
    pub kind: MemberKind,
    /// Whether a body is emitted; always false outside full mode.
    pub has_body: bool,
}

impl EmittedMember {
    pub fn new(name: impl Into<String>, kind: MemberKind, has_body: bool) -> Self {
        EmittedMember {
            name: name.into(),
            kind,
            has_body,
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name, MemberKind::Field, false)
    }

    /// JVM-style rendering used in diagnostics: `name(arity)` or `name`.
    pub fn signature(&self) -> String {
        if self.kind.is_callable() {
            format!("{}({})", self.name, self.kind.arity())
        } else {
            self.name.clone()
        }
    }
}

/// One emitted class-level artifact.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Artifact {
    /// Slash-separated internal name: `app/model/Point`, `app/model/Point$Origin`.
    pub internal_name: String,
    pub kind: ArtifactKind,
    /// Unit the artifact was generated from.
    pub source: UnitId,
    /// Declaration span, for diagnostics about the artifact.
    pub span: Span,
    /// `None` only for interfaces.
    pub super_class: Option<String>,
    pub interfaces: Vec<String>,
    /// Internal names of directly nested classes, in member order.
    pub inner_classes: Vec<String>,
    /// Members in emission order.
    pub members: Vec<EmittedMember>,
}

impl Artifact {
    pub fn new(internal_name: impl Into<String>, kind: ArtifactKind, source: UnitId) -> Self {
        Artifact {
            internal_name: internal_name.into(),
            kind,
            source,
            span: Span::DUMMY,
            super_class: None,
            interfaces: Vec::new(),
            inner_classes: Vec::new(),
            members: Vec::new(),
        }
    }
}

/// Append-only sink for every artifact of one compilation.
///
/// Finalized exactly once with [`done`](Self::done); appending afterwards or
/// finalizing twice is a [`ContractViolation`].
#[derive(Clone, Debug, Default)]
pub struct ClassFileFactory {
    artifacts: Vec<Artifact>,
    /// Internal name -> unit that emitted it.
    emitted: FxHashMap<String, UnitId>,
    done: bool,
}

impl ClassFileFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, artifact: Artifact) -> Result<(), ContractViolation> {
        if self.done {
            return Err(ContractViolation::AppendAfterFinalize {
                artifact: artifact.internal_name,
            }
            .raise());
        }
        tracing::trace!(artifact = %artifact.internal_name, kind = ?artifact.kind, "emit");
        self.emitted
            .insert(artifact.internal_name.clone(), artifact.source);
        self.artifacts.push(artifact);
        Ok(())
    }

    /// Finalize the sink. Must be called exactly once.
    pub fn done(&mut self) -> Result<(), ContractViolation> {
        if self.done {
            return Err(ContractViolation::SinkAlreadyFinalized.raise());
        }
        self.done = true;
        tracing::debug!(artifacts = self.artifacts.len(), "artifact sink finalized");
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Unit that already emitted `internal_name`, if any.
    pub fn emitted_by(&self, internal_name: &str) -> Option<UnitId> {
        self.emitted.get(internal_name).copied()
    }

    /// All artifacts in emission order.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
