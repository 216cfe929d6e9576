//! Lowering of one compilation unit to artifacts.
//!
//! Pure with respect to the generation state: reads declarations, returns
//! the unit's artifacts or the first problem found. Strategies decide what
//! to do with either.

use rustc_hash::FxHashMap;
use tern_ir::{
    ClassKind, ClassOrObject, CompilationUnit, DeclArena, DeclId, DelegationSpecifier,
    FunctionDecl, Member, PropertyDecl, Span, StringInterner, TopLevel,
};

use crate::artifact::{Artifact, ArtifactKind, EmittedMember, MemberKind};
use crate::mode::ClassBuilderMode;
use crate::problem::CodegenProblem;

/// Implicit superclass of every class without a superclass call.
pub const ROOT_CLASS: &str = "tern/Any";

/// Suffix of file facade classes: `util.tn` -> `UtilKt`.
const FACADE_SUFFIX: &str = "Kt";

const INSTANCE_FIELD: &str = "INSTANCE";
const DELEGATE_FIELD_PREFIX: &str = "$$delegate_";

/// Minimum stack space to keep available while walking nested classes.
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Read-only context for lowering units.
#[derive(Copy, Clone)]
pub(crate) struct LoweringCx<'a> {
    pub arena: &'a DeclArena,
    pub interner: &'a StringInterner,
    pub mode: ClassBuilderMode,
}

impl<'a> LoweringCx<'a> {
    pub(crate) fn new(
        arena: &'a DeclArena,
        interner: &'a StringInterner,
        mode: ClassBuilderMode,
    ) -> Self {
        LoweringCx {
            arena,
            interner,
            mode,
        }
    }

    /// All artifacts of `unit`, depth-first in declaration order.
    ///
    /// The file facade (if the unit has top-level callables) comes first.
    pub(crate) fn lower_unit(&self, unit: &CompilationUnit) -> Result<Vec<Artifact>, CodegenProblem> {
        let package = unit.package.internal_name(self.interner);
        let mut out = Vec::new();

        if unit.has_top_level_callables() {
            out.push(self.lower_facade(unit, &package)?);
        }

        // Only a wrapped script (one class, nothing else at top level) is a
        // script artifact; an unwrapped script lowers like a regular file.
        let wrapped_script = unit.is_script
            && matches!(unit.declarations.as_slice(), [TopLevel::Class(_)]);
        let top_kind = if wrapped_script {
            Some(ArtifactKind::Script)
        } else {
            None
        };
        for id in unit.classes() {
            let decl = self.decl(id)?;
            let name = qualify(&package, self.interner.lookup(decl.name));
            self.lower_class(unit, id, name, top_kind, &mut out)?;
        }
        Ok(out)
    }

    fn decl(&self, id: DeclId) -> Result<&'a ClassOrObject, CodegenProblem> {
        self.arena
            .get(id)
            .ok_or(CodegenProblem::DanglingDeclaration { id })
    }

    fn lower_facade(&self, unit: &CompilationUnit, package: &str) -> Result<Artifact, CodegenProblem> {
        let name = qualify(
            package,
            &format!("{}{FACADE_SUFFIX}", class_name_for_file(unit.file_stem())),
        );
        let mut members = Members::new(&name);
        for decl in &unit.declarations {
            match decl {
                TopLevel::Function(f) => self.lower_function(&mut members, f)?,
                TopLevel::Property(p) => self.lower_property(&mut members, p, false)?,
                TopLevel::Class(_) => {}
            }
        }

        let members = members.finish();
        let mut artifact = Artifact::new(name, ArtifactKind::PackagePart, unit.id);
        artifact.super_class = Some(ROOT_CLASS.to_owned());
        artifact.members = members;
        Ok(artifact)
    }

    fn lower_class(
        &self,
        unit: &CompilationUnit,
        id: DeclId,
        name: String,
        kind_override: Option<ArtifactKind>,
        out: &mut Vec<Artifact>,
    ) -> Result<(), CodegenProblem> {
        stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, || {
            let decl = self.decl(id)?;
            let is_interface = decl.kind == ClassKind::Interface;
            let kind = kind_override.unwrap_or(match decl.kind {
                ClassKind::Class => ArtifactKind::Class,
                ClassKind::Interface => ArtifactKind::Interface,
                ClassKind::Object | ClassKind::CompanionObject => ArtifactKind::Object,
            });

            let mut members = Members::new(&name);
            if decl.kind.is_singleton() {
                members.push(EmittedMember::field(INSTANCE_FIELD), decl.span)?;
            }

            let mut artifact = Artifact::new(name.clone(), kind, unit.id);
            artifact.span = decl.span;

            // Supertype clause, in specifier order.
            let mut super_call: Option<Span> = None;
            let mut delegates = 0u32;
            for specifier in decl.delegation_specifiers() {
                let ty = specifier.type_ref().fq_name.internal_name(self.interner);
                match specifier {
                    DelegationSpecifier::SuperCall { .. } if is_interface => {
                        artifact.interfaces.push(ty);
                    }
                    DelegationSpecifier::SuperCall { ty: type_ref, .. } => {
                        if let Some(first) = super_call {
                            return Err(CodegenProblem::MultipleSuperCalls {
                                class: name.clone(),
                                first,
                                second: type_ref.span,
                            });
                        }
                        super_call = Some(type_ref.span);
                        artifact.super_class = Some(ty);
                    }
                    DelegationSpecifier::Supertype(_) => {
                        artifact.interfaces.push(ty);
                    }
                    DelegationSpecifier::DelegatedBy { ty: type_ref, .. } if is_interface => {
                        return Err(CodegenProblem::InterfaceDelegation {
                            class: name.clone(),
                            span: type_ref.span,
                        });
                    }
                    DelegationSpecifier::DelegatedBy { ty: type_ref, .. } => {
                        artifact.interfaces.push(ty);
                        members.push(
                            EmittedMember::field(format!("{DELEGATE_FIELD_PREFIX}{delegates}")),
                            type_ref.span,
                        )?;
                        delegates += 1;
                    }
                }
            }
            if !is_interface && artifact.super_class.is_none() {
                artifact.super_class = Some(ROOT_CLASS.to_owned());
            }

            for member in &decl.members {
                match member {
                    Member::Function(f) => self.lower_function(&mut members, f)?,
                    Member::Property(p) => self.lower_property(&mut members, p, is_interface)?,
                    Member::Nested(_) => {}
                }
            }

            let mut nested = Vec::new();
            for inner in decl.nested() {
                let inner_name = format!("{name}${}", self.interner.lookup(self.decl(inner)?.name));
                artifact.inner_classes.push(inner_name.clone());
                nested.push((inner, inner_name));
            }
            artifact.members = members.finish();
            out.push(artifact);

            for (inner, inner_name) in nested {
                self.lower_class(unit, inner, inner_name, None, out)?;
            }
            Ok(())
        })
    }

    fn lower_function(&self, members: &mut Members<'_>, f: &FunctionDecl) -> Result<(), CodegenProblem> {
        let has_body = f.has_body && self.mode.generate_bodies();
        members.push(
            EmittedMember::new(
                self.interner.lookup(f.name),
                MemberKind::Method { arity: f.arity },
                has_body,
            ),
            f.span,
        )
    }

    fn lower_property(
        &self,
        members: &mut Members<'_>,
        p: &PropertyDecl,
        in_interface: bool,
    ) -> Result<(), CodegenProblem> {
        let name = self.interner.lookup(p.name);
        let accessor_bodies = !in_interface && self.mode.generate_bodies();

        if p.has_initializer && !in_interface {
            members.push(EmittedMember::field(name), p.span)?;
        }
        let capitalized = capitalize(name);
        members.push(
            EmittedMember::new(format!("get{capitalized}"), MemberKind::Getter, accessor_bodies),
            p.span,
        )?;
        if p.is_mutable {
            members.push(
                EmittedMember::new(format!("set{capitalized}"), MemberKind::Setter, accessor_bodies),
                p.span,
            )?;
        }
        Ok(())
    }
}

/// Members of one artifact under construction, with clash detection on the
/// emitted signature.
struct Members<'c> {
    class: &'c str,
    members: Vec<EmittedMember>,
    seen: FxHashMap<String, Span>,
}

impl<'c> Members<'c> {
    fn new(class: &'c str) -> Self {
        Members {
            class,
            members: Vec::new(),
            seen: FxHashMap::default(),
        }
    }

    fn push(&mut self, member: EmittedMember, span: Span) -> Result<(), CodegenProblem> {
        let signature = member.signature();
        if let Some(&first) = self.seen.get(&signature) {
            return Err(CodegenProblem::ConflictingDeclarations {
                class: self.class.to_owned(),
                signature,
                first,
                second: span,
            });
        }
        self.seen.insert(signature, span);
        self.members.push(member);
        Ok(())
    }

    fn finish(self) -> Vec<EmittedMember> {
        self.members
    }
}

/// `app/model` + `Point` -> `app/model/Point`; the root package adds no prefix.
fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_owned()
    } else {
        format!("{package}/{name}")
    }
}

/// Class name derived from a file stem: capitalized, with every character
/// that cannot appear in an identifier replaced by `_`.
///
/// `build-logic` -> `Build_logic`, `2fa` -> `_2fa`.
pub(crate) fn class_name_for_file(stem: &str) -> String {
    let mut name: String = capitalize(stem)
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
