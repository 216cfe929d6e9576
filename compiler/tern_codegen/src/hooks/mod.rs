//! Pre-compile hooks.
//!
//! Hooks run once, in registration order, before any unit is generated.
//! They may add declarations and synthetic units, rewrite a unit's top
//! level, or change the mode. See [`GenerationState::before_compile`].

use tern_ir::{
    ClassKind, ClassOrObject, DelegationSpecifier, FqName, Member, Span, SupertypeClause,
    TopLevel, TypeRef,
};

use crate::error::CodegenError;
use crate::state::GenerationState;
use crate::strategy::class_name_for_file;

pub trait PreCompileHook: Send + Sync {
    /// Short name for logs and error messages.
    fn name(&self) -> &'static str;

    fn before_compile(&self, state: &mut GenerationState) -> Result<(), CodegenError>;
}

/// Wraps each script unit's top level into one class named after the file.
///
/// `src/Build.kts` holding `fun run()` and `val target` becomes a unit with a
/// single class `Build` whose members are `run` and `target`. Top-level
/// classes of the script become nested classes of the wrapper.
#[derive(Clone, Debug, Default)]
pub struct ScriptWrapperHook {
    base_class: Option<FqName>,
}

impl ScriptWrapperHook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every wrapper call `base(args)` as its superclass constructor.
    #[must_use]
    pub fn with_base_class(mut self, base: FqName) -> Self {
        self.base_class = Some(base);
        self
    }
}

impl PreCompileHook for ScriptWrapperHook {
    fn name(&self) -> &'static str {
        "script-wrapper"
    }

    fn before_compile(&self, state: &mut GenerationState) -> Result<(), CodegenError> {
        let scripts: Vec<_> = state
            .files()
            .iter()
            .filter(|u| u.is_script)
            .map(|u| (u.id, u.file_stem().to_owned(), u.declarations.clone()))
            .collect();

        for (unit, stem, declarations) in scripts {
            let class_name = class_name_for_file(&stem);
            if class_name.is_empty() {
                return Err(CodegenError::Hook {
                    hook: self.name(),
                    message: format!("script {unit:?} has no usable file name"),
                });
            }

            let members: Vec<Member> = declarations
                .iter()
                .map(|decl| match decl {
                    TopLevel::Class(id) => Member::Nested(*id),
                    TopLevel::Function(f) => Member::Function(*f),
                    TopLevel::Property(p) => Member::Property(*p),
                })
                .collect();
            // Nested classes carry no span of their own here; the wrapper
            // covers the script's top-level callables.
            let span = members
                .iter()
                .filter_map(Member::span)
                .reduce(Span::merge)
                .unwrap_or(Span::DUMMY);
            let name = state.interner().intern(&class_name);
            let mut wrapper =
                ClassOrObject::new(name, ClassKind::Class, span).with_members(members);
            if let Some(base) = &self.base_class {
                wrapper = wrapper.with_supertype_clause(SupertypeClause::new(
                    vec![DelegationSpecifier::SuperCall {
                        ty: TypeRef::new(base.clone(), Span::DUMMY),
                        args: 1,
                    }],
                    Span::DUMMY,
                ));
            }

            let id = state.push_declaration(wrapper)?;
            state.replace_unit_declarations(unit, vec![TopLevel::Class(id)])?;
            tracing::debug!(?unit, class = %class_name, "script wrapped");
        }
        Ok(())
    }
}
