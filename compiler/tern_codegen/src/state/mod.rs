//! Generation context for one compilation run.
//!
//! [`GenerationState`] owns everything a run needs: declarations, units,
//! strategies, the artifact sink, mode, hooks, and the cancellation token.
//! It moves through [`Phase`]s strictly forward:
//!
//! ```text
//! Created -> PreCompiled -> Generated -> Finalized
//! ```
//!
//! Hooks may mutate the state only while it is `Created`. Once the sink is
//! finalized the state is read-only.

use std::fmt;
use std::sync::Arc;

use tern_ir::{
    ClassOrObject, CompilationUnit, DeclArena, DeclId, FqName, SharedInterner, TopLevel, UnitId,
    UnitOrigin,
};

use crate::artifact::ClassFileFactory;
use crate::cancel::{CancellationToken, Cancelled};
use crate::error::{CodegenError, ContractViolation};
use crate::hooks::PreCompileHook;
use crate::mode::ClassBuilderMode;
use crate::strategy::{CodegenFactory, DefaultCodegenFactory};

/// Lifecycle phase of a [`GenerationState`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Created,
    PreCompiled,
    Generated,
    Finalized,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Created => "created",
            Phase::PreCompiled => "precompiled",
            Phase::Generated => "generated",
            Phase::Finalized => "finalized",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct GenerationState {
    interner: SharedInterner,
    arena: DeclArena,
    files: Vec<CompilationUnit>,
    /// Strategy used by `compile`/`generate`.
    codegen_factory: Arc<dyn CodegenFactory>,
    /// Strategy used by `generate_for_package`, whatever is configured above.
    default_codegen_factory: Arc<dyn CodegenFactory>,
    factory: ClassFileFactory,
    mode: ClassBuilderMode,
    hooks: Vec<Box<dyn PreCompileHook>>,
    cancellation: CancellationToken,
    phase: Phase,
}

impl GenerationState {
    /// A fresh state in [`Phase::Created`], using the default strategy and
    /// full mode.
    pub fn new(interner: SharedInterner, arena: DeclArena, files: Vec<CompilationUnit>) -> Self {
        GenerationState {
            interner,
            arena,
            files,
            codegen_factory: Arc::new(DefaultCodegenFactory),
            default_codegen_factory: Arc::new(DefaultCodegenFactory),
            factory: ClassFileFactory::new(),
            mode: ClassBuilderMode::Full,
            hooks: Vec::new(),
            cancellation: CancellationToken::new(),
            phase: Phase::Created,
        }
    }

    #[must_use]
    pub fn with_codegen_factory(mut self, factory: Arc<dyn CodegenFactory>) -> Self {
        self.codegen_factory = factory;
        self
    }

    /// Replace the package-path strategy. Production code keeps
    /// [`DefaultCodegenFactory`]; tests inject recorders here.
    #[must_use]
    pub fn with_default_codegen_factory(mut self, factory: Arc<dyn CodegenFactory>) -> Self {
        self.default_codegen_factory = factory;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ClassBuilderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Register a pre-compile hook. Hooks run in registration order.
    #[must_use]
    pub fn with_hook(mut self, hook: impl PreCompileHook + 'static) -> Self {
        self.hooks.push(Box::new(hook));
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    // Accessors

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn arena(&self) -> &DeclArena {
        &self.arena
    }

    /// Current unit set, including synthetic units added by hooks.
    pub fn files(&self) -> &[CompilationUnit] {
        &self.files
    }

    pub fn mode(&self) -> ClassBuilderMode {
        self.mode
    }

    pub fn codegen_factory(&self) -> Arc<dyn CodegenFactory> {
        Arc::clone(&self.codegen_factory)
    }

    pub fn default_codegen_factory(&self) -> Arc<dyn CodegenFactory> {
        Arc::clone(&self.default_codegen_factory)
    }

    pub fn factory(&self) -> &ClassFileFactory {
        &self.factory
    }

    /// Direct sink access for strategies. Finalizing through this handle
    /// outside the driver leaves the phase untouched; a later `compile`
    /// then fails on the second `done`.
    pub fn factory_mut(&mut self) -> &mut ClassFileFactory {
        &mut self.factory
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn check_canceled(&self) -> Result<(), Cancelled> {
        self.cancellation.check_canceled()
    }

    // Hook-time mutation

    fn ensure_created(&self) -> Result<(), ContractViolation> {
        if self.phase == Phase::Created {
            Ok(())
        } else {
            Err(ContractViolation::PhaseOrder {
                expected: Phase::Created,
                found: self.phase,
            }
            .raise())
        }
    }

    /// Add a declaration to the arena.
    pub fn push_declaration(&mut self, decl: ClassOrObject) -> Result<DeclId, ContractViolation> {
        self.ensure_created()?;
        Ok(self.arena.push(decl))
    }

    /// Append a synthetic unit; ids continue after the highest existing one.
    pub fn add_synthetic_unit(
        &mut self,
        path: impl Into<String>,
        package: FqName,
        declarations: Vec<TopLevel>,
        from: Option<UnitId>,
    ) -> Result<UnitId, ContractViolation> {
        self.ensure_created()?;
        let next = self
            .files
            .iter()
            .map(|u| u.id.raw() + 1)
            .max()
            .unwrap_or(0);
        let id = UnitId::new(next);
        let unit = CompilationUnit::new(id, path, package)
            .with_declarations(declarations)
            .with_origin(UnitOrigin::Synthetic { from });
        tracing::debug!(unit = %unit.path, ?id, "synthetic unit added");
        self.files.push(unit);
        Ok(id)
    }

    /// Replace a unit's top-level declarations.
    pub fn replace_unit_declarations(
        &mut self,
        unit: UnitId,
        declarations: Vec<TopLevel>,
    ) -> Result<(), ContractViolation> {
        self.ensure_created()?;
        let Some(target) = self.files.iter_mut().find(|u| u.id == unit) else {
            return Err(ContractViolation::UnknownUnit(unit).raise());
        };
        target.declarations = declarations;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: ClassBuilderMode) -> Result<(), ContractViolation> {
        self.ensure_created()?;
        self.mode = mode;
        Ok(())
    }

    /// Run the pre-compile hooks in order, then move to `PreCompiled`.
    pub fn before_compile(&mut self) -> Result<(), CodegenError> {
        self.ensure_created()?;
        let hooks = std::mem::take(&mut self.hooks);
        let mut result = Ok(());
        for hook in &hooks {
            tracing::debug!(hook = hook.name(), "running pre-compile hook");
            result = hook.before_compile(self);
            if result.is_err() {
                break;
            }
        }
        self.hooks = hooks;
        result?;
        self.phase = Phase::PreCompiled;
        Ok(())
    }

    // Driver bookkeeping

    /// `generate` may start from `Created` (no hooks run) or `PreCompiled`.
    pub(crate) fn ensure_can_generate(&self) -> Result<(), ContractViolation> {
        match self.phase {
            Phase::Created | Phase::PreCompiled => Ok(()),
            Phase::Finalized => Err(ContractViolation::StateFinalized.raise()),
            Phase::Generated => Err(ContractViolation::PhaseOrder {
                expected: Phase::PreCompiled,
                found: Phase::Generated,
            }
            .raise()),
        }
    }

    pub(crate) fn ensure_not_finalized(&self) -> Result<(), ContractViolation> {
        if self.phase == Phase::Finalized || self.factory.is_done() {
            return Err(ContractViolation::StateFinalized.raise());
        }
        Ok(())
    }

    pub(crate) fn mark_generated(&mut self) {
        self.phase = Phase::Generated;
    }

    /// Finalize the sink and the state.
    pub(crate) fn finish(&mut self) -> Result<(), ContractViolation> {
        if self.phase != Phase::Generated {
            return Err(ContractViolation::PhaseOrder {
                expected: Phase::Generated,
                found: self.phase,
            }
            .raise());
        }
        self.factory.done()?;
        self.phase = Phase::Finalized;
        Ok(())
    }
}

impl fmt::Debug for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationState")
            .field("files", &self.files.len())
            .field("declarations", &self.arena.len())
            .field("codegen_factory", &self.codegen_factory.name())
            .field("default_codegen_factory", &self.default_codegen_factory.name())
            .field("mode", &self.mode)
            .field("hooks", &self.hooks.len())
            .field("artifacts", &self.factory.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
