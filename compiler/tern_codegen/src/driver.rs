//! Compilation driver entry points.
//!
//! ```text
//! compile:  checkpoint -> hooks -> checkpoint -> generate
//! generate: strategy.generate_module -> [checkpoint if full mode] -> sink.done
//! ```
//!
//! The driver never inspects individual declarations and never retries.
//! Per-unit failures reach the caller through the error handler; a returned
//! error means the run stopped.

use tern_ir::{CompilationUnit, FqName};

use crate::error::CodegenError;
use crate::handler::CompilationErrorHandler;
use crate::state::GenerationState;

/// Compile every unit of `state`: run pre-compile hooks, generate, finalize.
///
/// Returns `Err(Cancelled)` without touching the sink if cancellation is
/// observed before generation, or after generation in full mode.
pub fn compile(
    state: &mut GenerationState,
    handler: &mut dyn CompilationErrorHandler,
) -> Result<(), CodegenError> {
    let _span = tracing::debug_span!("compile", mode = %state.mode()).entered();

    state.check_canceled()?;
    state.ensure_can_generate()?;
    state.before_compile()?;
    tracing::debug!(units = state.files().len(), "pre-compile hooks done");
    state.check_canceled()?;

    // Hooks may have added or rewritten units.
    let units = state.files().to_vec();
    generate(&units, state, handler)
}

/// Generate `units` with the state's configured strategy, then finalize.
///
/// The strategy is called exactly once with the whole unit set. The
/// post-generation checkpoint is skipped outside full mode: light classes
/// and stubs are cheap, and their consumers expect a finalized sink.
pub fn generate(
    units: &[CompilationUnit],
    state: &mut GenerationState,
    handler: &mut dyn CompilationErrorHandler,
) -> Result<(), CodegenError> {
    state.ensure_can_generate()?;

    let strategy = state.codegen_factory();
    tracing::debug!(strategy = strategy.name(), units = units.len(), "generating module");
    strategy.generate_module(state, units, handler)?;
    state.mark_generated();

    if state.mode().generate_bodies() {
        state.check_canceled()?;
    }

    state.finish()?;
    tracing::debug!(artifacts = state.factory().len(), "generation finished");
    Ok(())
}

/// Generate one package's units with the state's default strategy.
///
/// This path ignores the configured strategy, does not finalize the sink
/// and has no cancellation checkpoint. It serves incremental regeneration,
/// where the caller owns finalization.
pub fn generate_for_package(
    state: &mut GenerationState,
    package: &FqName,
    units: &[CompilationUnit],
    handler: &mut dyn CompilationErrorHandler,
) -> Result<(), CodegenError> {
    state.ensure_not_finalized()?;

    let strategy = state.default_codegen_factory();
    let _span = tracing::debug_span!(
        "generate_for_package",
        package = %package.display(state.interner()),
        strategy = strategy.name()
    )
    .entered();

    strategy.generate_package(state, package, units, handler)
}
