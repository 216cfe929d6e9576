//! Codegen strategies.
//!
//! A [`CodegenFactory`] turns compilation units into artifacts in the
//! state's sink. The driver picks which strategy runs: the configured one
//! for whole-module generation, the fixed default one for the package path.
//!
//! Both shipped strategies share the same lowering rules ([`lower`]) and the
//! same commit step, so they produce identical output for identical input.

mod default;
mod lower;
mod parallel;

pub use default::DefaultCodegenFactory;
pub(crate) use lower::class_name_for_file;
pub use lower::ROOT_CLASS;
pub use parallel::ParallelCodegenFactory;

use rustc_hash::FxHashSet;
use tern_ir::{CompilationUnit, FqName};

use crate::artifact::Artifact;
use crate::error::CodegenError;
use crate::handler::{CompilationErrorHandler, ErrorAction};
use crate::problem::CodegenProblem;
use crate::state::GenerationState;

/// Generates artifacts for compilation units into the state's sink.
pub trait CodegenFactory: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Generate every unit of a module. Called once per `generate`.
    fn generate_module(
        &self,
        state: &mut GenerationState,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError>;

    /// Generate the units of one package.
    fn generate_package(
        &self,
        state: &mut GenerationState,
        package: &FqName,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError>;
}

/// Group units by package, packages in first-appearance order, units in
/// input order within a package.
pub(crate) fn group_by_package(units: &[CompilationUnit]) -> Vec<(FqName, Vec<CompilationUnit>)> {
    let mut groups: Vec<(FqName, Vec<CompilationUnit>)> = Vec::new();
    for unit in units {
        match groups.iter_mut().find(|(package, _)| *package == unit.package) {
            Some((_, members)) => members.push(unit.clone()),
            None => groups.push((unit.package.clone(), vec![unit.clone()])),
        }
    }
    groups
}

/// Append a unit's artifacts to the sink, or report its problem.
///
/// A unit is all-or-nothing: if lowering failed or any of its classes is
/// already in the sink, nothing of it is appended and the handler hears
/// about it exactly once.
pub(crate) fn commit_unit(
    state: &mut GenerationState,
    unit: &CompilationUnit,
    lowered: Result<Vec<Artifact>, CodegenProblem>,
    handler: &mut dyn CompilationErrorHandler,
) -> Result<(), CodegenError> {
    let problem = match lowered {
        Ok(artifacts) => match find_duplicate(state, unit, &artifacts) {
            None => {
                for artifact in artifacts {
                    state.factory_mut().append(artifact)?;
                }
                return Ok(());
            }
            Some(problem) => problem,
        },
        Err(problem) => problem,
    };

    let diagnostic = problem.into_diagnostic();
    tracing::warn!(unit = %unit.path, code = %diagnostic.code, "unit skipped");
    match handler.report_error(unit, diagnostic) {
        ErrorAction::Continue => Ok(()),
        ErrorAction::Abort => Err(CodegenError::Aborted {
            unit: unit.path.clone(),
        }),
    }
}

fn find_duplicate(
    state: &GenerationState,
    unit: &CompilationUnit,
    artifacts: &[Artifact],
) -> Option<CodegenProblem> {
    let mut local = FxHashSet::default();
    for artifact in artifacts {
        let first_unit = if let Some(first) = state.factory().emitted_by(&artifact.internal_name) {
            Some(
                state
                    .files()
                    .iter()
                    .find(|u| u.id == first)
                    .map_or_else(|| format!("{first:?}"), |u| u.path.clone()),
            )
        } else if !local.insert(artifact.internal_name.as_str()) {
            Some(unit.path.clone())
        } else {
            None
        };
        if let Some(first_unit) = first_unit {
            return Some(CodegenProblem::DuplicateClass {
                class: artifact.internal_name.clone(),
                first_unit,
                span: artifact.span,
            });
        }
    }
    None
}
