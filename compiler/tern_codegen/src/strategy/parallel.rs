use rayon::prelude::*;
use tern_ir::{CompilationUnit, FqName};

use super::lower::LoweringCx;
use super::{commit_unit, group_by_package, CodegenFactory};
use crate::artifact::Artifact;
use crate::error::CodegenError;
use crate::handler::CompilationErrorHandler;
use crate::problem::CodegenProblem;
use crate::state::GenerationState;

type Lowered = Result<Vec<Artifact>, CodegenProblem>;

/// Lowers packages on the rayon pool, then commits them in package
/// first-appearance order.
///
/// Lowering only reads the state, so workers share it immutably; the sink
/// and the handler are touched after the join, on the calling thread.
/// Output and reports are identical to [`DefaultCodegenFactory`](super::DefaultCodegenFactory).
#[derive(Copy, Clone, Debug, Default)]
pub struct ParallelCodegenFactory;

impl ParallelCodegenFactory {
    fn lower_all(state: &GenerationState, units: &[CompilationUnit]) -> Vec<Lowered> {
        let cx = LoweringCx::new(state.arena(), state.interner(), state.mode());
        units.par_iter().map(|unit| cx.lower_unit(unit)).collect()
    }

    fn commit_all(
        state: &mut GenerationState,
        units: &[CompilationUnit],
        lowered: Vec<Lowered>,
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError> {
        for (unit, result) in units.iter().zip(lowered) {
            commit_unit(state, unit, result, handler)?;
        }
        Ok(())
    }
}

impl CodegenFactory for ParallelCodegenFactory {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn generate_module(
        &self,
        state: &mut GenerationState,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError> {
        let groups = group_by_package(units);
        tracing::debug!(
            packages = groups.len(),
            threads = rayon::current_num_threads(),
            "parallel lowering"
        );

        let batches: Vec<Vec<Lowered>> = {
            let shared: &GenerationState = state;
            groups
                .par_iter()
                .map(|(_, members)| Self::lower_all(shared, members))
                .collect()
        };

        for ((_, members), lowered) in groups.iter().zip(batches) {
            Self::commit_all(state, members, lowered, handler)?;
        }
        Ok(())
    }

    fn generate_package(
        &self,
        state: &mut GenerationState,
        package: &FqName,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError> {
        let _span = tracing::debug_span!(
            "generate_package",
            package = %package.display(state.interner()),
            units = units.len()
        )
        .entered();

        let lowered = Self::lower_all(state, units);
        Self::commit_all(state, units, lowered, handler)
    }
}
