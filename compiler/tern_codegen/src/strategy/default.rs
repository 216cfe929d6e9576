use tern_ir::{CompilationUnit, FqName};

use super::lower::LoweringCx;
use super::{commit_unit, group_by_package, CodegenFactory};
use crate::error::CodegenError;
use crate::handler::CompilationErrorHandler;
use crate::state::GenerationState;

/// Sequential strategy: packages in first-appearance order, units in order.
///
/// Also the fixed strategy of the package path
/// ([`generate_for_package`](crate::generate_for_package)).
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultCodegenFactory;

impl CodegenFactory for DefaultCodegenFactory {
    fn name(&self) -> &'static str {
        "default"
    }

    fn generate_module(
        &self,
        state: &mut GenerationState,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError> {
        for (package, members) in group_by_package(units) {
            self.generate_package(state, &package, &members, handler)?;
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

        for unit in units {
            let lowered = LoweringCx::new(state.arena(), state.interner(), state.mode())
                .lower_unit(unit);
            commit_unit(state, unit, lowered, handler)?;
        }
        Ok(())
    }
}
