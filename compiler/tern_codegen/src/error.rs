//! Errors that end a driver call.
//!
//! Per-unit failures are not errors at this level: they go to the
//! [`CompilationErrorHandler`](crate::CompilationErrorHandler) as diagnostics.
//! A [`CodegenError`] means the run as a whole stopped.

use thiserror::Error;
use tern_ir::UnitId;

use crate::cancel::Cancelled;
use crate::state::Phase;

/// A caller broke the backend's usage contract. Always a bug in the caller.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Error)]
pub enum ContractViolation {
    #[error("artifact sink finalized twice")]
    SinkAlreadyFinalized,

    #[error("artifact `{artifact}` appended after the sink was finalized")]
    AppendAfterFinalize { artifact: String },

    #[error("generation requested on a finalized state")]
    StateFinalized,

    #[error("expected generation state in phase `{expected}`, found `{found}`")]
    PhaseOrder { expected: Phase, found: Phase },

    #[error("no compilation unit with id {0:?}")]
    UnknownUnit(UnitId),
}

impl ContractViolation {
    /// Log and return, so violations are visible even when a caller
    /// discards the error.
    #[cold]
    pub(crate) fn raise(self) -> Self {
        tracing::error!(violation = %self, "backend contract violated");
        self
    }
}

/// Why a driver call stopped.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Cancellation observed at a checkpoint.
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),

    /// The error handler asked to stop after a failing unit.
    #[error("code generation aborted after errors in `{unit}`")]
    Aborted { unit: String },

    #[error("pre-compile hook `{hook}` failed: {message}")]
    Hook { hook: &'static str, message: String },
}

impl CodegenError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CodegenError::Cancelled(_))
    }
}
