//! Tern Codegen - Backend Driver
//!
//! Orchestrates code generation for a set of resolved compilation units:
//!
//! - [`GenerationState`] owns declarations, units, strategies, the artifact
//!   sink, mode flags, pre-compile hooks, and the cancellation token
//! - [`compile`], [`generate`], [`generate_for_package`] are the entry points
//! - [`CodegenFactory`] strategies turn units into [`Artifact`]s
//! - [`CompilationErrorHandler`] receives per-unit failures as diagnostics
//!
//! # Lifecycle
//!
//! ```text
//! Created --before_compile--> PreCompiled --generate--> Generated --done--> Finalized
//! ```
//!
//! Cancellation is cooperative: the driver checks the token before hooks,
//! after hooks, and (in full mode only) after generation. A cancelled run
//! never finalizes the sink.
//!
//! # Debugging
//!
//! Set `RUST_LOG=tern_codegen=debug` and call [`init_tracing`] to see phase
//! boundaries; `trace` adds one event per emitted artifact.

mod artifact;
mod cancel;
mod driver;
mod error;
mod handler;
mod hooks;
mod mode;
mod problem;
mod state;
mod strategy;

use std::sync::Once;

pub use artifact::{Artifact, ArtifactKind, ClassFileFactory, EmittedMember, MemberKind};
pub use cancel::{CancellationToken, Cancelled};
pub use driver::{compile, generate, generate_for_package};
pub use error::{CodegenError, ContractViolation};
pub use handler::{
    CollectingErrorHandler, CompilationErrorHandler, ErrorAction, FailFastErrorHandler,
    HandlerConfig, ReportedError,
};
pub use hooks::{PreCompileHook, ScriptWrapperHook};
pub use mode::ClassBuilderMode;
pub use problem::CodegenProblem;
pub use state::{GenerationState, Phase};
pub use strategy::{CodegenFactory, DefaultCodegenFactory, ParallelCodegenFactory, ROOT_CLASS};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
