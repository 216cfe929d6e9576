//! Error handler capability.
//!
//! Strategies report a failing unit through [`CompilationErrorHandler`]
//! exactly once and skip that unit's artifacts. The handler decides whether
//! the run continues.

use tern_diagnostic::{Diagnostic, ErrorGuaranteed};
use tern_ir::{CompilationUnit, UnitId};

/// What the strategy should do after a report.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorAction {
    Continue,
    Abort,
}

/// Receives per-unit generation failures.
pub trait CompilationErrorHandler {
    fn report_error(&mut self, unit: &CompilationUnit, diagnostic: Diagnostic) -> ErrorAction;
}

/// One recorded report.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ReportedError {
    pub unit: UnitId,
    pub path: String,
    pub diagnostic: Diagnostic,
}

/// Handler configuration.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct HandlerConfig {
    /// Abort once this many errors were reported (0 = unlimited).
    pub error_limit: usize,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        HandlerConfig { error_limit: 10 }
    }
}

impl HandlerConfig {
    /// Never abort, whatever the error count.
    pub fn unlimited() -> Self {
        HandlerConfig { error_limit: 0 }
    }

    #[must_use]
    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = limit;
        self
    }

    fn limit_reached(&self, count: usize) -> bool {
        self.error_limit > 0 && count >= self.error_limit
    }
}

/// Records every report; aborts when the configured limit is reached.
#[derive(Clone, Debug, Default)]
pub struct CollectingErrorHandler {
    errors: Vec<ReportedError>,
    config: HandlerConfig,
}

impl CollectingErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HandlerConfig) -> Self {
        CollectingErrorHandler {
            errors: Vec::new(),
            config,
        }
    }

    pub fn errors(&self) -> &[ReportedError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Proof that something was reported, if anything was.
    pub fn error_guaranteed(&self) -> Option<ErrorGuaranteed> {
        ErrorGuaranteed::from_error_count(self.errors.len())
    }

    pub fn into_errors(self) -> Vec<ReportedError> {
        self.errors
    }
}

impl CompilationErrorHandler for CollectingErrorHandler {
    fn report_error(&mut self, unit: &CompilationUnit, diagnostic: Diagnostic) -> ErrorAction {
        tracing::warn!(
            unit = %unit.path,
            code = %diagnostic.code,
            "{}",
            diagnostic.message
        );
        self.errors.push(ReportedError {
            unit: unit.id,
            path: unit.path.clone(),
            diagnostic,
        });
        if self.config.limit_reached(self.errors.len()) {
            tracing::debug!(limit = self.config.error_limit, "error limit reached");
            ErrorAction::Abort
        } else {
            ErrorAction::Continue
        }
    }
}

/// Aborts on the first report, keeping it for inspection.
#[derive(Clone, Debug, Default)]
pub struct FailFastErrorHandler {
    first: Option<ReportedError>,
}

impl FailFastErrorHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_error(&self) -> Option<&ReportedError> {
        self.first.as_ref()
    }
}

impl CompilationErrorHandler for FailFastErrorHandler {
    fn report_error(&mut self, unit: &CompilationUnit, diagnostic: Diagnostic) -> ErrorAction {
        if self.first.is_none() {
            self.first = Some(ReportedError {
                unit: unit.id,
                path: unit.path.clone(),
                diagnostic,
            });
        }
        ErrorAction::Abort
    }
}
