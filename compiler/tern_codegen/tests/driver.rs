//! End-to-end tests for the driver entry points.

use std::sync::Arc;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use tern_codegen::{
    compile, generate, generate_for_package, ArtifactKind, CancellationToken, ClassBuilderMode,
    CodegenError, CodegenFactory, CollectingErrorHandler, CompilationErrorHandler,
    ContractViolation, DefaultCodegenFactory, FailFastErrorHandler, GenerationState,
    ParallelCodegenFactory, Phase, PreCompileHook, ScriptWrapperHook,
};
use tern_diagnostic::ErrorCode;
use tern_ir::{
    ClassKind, ClassOrObject, CompilationUnit, DeclArena, DelegationSpecifier, FqName,
    FunctionDecl, Member, PropertyDecl, SharedInterner, Span, SupertypeClause, TopLevel, TypeRef,
    UnitId,
};

type Log = Arc<Mutex<Vec<String>>>;

/// Records every call, then delegates to the default strategy.
struct Recording {
    label: &'static str,
    log: Log,
    /// Cancelled after `generate_module` returns, if set.
    cancel_after: Option<CancellationToken>,
}

impl Recording {
    fn new(label: &'static str, log: &Log) -> Self {
        Recording {
            label,
            log: Arc::clone(log),
            cancel_after: None,
        }
    }

    fn cancelling(mut self, token: &CancellationToken) -> Self {
        self.cancel_after = Some(token.clone());
        self
    }
}

impl CodegenFactory for Recording {
    fn name(&self) -> &'static str {
        self.label
    }

    fn generate_module(
        &self,
        state: &mut GenerationState,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError> {
        let paths: Vec<_> = units.iter().map(|u| u.path.as_str()).collect();
        self.log
            .lock()
            .push(format!("{}:module:{}", self.label, paths.join(",")));
        let result = DefaultCodegenFactory.generate_module(state, units, handler);
        if let Some(token) = &self.cancel_after {
            token.cancel();
        }
        result
    }

    fn generate_package(
        &self,
        state: &mut GenerationState,
        package: &FqName,
        units: &[CompilationUnit],
        handler: &mut dyn CompilationErrorHandler,
    ) -> Result<(), CodegenError> {
        self.log.lock().push(format!(
            "{}:package:{}",
            self.label,
            package.display(state.interner())
        ));
        DefaultCodegenFactory.generate_package(state, package, units, handler)
    }
}

/// Appends its name to the log when run.
struct RecordingHook {
    log: Log,
    cancel: Option<CancellationToken>,
}

impl PreCompileHook for RecordingHook {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn before_compile(&self, state: &mut GenerationState) -> Result<(), CodegenError> {
        self.log.lock().push("hook".to_owned());
        state.add_synthetic_unit("gen/Extra.tn", FqName::root(), Vec::new(), None)?;
        if let Some(token) = &self.cancel {
            token.cancel();
        }
        Ok(())
    }
}

/// Two packages, three units, a bit of everything.
fn sample_state() -> GenerationState {
    tern_codegen::init_tracing();
    let interner = SharedInterner::new();
    let mut arena = DeclArena::new();
    let span = Span::new(0, 1);

    let companion = arena.push(ClassOrObject::new(
        interner.intern("Companion"),
        ClassKind::CompanionObject,
        span,
    ));
    let point = arena.push(
        ClassOrObject::new(interner.intern("Point"), ClassKind::Class, span)
            .with_members([
                Member::Property(PropertyDecl::val(interner.intern("x"), span)),
                Member::Function(FunctionDecl::new(interner.intern("plus"), 1, span)),
                Member::Nested(companion),
            ])
            .with_supertype_clause(SupertypeClause::new(
                vec![DelegationSpecifier::Supertype(TypeRef::new(
                    FqName::parse(&interner, "geo.Shape"),
                    span,
                ))],
                span,
            )),
    );
    let shape = arena.push(ClassOrObject::new(
        interner.intern("Shape"),
        ClassKind::Interface,
        span,
    ));
    let main = FunctionDecl::new(interner.intern("main"), 1, span);

    let geo = FqName::parse(&interner, "geo");
    let app = FqName::parse(&interner, "app");
    let units = vec![
        CompilationUnit::new(UnitId::new(0), "geo/Point.tn", geo.clone())
            .with_declaration(TopLevel::Class(point)),
        CompilationUnit::new(UnitId::new(1), "app/main.tn", app)
            .with_declaration(TopLevel::Function(main)),
        CompilationUnit::new(UnitId::new(2), "geo/Shape.tn", geo)
            .with_declaration(TopLevel::Class(shape)),
    ];
    GenerationState::new(interner, arena, units)
}

fn artifact_names(state: &GenerationState) -> Vec<String> {
    state
        .factory()
        .artifacts()
        .iter()
        .map(|a| a.internal_name.clone())
        .collect()
}

#[test]
fn compile_generates_and_finalizes() {
    let mut state = sample_state();
    let mut handler = CollectingErrorHandler::new();

    assert!(compile(&mut state, &mut handler).is_ok());

    assert_eq!(state.phase(), Phase::Finalized);
    assert!(state.factory().is_done());
    assert!(!handler.has_errors());
    assert_eq!(
        artifact_names(&state),
        vec![
            "geo/Point",
            "geo/Point$Companion",
            "geo/Shape",
            "app/MainKt",
        ]
    );
}

#[test]
fn compile_is_deterministic() {
    let mut first = sample_state();
    let mut second = sample_state();

    assert!(compile(&mut first, &mut CollectingErrorHandler::new()).is_ok());
    assert!(compile(&mut second, &mut CollectingErrorHandler::new()).is_ok());

    assert_eq!(first.factory().artifacts(), second.factory().artifacts());
}

#[test]
fn module_strategy_runs_once_with_all_units() {
    let log = Log::default();
    let mut state = sample_state()
        .with_codegen_factory(Arc::new(Recording::new("configured", &log)))
        .with_hook(RecordingHook {
            log: Arc::clone(&log),
            cancel: None,
        });

    assert!(compile(&mut state, &mut CollectingErrorHandler::new()).is_ok());

    assert_eq!(
        *log.lock(),
        vec![
            "hook".to_owned(),
            "configured:module:geo/Point.tn,app/main.tn,geo/Shape.tn,gen/Extra.tn".to_owned(),
        ]
    );
}

#[test]
fn pre_cancelled_compile_does_nothing() {
    let log = Log::default();
    let token = CancellationToken::new();
    token.cancel();
    let mut state = sample_state()
        .with_codegen_factory(Arc::new(Recording::new("configured", &log)))
        .with_hook(RecordingHook {
            log: Arc::clone(&log),
            cancel: None,
        })
        .with_cancellation(token);

    let result = compile(&mut state, &mut CollectingErrorHandler::new());

    assert!(matches!(result, Err(CodegenError::Cancelled(_))));
    assert!(log.lock().is_empty());
    assert_eq!(state.phase(), Phase::Created);
    assert!(!state.factory().is_done());
}

#[test]
fn cancellation_during_hooks_stops_before_generation() {
    let log = Log::default();
    let token = CancellationToken::new();
    let mut state = sample_state()
        .with_codegen_factory(Arc::new(Recording::new("configured", &log)))
        .with_hook(RecordingHook {
            log: Arc::clone(&log),
            cancel: Some(token.clone()),
        })
        .with_cancellation(token);

    let result = compile(&mut state, &mut CollectingErrorHandler::new());

    assert!(matches!(result, Err(CodegenError::Cancelled(_))));
    assert_eq!(*log.lock(), vec!["hook".to_owned()]);
    assert_eq!(state.phase(), Phase::PreCompiled);
    assert!(state.factory().is_empty());
}

#[test]
fn stub_mode_finalizes_despite_late_cancellation() {
    let log = Log::default();
    let token = CancellationToken::new();
    let mut state = sample_state()
        .with_mode(ClassBuilderMode::Stubs)
        .with_codegen_factory(Arc::new(
            Recording::new("configured", &log).cancelling(&token),
        ))
        .with_cancellation(token.clone());

    assert!(compile(&mut state, &mut CollectingErrorHandler::new()).is_ok());

    assert!(token.is_cancelled());
    assert_eq!(state.phase(), Phase::Finalized);
    assert!(state.factory().is_done());
    assert!(state
        .factory()
        .artifacts()
        .iter()
        .flat_map(|a| &a.members)
        .all(|m| !m.has_body));
}

#[test]
fn full_mode_aborts_before_finalize_on_late_cancellation() {
    let log = Log::default();
    let token = CancellationToken::new();
    let mut state = sample_state()
        .with_codegen_factory(Arc::new(
            Recording::new("configured", &log).cancelling(&token),
        ))
        .with_cancellation(token);

    let result = compile(&mut state, &mut CollectingErrorHandler::new());

    assert!(result.as_ref().is_err_and(CodegenError::is_cancelled));
    assert!(!state.factory().is_done());
    assert_eq!(state.phase(), Phase::Generated);
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn generate_for_package_uses_only_the_default_strategy() {
    let configured = Log::default();
    let default = Log::default();
    let mut state = sample_state()
        .with_codegen_factory(Arc::new(Recording::new("configured", &configured)))
        .with_default_codegen_factory(Arc::new(Recording::new("default", &default)));

    let geo = state.files()[0].package.clone();
    let units: Vec<_> = state
        .files()
        .iter()
        .filter(|u| u.package == geo)
        .cloned()
        .collect();

    let result = generate_for_package(&mut state, &geo, &units, &mut CollectingErrorHandler::new());

    assert!(result.is_ok());
    assert!(configured.lock().is_empty());
    assert_eq!(*default.lock(), vec!["default:package:geo".to_owned()]);
    assert!(!state.factory().is_done());
    assert_eq!(
        artifact_names(&state),
        vec!["geo/Point", "geo/Point$Companion", "geo/Shape"]
    );
}

#[test]
fn generate_for_package_ignores_cancellation() {
    let token = CancellationToken::new();
    token.cancel();
    let mut state = sample_state().with_cancellation(token);
    let units = vec![state.files()[1].clone()];
    let package = units[0].package.clone();

    let result = generate_for_package(&mut state, &package, &units, &mut CollectingErrorHandler::new());

    assert!(result.is_ok());
    assert_eq!(artifact_names(&state), vec!["app/MainKt"]);
}

#[test]
fn second_finalize_is_a_contract_violation() {
    let mut state = sample_state();
    assert!(compile(&mut state, &mut CollectingErrorHandler::new()).is_ok());

    assert_eq!(
        state.factory_mut().done(),
        Err(ContractViolation::SinkAlreadyFinalized)
    );
}

#[test]
fn generation_on_finalized_state_is_rejected() {
    let mut state = sample_state();
    assert!(compile(&mut state, &mut CollectingErrorHandler::new()).is_ok());
    let before = state.factory().len();

    let again = compile(&mut state, &mut CollectingErrorHandler::new());
    assert!(matches!(
        again,
        Err(CodegenError::ContractViolation(ContractViolation::StateFinalized))
    ));

    let units = state.files().to_vec();
    let direct = generate(&units, &mut state, &mut CollectingErrorHandler::new());
    assert!(matches!(
        direct,
        Err(CodegenError::ContractViolation(ContractViolation::StateFinalized))
    ));

    let package = units[0].package.clone();
    let by_package =
        generate_for_package(&mut state, &package, &units, &mut CollectingErrorHandler::new());
    assert!(matches!(
        by_package,
        Err(CodegenError::ContractViolation(ContractViolation::StateFinalized))
    ));

    assert_eq!(state.factory().len(), before);
}

#[test]
fn generate_without_hooks_starts_from_created() {
    let mut state = sample_state().with_hook(ScriptWrapperHook::new());
    let units = state.files().to_vec();

    assert!(generate(&units, &mut state, &mut CollectingErrorHandler::new()).is_ok());
    assert_eq!(state.phase(), Phase::Finalized);
}

fn duplicate_state() -> GenerationState {
    tern_codegen::init_tracing();
    let interner = SharedInterner::new();
    let mut arena = DeclArena::new();
    let first = arena.push(ClassOrObject::new(
        interner.intern("Config"),
        ClassKind::Class,
        Span::new(0, 6),
    ));
    let second = arena.push(ClassOrObject::new(
        interner.intern("Config"),
        ClassKind::Object,
        Span::new(10, 16),
    ));
    let units = vec![
        CompilationUnit::new(UnitId::new(0), "a.tn", FqName::root())
            .with_declaration(TopLevel::Class(first)),
        CompilationUnit::new(UnitId::new(1), "b.tn", FqName::root())
            .with_declaration(TopLevel::Class(second)),
    ];
    GenerationState::new(interner, arena, units)
}

#[test]
fn handler_sees_each_failing_unit_once() {
    let mut state = duplicate_state();
    let mut handler = CollectingErrorHandler::new();

    assert!(compile(&mut state, &mut handler).is_ok());

    assert_eq!(handler.error_count(), 1);
    let reported = &handler.errors()[0];
    assert_eq!(reported.path, "b.tn");
    assert_eq!(reported.diagnostic.code, ErrorCode::E5002);
    assert!(handler.error_guaranteed().is_some());
    assert!(state.factory().is_done());
}

#[test]
fn handler_abort_stops_without_finalizing() {
    let mut state = duplicate_state();
    let mut handler = FailFastErrorHandler::new();

    let result = compile(&mut state, &mut handler);

    assert!(matches!(result, Err(CodegenError::Aborted { ref unit }) if unit == "b.tn"));
    assert!(!state.factory().is_done());
    assert_eq!(
        handler.first_error().map(|e| e.diagnostic.code),
        Some(ErrorCode::E5002)
    );
}

#[test]
fn scripts_are_wrapped_before_generation() {
    tern_codegen::init_tracing();
    let interner = SharedInterner::new();
    let run = FunctionDecl::new(interner.intern("run"), 0, Span::new(0, 3));
    let script = CompilationUnit::new(UnitId::new(0), "tools/deploy.kts", FqName::root())
        .with_declaration(TopLevel::Function(run))
        .script();
    let mut state = GenerationState::new(interner, DeclArena::new(), vec![script])
        .with_hook(ScriptWrapperHook::new());

    assert!(compile(&mut state, &mut CollectingErrorHandler::new()).is_ok());

    let artifacts = state.factory().artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].internal_name, "Deploy");
    assert_eq!(artifacts[0].kind, ArtifactKind::Script);
    assert_eq!(artifacts[0].span, Span::new(0, 3));
    assert_eq!(artifacts[0].members.len(), 1);
}

#[test]
fn parallel_strategy_matches_default() {
    let mut sequential = sample_state();
    let mut parallel = sample_state().with_codegen_factory(Arc::new(ParallelCodegenFactory));

    assert!(compile(&mut sequential, &mut CollectingErrorHandler::new()).is_ok());
    assert!(compile(&mut parallel, &mut CollectingErrorHandler::new()).is_ok());

    assert_eq!(
        parallel.factory().artifacts(),
        sequential.factory().artifacts()
    );
}
