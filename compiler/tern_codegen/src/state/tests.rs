use pretty_assertions::assert_eq;
use tern_ir::{ClassKind, Span};

use super::*;
use crate::hooks::PreCompileHook;

fn empty_state() -> GenerationState {
    let unit = CompilationUnit::new(UnitId::new(4), "a.tn", FqName::root());
    GenerationState::new(SharedInterner::new(), DeclArena::new(), vec![unit])
}

struct SwitchToStubs;

impl PreCompileHook for SwitchToStubs {
    fn name(&self) -> &'static str {
        "switch-to-stubs"
    }

    fn before_compile(&self, state: &mut GenerationState) -> Result<(), CodegenError> {
        state.set_mode(ClassBuilderMode::Stubs)?;
        Ok(())
    }
}

struct Failing;

impl PreCompileHook for Failing {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn before_compile(&self, _state: &mut GenerationState) -> Result<(), CodegenError> {
        Err(CodegenError::Hook {
            hook: self.name(),
            message: "boom".into(),
        })
    }
}

#[test]
fn new_state_defaults() {
    let state = empty_state();
    assert_eq!(state.phase(), Phase::Created);
    assert_eq!(state.mode(), ClassBuilderMode::Full);
    assert_eq!(state.codegen_factory().name(), "default");
    assert_eq!(state.default_codegen_factory().name(), "default");
    assert!(!state.factory().is_done());
}

#[test]
fn hooks_run_and_advance_phase() {
    let mut state = empty_state().with_hook(SwitchToStubs);
    assert!(state.before_compile().is_ok());
    assert_eq!(state.mode(), ClassBuilderMode::Stubs);
    assert_eq!(state.phase(), Phase::PreCompiled);
}

#[test]
fn failing_hook_keeps_state_created() {
    let mut state = empty_state().with_hook(Failing).with_hook(SwitchToStubs);
    let err = state.before_compile();
    assert!(matches!(err, Err(CodegenError::Hook { hook: "failing", .. })));
    assert_eq!(state.phase(), Phase::Created);
    // The second hook never ran.
    assert_eq!(state.mode(), ClassBuilderMode::Full);
}

#[test]
fn before_compile_twice_is_rejected() {
    let mut state = empty_state();
    assert!(state.before_compile().is_ok());
    assert!(matches!(
        state.before_compile(),
        Err(CodegenError::ContractViolation(ContractViolation::PhaseOrder {
            expected: Phase::Created,
            found: Phase::PreCompiled,
        }))
    ));
}

#[test]
fn mutation_after_created_is_rejected() {
    let mut state = empty_state();
    assert!(state.before_compile().is_ok());

    let decl = ClassOrObject::new(state.interner().intern("Late"), ClassKind::Class, Span::DUMMY);
    assert!(state.push_declaration(decl).is_err());
    assert!(state.set_mode(ClassBuilderMode::Stubs).is_err());
    assert!(state
        .add_synthetic_unit("gen.tn", FqName::root(), Vec::new(), None)
        .is_err());
}

#[test]
fn synthetic_units_get_fresh_ids() {
    let mut state = empty_state();
    let id = state.add_synthetic_unit("gen/Extra.tn", FqName::root(), Vec::new(), Some(UnitId::new(4)));
    assert_eq!(id, Ok(UnitId::new(5)));

    let added = &state.files()[1];
    assert_eq!(added.path, "gen/Extra.tn");
    assert_eq!(
        added.origin,
        UnitOrigin::Synthetic {
            from: Some(UnitId::new(4))
        }
    );
}

#[test]
fn replace_unknown_unit_is_rejected() {
    let mut state = empty_state();
    assert_eq!(
        state.replace_unit_declarations(UnitId::new(99), Vec::new()),
        Err(ContractViolation::UnknownUnit(UnitId::new(99)))
    );
}

#[test]
fn phase_transitions() {
    let mut state = empty_state();
    assert!(state.ensure_can_generate().is_ok());

    // Finishing before generation is out of order.
    assert!(state.finish().is_err());

    state.mark_generated();
    assert!(state.ensure_can_generate().is_err());
    assert_eq!(state.finish(), Ok(()));
    assert_eq!(state.phase(), Phase::Finalized);
    assert!(state.factory().is_done());

    assert_eq!(
        state.ensure_can_generate(),
        Err(ContractViolation::StateFinalized)
    );
    assert_eq!(
        state.ensure_not_finalized(),
        Err(ContractViolation::StateFinalized)
    );
}

#[test]
fn debug_shows_summary() {
    let rendered = format!("{:?}", empty_state());
    assert!(rendered.contains("GenerationState"));
    assert!(rendered.contains("phase: Created"));
}
