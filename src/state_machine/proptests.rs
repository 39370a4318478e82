//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::location::HistoryMode;
use crate::registry::StepRegistry;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

const STEPS: [&str; 4] = ["start", "profile", "billing", "done"];

fn registry() -> StepRegistry {
    StepRegistry::new(STEPS).unwrap()
}

fn arb_history_mode() -> impl Strategy<Value = HistoryMode> {
    prop_oneof![Just(HistoryMode::Push), Just(HistoryMode::Replace)]
}

fn arb_context() -> impl Strategy<Value = FunnelContext> {
    proptest::option::of(arb_history_mode()).prop_map(|mode| {
        FunnelContext::new(
            registry(),
            mode.map(|history_mode| SyncConfig {
                query_param: "step".to_string(),
                history_mode,
            }),
        )
    })
}

fn arb_member() -> impl Strategy<Value = String> {
    proptest::sample::select(STEPS.to_vec()).prop_map(String::from)
}

/// Mostly members, sometimes garbage
fn arb_step_id() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => arb_member(),
        1 => "[a-z]{0,8}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_step_id().prop_map(|id| Event::SetStep { id }),
        proptest::option::of(arb_step_id())
            .prop_map(|query_value| Event::Navigated { query_value }),
    ]
}

fn arb_state() -> impl Strategy<Value = FunnelState> {
    arb_member().prop_map(|current_step| FunnelState { current_step })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// The active step is a registry member after any sequence of events
    #[test]
    fn current_step_stays_in_registry(
        context in arb_context(),
        events in proptest::collection::vec(arb_event(), 0..40),
    ) {
        let (mut state, _) = FunnelState::resolve(&context, None, None);
        for event in events {
            if let Ok(result) = transition(&state, &context, event) {
                state = result.new_state;
            }
            prop_assert!(context.registry.contains(&state.current_step));
        }
    }

    /// Unknown ids are rejected, carrying the id that was attempted
    #[test]
    fn rejection_is_total(
        context in arb_context(),
        state in arb_state(),
        id in "[A-Z]{1,6}",
    ) {
        let err = transition(&state, &context, Event::SetStep { id: id.clone() }).unwrap_err();
        prop_assert_eq!(
            err,
            TransitionError::InvalidStep(crate::error::InvalidStepError::new(id))
        );
    }

    /// Setting the current step again does nothing
    #[test]
    fn set_step_is_idempotent(context in arb_context(), state in arb_state()) {
        let result = transition(
            &state,
            &context,
            Event::SetStep { id: state.current_step.clone() },
        ).unwrap();
        prop_assert!(result.is_noop());
        prop_assert_eq!(result.new_state, state);
    }

    /// History navigation never echoes a URL write
    #[test]
    fn navigation_never_writes(
        context in arb_context(),
        state in arb_state(),
        query_value in proptest::option::of(arb_step_id()),
    ) {
        if let Ok(result) = transition(&state, &context, Event::Navigated { query_value }) {
            prop_assert!(!result.effects.iter().any(Effect::is_url_write));
        }
    }

    /// Accepted internal changes write exactly once when synced, and always
    /// notify last with the new step
    #[test]
    fn accepted_change_effects(
        context in arb_context(),
        state in arb_state(),
        target in arb_member(),
    ) {
        prop_assume!(target != state.current_step);
        let result = transition(&state, &context, Event::SetStep { id: target.clone() }).unwrap();

        let writes = result.effects.iter().filter(|e| e.is_url_write()).count();
        prop_assert_eq!(writes, usize::from(context.sync.is_some()));
        prop_assert_eq!(result.effects.last(), Some(&Effect::notify(&target)));
        prop_assert_eq!(result.new_state.current_step, target);
    }

    /// A valid URL value always wins at startup when synced
    #[test]
    fn resolve_prefers_valid_url(
        context in arb_context(),
        url_step in proptest::option::of(arb_step_id()),
        initial in proptest::option::of(arb_step_id()),
    ) {
        let (state, source) =
            FunnelState::resolve(&context, url_step.as_deref(), initial.as_deref());
        prop_assert!(context.registry.contains(&state.current_step));

        let url_valid = url_step.as_deref().is_some_and(|s| context.registry.contains(s));
        if context.sync.is_some() && url_valid {
            prop_assert_eq!(source, InitialSource::Url);
            prop_assert_eq!(Some(state.current_step), url_step);
        } else if initial.as_deref().is_some_and(|s| context.registry.contains(s)) {
            prop_assert_eq!(source, InitialSource::InitialStep);
        } else {
            prop_assert_eq!(state.current_step.as_str(), context.registry.first());
        }
    }
}
