//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! result. URL writes and subscriber notifications are returned as effects
//! for the controller to execute.

use super::{Effect, Event, FunnelContext, FunnelState};
use crate::error::InvalidStepError;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: FunnelState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: FunnelState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// Stay where we are with nothing to do
    pub fn unchanged(state: &FunnelState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    InvalidStep(#[from] InvalidStepError),
}

impl From<TransitionError> for InvalidStepError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidStep(inner) => inner,
        }
    }
}

/// Pure transition function
///
/// Internal transitions (`SetStep`) write the URL; history navigation
/// (`Navigated`) never does, since the browser already owns that entry.
pub fn transition(
    state: &FunnelState,
    context: &FunnelContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        Event::SetStep { id } => {
            if !context.registry.contains(&id) {
                return Err(InvalidStepError::new(id).into());
            }
            if id == state.current_step {
                return Ok(TransitionResult::unchanged(state));
            }

            let write = context
                .sync
                .as_ref()
                .map(|sync| Effect::write_query(&sync.query_param, &id, sync.history_mode));

            Ok(TransitionResult::new(FunnelState {
                current_step: id.clone(),
            })
            .with_effects(write)
            .with_effect(Effect::Notify { step: id }))
        }

        // Synchronization off: history belongs to somebody else
        Event::Navigated { .. } if context.sync.is_none() => Ok(TransitionResult::unchanged(state)),

        // Missing parameter means no override, not an error
        Event::Navigated { query_value: None } => Ok(TransitionResult::unchanged(state)),

        Event::Navigated {
            query_value: Some(id),
        } => {
            if id.is_empty() || id == state.current_step {
                return Ok(TransitionResult::unchanged(state));
            }
            if !context.registry.contains(&id) {
                return Err(InvalidStepError::new(id).into());
            }

            Ok(TransitionResult::new(FunnelState {
                current_step: id.clone(),
            })
            .with_effect(Effect::Notify { step: id }))
        }
    }
}
