//! Funnel error types

use thiserror::Error;

/// A step id that is not declared in the funnel
///
/// Never fatal: the funnel stays on its last valid step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid step: {attempted_id}")]
pub struct InvalidStepError {
    pub attempted_id: String,
}

impl InvalidStepError {
    pub fn new(attempted_id: impl Into<String>) -> Self {
        Self {
            attempted_id: attempted_id.into(),
        }
    }
}
