//! Effects produced by state transitions

use crate::location::HistoryMode;

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Mirror the step into the configured query parameter
    WriteQuery {
        key: String,
        step: String,
        mode: HistoryMode,
    },

    /// Tell subscribers the active step changed
    Notify { step: String },
}

impl Effect {
    pub fn write_query(key: &str, step: &str, mode: HistoryMode) -> Self {
        Effect::WriteQuery {
            key: key.to_string(),
            step: step.to_string(),
            mode,
        }
    }

    pub fn notify(step: &str) -> Self {
        Effect::Notify {
            step: step.to_string(),
        }
    }

    pub fn is_url_write(&self) -> bool {
        matches!(self, Effect::WriteQuery { .. })
    }
}
