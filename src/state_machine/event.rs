//! Events that drive the funnel

/// Inputs to [`transition`](super::transition)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Caller asked to move to a step
    SetStep { id: String },

    /// The user navigated through history; carries the configured query
    /// parameter as read from the new URL
    Navigated { query_value: Option<String> },
}

impl Event {
    pub fn set_step(id: impl Into<String>) -> Self {
        Event::SetStep { id: id.into() }
    }

    pub fn navigated(query_value: Option<String>) -> Self {
        Event::Navigated { query_value }
    }
}
