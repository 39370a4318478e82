//! Capability interface over addressable URL and history state
//!
//! The controller never touches ambient browser state directly. It talks to a
//! [`Location`], which production code backs with the platform history API and
//! tests back with [`MemoryHistory`].

mod memory;
pub mod query;

pub use memory::MemoryHistory;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use thiserror::Error;

/// How an internal transition is recorded in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Append a new navigable entry
    #[default]
    Push,
    /// Rewrite the current entry in place
    Replace,
}

impl HistoryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryMode::Push => "push",
            HistoryMode::Replace => "replace",
        }
    }
}

impl fmt::Display for HistoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown history mode `{0}` (expected `push` or `replace`)")]
pub struct ParseHistoryModeError(pub String);

impl FromStr for HistoryMode {
    type Err = ParseHistoryModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "push" => Ok(HistoryMode::Push),
            "replace" => Ok(HistoryMode::Replace),
            _ => Err(ParseHistoryModeError(s.to_string())),
        }
    }
}

/// Handle for a registered navigation listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback fired after the user navigates through history (back/forward)
pub type NavigationListener = Rc<dyn Fn()>;

/// URL and history access, scoped to what the funnel needs
pub trait Location {
    /// Current value of a single query parameter
    fn query_param(&self, key: &str) -> Option<String>;

    /// Write a single query parameter, recording it per `mode`
    fn set_query_param(&self, key: &str, value: &str, mode: HistoryMode);

    /// Observe externally driven navigation (the `popstate` analogue).
    /// Writes made through [`Location::set_query_param`] never fire it.
    fn on_navigation_change(&self, listener: NavigationListener) -> ListenerId;

    fn remove_navigation_listener(&self, id: ListenerId);
}

// ============================================================================
// Rc implementation for shared locations
// ============================================================================

impl<T: Location + ?Sized> Location for Rc<T> {
    fn query_param(&self, key: &str) -> Option<String> {
        (**self).query_param(key)
    }

    fn set_query_param(&self, key: &str, value: &str, mode: HistoryMode) {
        (**self).set_query_param(key, value, mode);
    }

    fn on_navigation_change(&self, listener: NavigationListener) -> ListenerId {
        (**self).on_navigation_change(listener)
    }

    fn remove_navigation_listener(&self, id: ListenerId) {
        (**self).remove_navigation_listener(id);
    }
}
