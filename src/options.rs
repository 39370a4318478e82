//! Funnel configuration

use crate::location::{HistoryMode, ParseHistoryModeError};
use crate::state_machine::SyncConfig;
use serde::{Deserialize, Serialize};

/// Caller-facing options for mounting a funnel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelOptions {
    /// Step to start on when the URL has nothing usable. Defaults to the
    /// first step.
    pub initial_step: Option<String>,
    /// Query parameter to mirror the step into. No URL synchronization when
    /// unset.
    pub query_param: Option<String>,
    pub history_mode: HistoryMode,
}

impl FunnelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `FUNNEL_INITIAL_STEP`, `FUNNEL_QUERY_PARAM` and
    /// `FUNNEL_HISTORY_MODE`
    pub fn from_env() -> Result<Self, ParseHistoryModeError> {
        let history_mode = match non_empty_var("FUNNEL_HISTORY_MODE") {
            Some(mode) => mode.parse()?,
            None => HistoryMode::default(),
        };

        Ok(Self {
            initial_step: non_empty_var("FUNNEL_INITIAL_STEP"),
            query_param: non_empty_var("FUNNEL_QUERY_PARAM"),
            history_mode,
        })
    }

    pub fn with_initial_step(mut self, step: impl Into<String>) -> Self {
        self.initial_step = Some(step.into());
        self
    }

    pub fn with_query_param(mut self, key: impl Into<String>) -> Self {
        self.query_param = Some(key.into());
        self
    }

    pub fn with_history_mode(mut self, mode: HistoryMode) -> Self {
        self.history_mode = mode;
        self
    }

    /// Synchronization settings, if a non-empty query key is configured
    pub fn sync_config(&self) -> Option<SyncConfig> {
        self.query_param
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(|key| SyncConfig {
                query_param: key.to_string(),
                history_mode: self.history_mode,
            })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    non_empty(std::env::var(name).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
