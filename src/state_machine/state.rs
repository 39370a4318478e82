//! Funnel state and the context it is validated against

use crate::location::HistoryMode;
use crate::registry::StepRegistry;
use serde::{Deserialize, Serialize};

/// URL synchronization settings, present only when a query key is configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    pub query_param: String,
    #[serde(default)]
    pub history_mode: HistoryMode,
}

/// Immutable inputs shared by every transition
#[derive(Debug, Clone)]
pub struct FunnelContext {
    pub registry: StepRegistry,
    pub sync: Option<SyncConfig>,
}

impl FunnelContext {
    pub fn new(registry: StepRegistry, sync: Option<SyncConfig>) -> Self {
        Self { registry, sync }
    }
}

/// Where the initial step came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialSource {
    Url,
    InitialStep,
    FirstStep,
}

/// The active step. Always a member of the context's registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelState {
    pub current_step: String,
}

impl FunnelState {
    /// Resolve the starting step: a valid URL value wins, then a valid
    /// caller-supplied initial step, then the first registered step.
    ///
    /// `url_step` is ignored when synchronization is not configured.
    pub fn resolve(
        context: &FunnelContext,
        url_step: Option<&str>,
        initial_step: Option<&str>,
    ) -> (Self, InitialSource) {
        let registry = &context.registry;

        if context.sync.is_some() {
            if let Some(step) = url_step.filter(|step| registry.contains(step)) {
                return (Self::at(step), InitialSource::Url);
            }
        }

        match initial_step {
            Some(step) if registry.contains(step) => (Self::at(step), InitialSource::InitialStep),
            Some(step) => {
                tracing::warn!(step = %step, "Ignoring initial step outside the funnel");
                (Self::at(registry.first()), InitialSource::FirstStep)
            }
            None => (Self::at(registry.first()), InitialSource::FirstStep),
        }
    }

    fn at(step: &str) -> Self {
        Self {
            current_step: step.to_string(),
        }
    }
}
