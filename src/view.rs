//! Step-to-view selection for rendering adapters
//!
//! A renderer registers one view per step name and asks for the active one
//! whenever the controller notifies it. Views for unknown names are kept but
//! simply never selected.

use crate::controller::FunnelController;
use crate::location::Location;

/// Named views, at most one of which is active
#[derive(Debug, Clone)]
pub struct StepSwitch<V> {
    views: Vec<(String, V)>,
}

impl<V> Default for StepSwitch<V> {
    fn default() -> Self {
        Self { views: Vec::new() }
    }
}

impl<V> StepSwitch<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(mut self, name: impl Into<String>, view: V) -> Self {
        self.insert(name, view);
        self
    }

    /// Register `view` under `name`, replacing any earlier view for it
    pub fn insert(&mut self, name: impl Into<String>, view: V) {
        let name = name.into();
        match self.views.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = view,
            None => self.views.push((name, view)),
        }
    }

    pub fn active(&self, current_step: &str) -> Option<&V> {
        self.views
            .iter()
            .find(|(name, _)| name == current_step)
            .map(|(_, view)| view)
    }

    pub fn active_for<L: Location + 'static>(
        &self,
        controller: &FunnelController<L>,
    ) -> Option<&V> {
        self.active(&controller.current_step())
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}
