//! Ordered set of step identifiers a funnel may occupy

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while building a [`StepRegistry`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a funnel needs at least one step")]
    Empty,
    #[error("step `{id}` is declared more than once")]
    Duplicate { id: String },
}

/// Immutable, ordered, non-empty list of unique step ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct StepRegistry {
    steps: Vec<String>,
}

impl StepRegistry {
    pub fn new<I, S>(steps: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        if steps.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen = HashSet::with_capacity(steps.len());
        for step in &steps {
            if !seen.insert(step.as_str()) {
                return Err(RegistryError::Duplicate { id: step.clone() });
            }
        }

        Ok(Self { steps })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.steps.iter().any(|step| step == id)
    }

    /// First declared step, the fallback initial step
    pub fn first(&self) -> &str {
        // Non-empty by construction
        &self.steps[0]
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.steps.iter().position(|step| step == id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[allow(clippy::unused_self)] // Registries are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for StepRegistry {
    type Error = RegistryError;

    fn try_from(steps: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<StepRegistry> for Vec<String> {
    fn from(registry: StepRegistry) -> Self {
        registry.steps
    }
}
