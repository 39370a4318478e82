//! Step funnel - a named-step navigation flow with URL synchronization
//!
//! A [`FunnelController`] tracks which step of a [`StepRegistry`] is active,
//! rejects unknown steps, and can mirror the active step into one query
//! parameter of a [`Location`], following history navigation back into
//! state without writing the URL again.

pub mod controller;
pub mod error;
pub mod location;
pub mod options;
pub mod registry;
pub mod state_machine;
pub mod view;

pub use controller::{FunnelController, StepListener, Subscription};
pub use error::InvalidStepError;
pub use location::{HistoryMode, ListenerId, Location, MemoryHistory, NavigationListener};
pub use options::FunnelOptions;
pub use registry::{RegistryError, StepRegistry};
pub use view::StepSwitch;
