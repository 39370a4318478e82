//! Funnel controller
//!
//! Owns the active step, feeds events through the pure transition function
//! and executes the resulting effects against the [`Location`] and the
//! subscriber list.

use crate::error::InvalidStepError;
use crate::location::{ListenerId, Location};
use crate::options::FunnelOptions;
use crate::registry::StepRegistry;
use crate::state_machine::{transition, Effect, Event, FunnelContext, FunnelState, SyncConfig};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Observer of accepted step changes
pub type StepListener = Rc<dyn Fn(&str)>;

#[derive(Default)]
struct Subscribers {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(u64, StepListener)>>,
}

impl Subscribers {
    fn add(&self, listener: StepListener) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    /// Deliver `step` until `is_current` reports that a newer transition
    /// has taken over; that transition has already notified everyone.
    fn notify(&self, step: &str, is_current: impl Fn() -> bool) {
        // Snapshot: listeners may subscribe, unsubscribe or set the step
        let listeners: Vec<StepListener> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            if !is_current() {
                break;
            }
            listener(step);
        }
    }

    fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

/// Registration returned by [`FunnelController::subscribe`]
#[must_use = "dropping a Subscription keeps the listener registered; \
              call `unsubscribe` to remove it"]
pub struct Subscription {
    subscribers: Weak<Subscribers>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            subscribers.remove(self.id);
        }
    }
}

struct Shared<L> {
    context: FunnelContext,
    state: RefCell<FunnelState>,
    subscribers: Rc<Subscribers>,
    location: L,
    navigation: Cell<Option<ListenerId>>,
    /// Bumped on every accepted state change
    revision: Cell<u64>,
}

impl<L: Location> Shared<L> {
    fn dispatch(&self, event: Event) -> Result<(), InvalidStepError> {
        let result = {
            let state = self.state.borrow();
            transition(&state, &self.context, event)?
        };
        if result.is_noop() {
            return Ok(());
        }

        tracing::debug!(
            from = %self.state.borrow().current_step,
            to = %result.new_state.current_step,
            "Funnel transition"
        );
        *self.state.borrow_mut() = result.new_state;
        let revision = self.revision.get() + 1;
        self.revision.set(revision);

        // No borrow is held while effects run, so subscribers may re-enter.
        // A re-entrant transition supersedes whatever is left of this one.
        for effect in result.effects {
            if self.revision.get() != revision {
                break;
            }
            self.execute(effect, revision);
        }
        Ok(())
    }

    fn execute(&self, effect: Effect, revision: u64) {
        match effect {
            Effect::WriteQuery { key, step, mode } => {
                tracing::debug!(
                    query_param = %key,
                    step = %step,
                    mode = %mode,
                    "Writing step to URL"
                );
                self.location.set_query_param(&key, &step, mode);
            }
            Effect::Notify { step } => self
                .subscribers
                .notify(&step, || self.revision.get() == revision),
        }
    }

    /// Pull the step back out of the URL after history navigation
    fn reconcile(&self) {
        let Some(sync) = &self.context.sync else {
            return;
        };
        let query_value = self.location.query_param(&sync.query_param);
        if let Err(err) = self.dispatch(Event::navigated(query_value)) {
            tracing::warn!(
                step = %err.attempted_id,
                query_param = %sync.query_param,
                "Ignoring navigation to a step outside the funnel"
            );
        }
    }
}

/// Stateful funnel over a [`StepRegistry`], optionally mirrored into the URL
///
/// Mounting registers a navigation listener when synchronization is
/// configured; [`FunnelController::dispose`] (or dropping the controller)
/// removes it.
pub struct FunnelController<L: Location + 'static> {
    shared: Rc<Shared<L>>,
}

impl<L: Location + 'static> FunnelController<L> {
    pub fn mount(registry: StepRegistry, options: &FunnelOptions, location: L) -> Self {
        let context = FunnelContext::new(registry, options.sync_config());
        let url_step = context
            .sync
            .as_ref()
            .and_then(|sync| location.query_param(&sync.query_param));
        let (state, source) = FunnelState::resolve(
            &context,
            url_step.as_deref(),
            options.initial_step.as_deref(),
        );
        tracing::debug!(step = %state.current_step, source = ?source, "Funnel mounted");

        let shared = Rc::new(Shared {
            context,
            state: RefCell::new(state),
            subscribers: Rc::new(Subscribers::default()),
            location,
            navigation: Cell::new(None),
            revision: Cell::new(0),
        });

        if shared.context.sync.is_some() {
            let weak = Rc::downgrade(&shared);
            let id = shared.location.on_navigation_change(Rc::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.reconcile();
                }
            }));
            shared.navigation.set(Some(id));
        }

        Self { shared }
    }

    pub fn current_step(&self) -> String {
        self.shared.state.borrow().current_step.clone()
    }

    pub fn is_current(&self, id: &str) -> bool {
        self.shared.state.borrow().current_step == id
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.shared.context.registry
    }

    pub fn sync_config(&self) -> Option<&SyncConfig> {
        self.shared.context.sync.as_ref()
    }

    pub fn location(&self) -> &L {
        &self.shared.location
    }

    /// Move to `id`.
    ///
    /// Subscribers are notified before this returns. Setting the step that is
    /// already active succeeds without writing the URL or notifying anyone.
    pub fn set_step(&self, id: &str) -> Result<(), InvalidStepError> {
        self.shared.dispatch(Event::set_step(id)).inspect_err(|err| {
            tracing::warn!(step = %err.attempted_id, "Invalid step");
        })
    }

    pub fn subscribe(&self, listener: impl Fn(&str) + 'static) -> Subscription {
        let id = self.shared.subscribers.add(Rc::new(listener));
        Subscription {
            subscribers: Rc::downgrade(&self.shared.subscribers),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.subscribers.len()
    }

    /// Stop following history navigation. Safe to call more than once.
    pub fn dispose(&self) {
        if let Some(id) = self.shared.navigation.take() {
            self.shared.location.remove_navigation_listener(id);
            tracing::debug!("Funnel navigation listener removed");
        }
    }
}

impl<L: Location + 'static> Drop for FunnelController<L> {
    fn drop(&mut self) {
        self.dispose();
    }
}
