//! In-memory history stack implementing [`Location`]

use super::{query, HistoryMode, ListenerId, Location, NavigationListener};
use std::cell::{Cell, RefCell};
use url::Url;

/// Browser-like history kept in memory
///
/// Entries behave like `window.history`: pushing truncates any forward
/// entries, replacing rewrites the current one, and only `back`/`forward`/`go`
/// notify navigation listeners.
pub struct MemoryHistory {
    entries: RefCell<Vec<Url>>,
    index: Cell<usize>,
    listeners: RefCell<Vec<(ListenerId, NavigationListener)>>,
    next_listener_id: Cell<u64>,
}

impl MemoryHistory {
    pub fn new(url: Url) -> Self {
        Self {
            entries: RefCell::new(vec![url]),
            index: Cell::new(0),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
        }
    }

    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(url)?))
    }

    pub fn current_url(&self) -> Url {
        self.entries.borrow()[self.index.get()].clone()
    }

    /// Number of entries in the stack
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[allow(clippy::unused_self)] // The initial entry is never removed
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Position of the current entry
    pub fn index(&self) -> usize {
        self.index.get()
    }

    pub fn push_url(&self, url: Url) {
        let mut entries = self.entries.borrow_mut();
        let index = self.index.get();
        entries.truncate(index + 1);
        entries.push(url);
        self.index.set(index + 1);
    }

    pub fn replace_url(&self, url: Url) {
        self.entries.borrow_mut()[self.index.get()] = url;
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries through history and notify listeners.
    /// Out-of-range moves are ignored and return `false`.
    pub fn go(&self, delta: isize) -> bool {
        let Some(target) = self.index.get().checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= self.len() {
            return false;
        }

        self.index.set(target);
        tracing::debug!(index = target, url = %self.current_url(), "History navigation");

        // Snapshot so listeners can register, remove or navigate re-entrantly
        let listeners: Vec<NavigationListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Location for MemoryHistory {
    fn query_param(&self, key: &str) -> Option<String> {
        query::param(&self.entries.borrow()[self.index.get()], key)
    }

    fn set_query_param(&self, key: &str, value: &str, mode: HistoryMode) {
        let mut url = self.current_url();
        query::set_param(&mut url, key, value);
        match mode {
            HistoryMode::Push => self.push_url(url),
            HistoryMode::Replace => self.replace_url(url),
        }
    }

    fn on_navigation_change(&self, listener: NavigationListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    fn remove_navigation_listener(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn history() -> MemoryHistory {
        MemoryHistory::parse("http://localhost/signup?ref=mail").unwrap()
    }

    #[test]
    fn push_grows_and_truncates_forward_entries() {
        let h = history();
        h.set_query_param("step", "a", HistoryMode::Push);
        h.set_query_param("step", "b", HistoryMode::Push);
        assert_eq!(h.len(), 3);
        assert!(h.back());
        h.set_query_param("step", "c", HistoryMode::Push);
        assert_eq!(h.len(), 3);
        assert_eq!(h.index(), 2);
        assert_eq!(h.query_param("step").as_deref(), Some("c"));
        assert_eq!(h.query_param("ref").as_deref(), Some("mail"));
    }

    #[test]
    fn replace_keeps_length() {
        let h = history();
        h.set_query_param("step", "a", HistoryMode::Replace);
        assert_eq!(h.len(), 1);
        assert_eq!(h.current_url().as_str(), "http://localhost/signup?ref=mail&step=a");
    }

    #[test]
    fn out_of_range_navigation_is_ignored() {
        let h = history();
        assert!(!h.back());
        assert!(!h.forward());
        assert!(!h.go(0));
        assert_eq!(h.index(), 0);
    }

    #[test]
    fn only_traversal_fires_listeners() {
        let h = history();
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        let id = h.on_navigation_change(Rc::new(move || counter.set(counter.get() + 1)));

        h.set_query_param("step", "a", HistoryMode::Push);
        h.set_query_param("step", "b", HistoryMode::Replace);
        assert_eq!(fired.get(), 0);

        assert!(h.back());
        assert!(h.forward());
        assert_eq!(fired.get(), 2);

        h.remove_navigation_listener(id);
        assert_eq!(h.listener_count(), 0);
        assert!(h.back());
        assert_eq!(fired.get(), 2);
    }
}
