//! sync::events
//!
//! Change events and the listener bus.
//!
//! The bus is an explicit value constructed by the embedding application
//! and handed to the coordinator — there is no process-wide registry.
//! Dispatch is synchronous; a listener that triggers another workflow on
//! the same repository is a caller bug, not handled defensively here.

use crate::core::repository::ModelRepository;

/// Kinds of repository change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoEvent {
    /// Local history was rewritten (reset, undo).
    HistoryChanged,

    /// A commit was created or amended.
    CommitChanged,
}

/// Receives repository change notifications.
pub trait RepositoryListener {
    fn on_repository_changed(&self, event: RepoEvent, repo: &ModelRepository);
}

/// Identifier returned by [`EventBus::subscribe`], used to unsubscribe.
pub type ListenerId = usize;

/// Synchronous listener bus.
///
/// Registration and deregistration lifecycle is owned by the embedding
/// application through the coordinator's bus accessor.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Box<dyn RepositoryListener>)>,
    next_id: ListenerId,
}

impl EventBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; returns an id for deregistration.
    pub fn subscribe(&mut self, listener: Box<dyn RepositoryListener>) -> ListenerId {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a previously registered listener.
    ///
    /// Returns false when the id is unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Notify every listener, synchronously, in registration order.
    pub fn emit(&self, event: RepoEvent, repo: &ModelRepository) {
        tracing::debug!(?event, repo = %repo.folder().display(), "emitting event");
        for (_, listener) in &self.listeners {
            listener.on_repository_changed(event, repo);
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<RepoEvent>>>,
    }

    impl RepositoryListener for Recorder {
        fn on_repository_changed(&self, event: RepoEvent, _repo: &ModelRepository) {
            self.seen.borrow_mut().push(event);
        }
    }

    #[test]
    fn emit_reaches_all_listeners() {
        let repo = ModelRepository::new("/work/demo");
        let mut bus = EventBus::new();

        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        bus.subscribe(Box::new(Recorder { seen: first.clone() }));
        bus.subscribe(Box::new(Recorder {
            seen: second.clone(),
        }));

        bus.emit(RepoEvent::HistoryChanged, &repo);

        assert_eq!(*first.borrow(), vec![RepoEvent::HistoryChanged]);
        assert_eq!(*second.borrow(), vec![RepoEvent::HistoryChanged]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let repo = ModelRepository::new("/work/demo");
        let mut bus = EventBus::new();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let id = bus.subscribe(Box::new(Recorder { seen: seen.clone() }));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert!(bus.is_empty());

        bus.emit(RepoEvent::CommitChanged, &repo);
        assert!(seen.borrow().is_empty());
    }
}
