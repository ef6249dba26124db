//! Connection lifecycle notifications.
//!
//! Observers subscribe to a client's lifecycle events through an explicit
//! registration interface. In this single-connection model each event
//! fires at most once per client: `connected` when establishment
//! succeeds, `error` when it fails.

use sqlbridge_core::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives connection lifecycle events from a client.
///
/// Both hooks default to no-ops, so an observer only implements the
/// events it cares about. Hooks are called synchronously from the task
/// that settled the connection attempt and must not block.
pub trait ClientObserver<C>: Send + Sync {
    /// The connection was established. Fired once, with the shared handle.
    fn connected(&self, _conn: &C) {}

    /// The connection attempt failed. Fired once, with the failure.
    fn error(&self, _error: &Error) {}
}

/// Handle identifying a subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Registry of subscribed observers.
pub(crate) struct Observers<C: 'static> {
    entries: Mutex<Vec<(ObserverId, Arc<dyn ClientObserver<C>>)>>,
    next_id: AtomicU64,
}

impl<C: 'static> Observers<C> {
    pub(crate) fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Add an observer, returning a handle for removal.
    pub(crate) fn subscribe(&self, observer: Arc<dyn ClientObserver<C>>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, observer));
        id
    }

    /// Remove an observer. Returns false if the handle is unknown.
    pub(crate) fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    pub(crate) fn notify_connected(&self, conn: &C) {
        for observer in self.snapshot() {
            observer.connected(conn);
        }
    }

    pub(crate) fn notify_error(&self, error: &Error) {
        for observer in self.snapshot() {
            observer.error(error);
        }
    }

    // Snapshot under the lock, invoke outside it, so a hook may
    // subscribe or unsubscribe reentrantly.
    fn snapshot(&self) -> Vec<Arc<dyn ClientObserver<C>>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }
}
