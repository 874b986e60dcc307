//! Listener registry: explicit subscription list with synchronous fan-out.

use std::sync::{Arc, Mutex, PoisonError};

use minipool_domain::event::ElementEvent;
use minipool_domain::id::ListenerId;

use crate::ports::ElementListener;

/// Subscribers of one element, keyed by [`ListenerId`].
///
/// Delivery iterates over a snapshot taken under the lock and calls listeners
/// outside of it, so a listener may subscribe or unsubscribe from within its
/// callback. An unsubscribe racing with a delivery can still see that one
/// in-flight event.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<(ListenerId, Arc<dyn ElementListener>)>>,
}

impl ListenerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `listener` under `id`. Returns `false` if `id` is already attached.
    pub fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool {
        let mut listeners = self.lock();
        if listeners.iter().any(|(existing, _)| *existing == id) {
            return false;
        }
        listeners.push((id, listener));
        true
    }

    /// Detach `id`. Returns `false` if it was not attached.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.lock();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    /// Deliver `event` to every listener, in subscription order.
    pub fn notify(&self, event: &ElementEvent) {
        let snapshot: Vec<Arc<dyn ElementListener>> = self
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener.on_element_changed(event);
        }
    }

    #[must_use]
    pub fn contains(&self, id: ListenerId) -> bool {
        self.lock().iter().any(|(existing, _)| *existing == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(ListenerId, Arc<dyn ElementListener>)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.len())
            .finish()
    }
}
