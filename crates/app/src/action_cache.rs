//! In-memory action cache.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use minipool_domain::id::ElementId;

use crate::ports::{ActionCache, ElementRef};

/// [`ActionCache`] that only records which physical elements are registered.
///
/// Suitable as the cache of a single group: it does not count owners, so two
/// groups sharing one instance would unregister each other's elements.
#[derive(Debug, Default)]
pub struct InMemoryActionCache {
    elements: Mutex<BTreeMap<ElementId, ElementRef>>,
}

impl InMemoryActionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.lock().contains_key(&id)
    }

    /// Registered ids, in id order.
    #[must_use]
    pub fn element_ids(&self) -> Vec<ElementId> {
        self.lock().keys().copied().collect()
    }

    /// Registered elements, in id order.
    #[must_use]
    pub fn elements(&self) -> Vec<ElementRef> {
        self.lock().values().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<ElementId, ElementRef>> {
        self.elements.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ActionCache for InMemoryActionCache {
    fn register_element(&self, element: &ElementRef) {
        self.lock().insert(element.id(), element.clone());
    }

    fn unregister_element(&self, element: &ElementRef) {
        self.lock().remove(&element.id());
    }
}
