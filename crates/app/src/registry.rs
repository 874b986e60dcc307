//! In-memory element registry: the lookup used to build groups from ids.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use minipool_domain::error::{MiniPoolError, NotFoundError, ValidationError};
use minipool_domain::id::ElementId;

use crate::ports::{ElementLookup, ElementRef};

/// Elements of a pool indexed by id and by name.
///
/// Names are unique within a registry.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    by_id: HashMap<ElementId, ElementRef>,
    by_name: HashMap<String, ElementId>,
}

impl ElementRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `element` to the registry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateId`] if the id is already
    /// registered, or [`ValidationError::DuplicateName`] if the name is.
    pub fn register(&self, element: ElementRef) -> Result<(), MiniPoolError> {
        let mut inner = self.lock();
        if inner.by_id.contains_key(&element.id()) {
            return Err(ValidationError::DuplicateId(element.id().to_string()).into());
        }
        if inner.by_name.contains_key(element.name()) {
            return Err(ValidationError::DuplicateName(element.name().to_string()).into());
        }
        inner.by_name.insert(element.name().to_string(), element.id());
        inner.by_id.insert(element.id(), element);
        Ok(())
    }

    /// Remove and return the element registered under `id`.
    pub fn unregister(&self, id: ElementId) -> Option<ElementRef> {
        let mut inner = self.lock();
        let element = inner.by_id.remove(&id)?;
        inner.by_name.remove(element.name());
        Some(element)
    }

    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<ElementRef> {
        self.lock().by_id.get(&id).cloned()
    }

    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<ElementRef> {
        let inner = self.lock();
        inner
            .by_name
            .get(name)
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().by_id.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().by_id.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ElementLookup for ElementRegistry {
    fn element(&self, id: ElementId) -> Result<ElementRef, MiniPoolError> {
        self.get(id).ok_or_else(|| {
            NotFoundError {
                entity: "Element",
                id: id.to_string(),
            }
            .into()
        })
    }
}
