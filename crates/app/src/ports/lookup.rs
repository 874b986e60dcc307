//! Lookup port: resolves element identifiers at group construction time.

use minipool_domain::error::MiniPoolError;
use minipool_domain::id::ElementId;

use crate::ports::ElementRef;

/// Resolves an [`ElementId`] to a live element.
pub trait ElementLookup {
    /// Return the element registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPoolError::NotFound`] when no element has that id.
    fn element(&self, id: ElementId) -> Result<ElementRef, MiniPoolError>;
}

impl<T: ElementLookup + ?Sized> ElementLookup for std::sync::Arc<T> {
    fn element(&self, id: ElementId) -> Result<ElementRef, MiniPoolError> {
        (**self).element(id)
    }
}
