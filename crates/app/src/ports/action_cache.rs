//! Action cache port: registry of physical elements subject to coordinated actions.

use crate::ports::ElementRef;

/// Receives the physical elements a group can act upon.
///
/// Both operations must be idempotent: registering an element twice, or
/// unregistering one that is not registered, is a no-op.
pub trait ActionCache: Send + Sync {
    /// Make `element` part of the coordinated action set.
    fn register_element(&self, element: &ElementRef);

    /// Remove `element` from the coordinated action set.
    fn unregister_element(&self, element: &ElementRef);
}

impl<T: ActionCache + ?Sized> ActionCache for std::sync::Arc<T> {
    fn register_element(&self, element: &ElementRef) {
        (**self).register_element(element);
    }

    fn unregister_element(&self, element: &ElementRef) {
        (**self).unregister_element(element);
    }
}
