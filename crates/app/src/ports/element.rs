//! Element port: the capability every group member provides.
//!
//! A member is either *physical* (a leaf channel owned by one controller) or
//! *composite* (defined in terms of other elements, e.g. a group). Groups
//! never inspect concrete types: they only ask for the member's [`Role`].

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use minipool_domain::element::ElementType;
use minipool_domain::error::MiniPoolError;
use minipool_domain::event::ElementEvent;
use minipool_domain::id::{ControllerId, ElementId, ListenerId};
use minipool_domain::state::ElementState;

use crate::physical::Reachability;

/// How an element relates to physical hardware.
#[derive(Debug, Clone)]
pub enum Role {
    /// A leaf element owned by exactly one controller.
    Physical { controller: ControllerId },
    /// An element built from other elements. Carries its own physical index
    /// and the ids of every element it transitively contains.
    Composite(Reachability),
}

/// Receives change notifications from an element.
pub trait ElementListener: Send + Sync {
    fn on_element_changed(&self, event: &ElementEvent);
}

impl<F> ElementListener for F
where
    F: Fn(&ElementEvent) + Send + Sync,
{
    fn on_element_changed(&self, event: &ElementEvent) {
        self(event);
    }
}

/// A pool element that can be a group member.
pub trait Element: Send + Sync {
    fn id(&self) -> ElementId;

    fn name(&self) -> &str;

    fn element_type(&self) -> ElementType;

    /// Physical owner or composite closure of this element.
    fn role(&self) -> Role;

    /// Query the current operational state.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPoolError::Inspection`] (or whatever the element
    /// reports) when the state cannot be read.
    fn inspect_state(&self) -> Result<ElementState, MiniPoolError>;

    /// Attach `listener` under `id`.
    ///
    /// Returns `false` when a listener with that id is already attached; the
    /// existing subscription is kept.
    fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool;

    /// Detach the listener registered under `id`. Returns `false` if none was.
    fn unsubscribe(&self, id: ListenerId) -> bool;
}

/// Shared, non-owning handle to a group member.
///
/// Equality, ordering and hashing use the element id only, so two handles to
/// the same element are interchangeable in sets and maps.
#[derive(Clone)]
pub struct ElementRef(Arc<dyn Element>);

impl ElementRef {
    pub fn new(element: Arc<dyn Element>) -> Self {
        Self(element)
    }

    /// Access the shared element.
    #[must_use]
    pub fn as_arc(&self) -> &Arc<dyn Element> {
        &self.0
    }
}

impl<T: Element + 'static> From<Arc<T>> for ElementRef {
    fn from(element: Arc<T>) -> Self {
        Self(element)
    }
}

impl Deref for ElementRef {
    type Target = dyn Element;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl PartialEq for ElementRef {
    fn eq(&self, other: &Self) -> bool {
        self.0.id() == other.0.id()
    }
}

impl Eq for ElementRef {}

impl PartialOrd for ElementRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ElementRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.id().cmp(&other.0.id())
    }
}

impl Hash for ElementRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id().hash(state);
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.0.id())
            .field("name", &self.0.name())
            .finish()
    }
}
