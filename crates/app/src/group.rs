//! Group: a named, ordered collection of elements acting as one unit.
//!
//! A group keeps three things consistent with its member list:
//! - the physical index (controller → physical elements reachable through
//!   the members, including through nested groups),
//! - the action cache, which always holds exactly the indexed elements,
//! - its subscription on every member, so member events reach the group's
//!   own listeners.
//!
//! A group is itself a composite [`Element`], so groups nest.
//!
//! All membership state sits behind a single mutex; every add, remove, or
//! cache swap runs as one critical section.

mod aggregation;
mod membership;

pub use aggregation::StateAggregation;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use minipool_domain::element::{ElementInfo, ElementType};
use minipool_domain::error::MiniPoolError;
use minipool_domain::event::ElementEvent;
use minipool_domain::id::{ElementId, ListenerId};
use minipool_domain::state::ElementState;
use minipool_domain::statistics::StateStatistics;

use crate::listeners::ListenerRegistry;
use crate::physical::{PhysicalClosure, Reachability};
use crate::ports::{ActionCache, Element, ElementListener, ElementLookup, ElementRef, Role};

/// A collection of heterogeneous elements treated as one logical unit.
pub struct Group {
    info: ElementInfo,
    listener_id: ListenerId,
    listeners: Arc<ListenerRegistry>,
    forwarder: Arc<dyn ElementListener>,
    membership: Mutex<Membership>,
    statistics: Mutex<StateStatistics<ElementRef>>,
}

#[derive(Default)]
struct Membership {
    members: Vec<ElementRef>,
    reach: Reachability,
    action_cache: Option<Arc<dyn ActionCache>>,
}

/// Re-emits member events to the group's own listeners.
struct Forwarder {
    listeners: Arc<ListenerRegistry>,
}

impl ElementListener for Forwarder {
    fn on_element_changed(&self, event: &ElementEvent) {
        self.listeners.notify(event);
    }
}

impl Group {
    /// Create an empty group.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPoolError::Validation`] if `info` has an empty name.
    pub fn new(info: ElementInfo) -> Result<Self, MiniPoolError> {
        info.validate()?;
        let listeners = Arc::new(ListenerRegistry::new());
        let forwarder: Arc<dyn ElementListener> = Arc::new(Forwarder {
            listeners: Arc::clone(&listeners),
        });
        Ok(Self {
            info,
            listener_id: ListenerId::new(),
            listeners,
            forwarder,
            membership: Mutex::new(Membership::default()),
            statistics: Mutex::new(StateStatistics::new()),
        })
    }

    /// Create a group whose members are resolved through `lookup`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`MiniPoolError::NotFound`] for an unknown id, or a
    /// [`MembershipError`](minipool_domain::error::MembershipError) if an id
    /// is repeated or would create a cycle.
    pub fn with_members(
        info: ElementInfo,
        member_ids: &[ElementId],
        lookup: &impl ElementLookup,
    ) -> Result<Self, MiniPoolError> {
        let group = Self::new(info)?;
        for id in member_ids {
            let element = lookup.element(*id)?;
            group.add_member(element, None)?;
        }
        Ok(group)
    }

    #[must_use]
    pub fn info(&self) -> &ElementInfo {
        &self.info
    }

    /// Snapshot of the members, in insertion order.
    #[must_use]
    pub fn members(&self) -> Vec<ElementRef> {
        self.lock().members.clone()
    }

    #[must_use]
    pub fn member(&self, id: ElementId) -> Option<ElementRef> {
        self.lock().members.iter().find(|m| m.id() == id).cloned()
    }

    #[must_use]
    pub fn member_by_name(&self, name: &str) -> Option<ElementRef> {
        self.lock().members.iter().find(|m| m.name() == name).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.lock().members.iter().any(|m| m.id() == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().members.is_empty()
    }

    /// Snapshot of the physical index.
    #[must_use]
    pub fn physical_elements(&self) -> PhysicalClosure {
        self.lock().reach.physical.clone()
    }

    /// The action cache currently kept in sync, if any.
    #[must_use]
    pub fn action_cache(&self) -> Option<Arc<dyn ActionCache>> {
        self.lock().action_cache.clone()
    }

    /// Number of listeners attached to this group.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn lock(&self) -> MutexGuard<'_, Membership> {
        self.membership
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_statistics(&self) -> MutexGuard<'_, StateStatistics<ElementRef>> {
        self.statistics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Element for Group {
    fn id(&self) -> ElementId {
        self.info.id
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    fn element_type(&self) -> ElementType {
        self.info.element_type
    }

    fn role(&self) -> Role {
        Role::Composite(self.lock().reach.clone())
    }

    fn inspect_state(&self) -> Result<ElementState, MiniPoolError> {
        self.aggregate_state().map(|aggregation| aggregation.state)
    }

    fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool {
        self.listeners.subscribe(id, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

impl Drop for Group {
    fn drop(&mut self) {
        let membership = self
            .membership
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        for member in &membership.members {
            member.unsubscribe(self.listener_id);
        }
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("info", &self.info)
            .field("members", &self.members())
            .finish_non_exhaustive()
    }
}
