//! Membership changes and action cache wiring.

use std::sync::{Arc, Mutex, PoisonError};

use minipool_domain::error::{MembershipError, MiniPoolError};
use minipool_domain::event::{ElementEvent, EventType};
use minipool_domain::id::ElementId;

use crate::physical::Reachability;
use crate::ports::{ActionCache, Element, ElementRef, Role};

use super::{Group, Membership};

/// Held while a composite element is checked for cycles and inserted, so no
/// two groups can adopt each other concurrently.
static TOPOLOGY: Mutex<()> = Mutex::new(());

impl Group {
    /// Insert `element` at `index` (append when `None`) and return the index
    /// it now occupies.
    ///
    /// The element's physical closure is merged into the index, newly
    /// reachable physical elements are registered in the action cache, and
    /// the group starts listening to the element.
    ///
    /// # Errors
    ///
    /// Returns a [`MembershipError`] (`Duplicate`, `IndexOutOfRange` or
    /// `Cycle`) and leaves the group untouched.
    #[tracing::instrument(skip(self, element), fields(group = %self.info.name, member = %element.name()))]
    pub fn add_member(
        &self,
        element: ElementRef,
        index: Option<usize>,
    ) -> Result<usize, MiniPoolError> {
        if element.id() == self.id() {
            return Err(self.cycle(&element));
        }
        // Queried before locking: the element may be a group that is itself
        // busy adding this one. Composites are queried again under the
        // topology lock so the cycle check and the insert form one step.
        let mut role = element.role();
        let topology = if matches!(role, Role::Composite(_)) {
            let topology = TOPOLOGY.lock().unwrap_or_else(PoisonError::into_inner);
            role = element.role();
            if matches!(&role, Role::Composite(reach) if reach.contains(self.id())) {
                return Err(self.cycle(&element));
            }
            Some(topology)
        } else {
            None
        };

        let mut guard = self.lock();
        let membership = &mut *guard;
        if membership.members.contains(&element) {
            return Err(MembershipError::Duplicate {
                group: self.info.name.clone(),
                member: element.name().to_string(),
            }
            .into());
        }
        let len = membership.members.len();
        let index = index.unwrap_or(len);
        if index > len {
            return Err(MembershipError::IndexOutOfRange { index, len }.into());
        }

        membership.members.insert(index, element.clone());
        let added = membership.reach.absorb(&element, &role);
        if let Some(cache) = &membership.action_cache {
            for physical in &added {
                tracing::debug!(element = %physical.name(), "registering in action cache");
                cache.register_element(physical);
            }
        }
        element.subscribe(self.listener_id, Arc::clone(&self.forwarder));
        let names = member_names(&membership.members);
        drop(guard);
        drop(topology);

        self.publish_elements_changed(names);
        Ok(index)
    }

    /// Remove the member with the given id.
    ///
    /// The physical index is recomputed from the remaining members and every
    /// physical element no longer reachable is unregistered from the action
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::MemberNotFound`] and leaves the group
    /// untouched if `id` is not a member.
    #[tracing::instrument(skip(self), fields(group = %self.info.name))]
    pub fn remove_member(&self, id: ElementId) -> Result<(), MiniPoolError> {
        let mut guard = self.lock();
        let Some(position) = guard.members.iter().position(|m| m.id() == id) else {
            return Err(MembershipError::MemberNotFound {
                group: self.info.name.clone(),
                member: id.to_string(),
            }
            .into());
        };

        let element = guard.members[position].clone();
        element.unsubscribe(self.listener_id);
        guard.members.remove(position);
        Self::reconcile(&mut guard);
        let names = member_names(&guard.members);
        drop(guard);

        self.publish_elements_changed(names);
        Ok(())
    }

    /// Replace the action cache.
    ///
    /// Every indexed physical element is unregistered from the previous cache
    /// (if any) and registered in `cache`.
    #[tracing::instrument(skip(self, cache), fields(group = %self.info.name))]
    pub fn set_action_cache(&self, cache: Arc<dyn ActionCache>) {
        let mut guard = self.lock();
        let membership = &mut *guard;
        if let Some(previous) = membership.action_cache.take() {
            for physical in membership.reach.physical.elements() {
                previous.unregister_element(physical);
            }
        }
        for physical in membership.reach.physical.elements() {
            cache.register_element(physical);
        }
        tracing::info!(
            elements = membership.reach.physical.len(),
            "action cache replaced"
        );
        membership.action_cache = Some(cache);
    }

    /// Recompute the physical index from the current members and reconcile
    /// the action cache.
    ///
    /// Needed when a nested group changed its own membership: the parent only
    /// sees that change through this call.
    pub fn rebuild_physical_index(&self) {
        let mut guard = self.lock();
        Self::reconcile(&mut guard);
    }

    fn reconcile(membership: &mut Membership) {
        let fresh = Reachability::of(&membership.members);
        let stale = membership.reach.physical.difference(&fresh.physical);
        let added = fresh.physical.difference(&membership.reach.physical);
        if let Some(cache) = &membership.action_cache {
            for physical in &stale {
                tracing::debug!(element = %physical.name(), "unregistering from action cache");
                cache.unregister_element(physical);
            }
            for physical in &added {
                tracing::debug!(element = %physical.name(), "registering in action cache");
                cache.register_element(physical);
            }
        }
        membership.reach = fresh;
    }

    fn cycle(&self, element: &ElementRef) -> MiniPoolError {
        MembershipError::Cycle {
            group: self.info.name.clone(),
            member: element.name().to_string(),
        }
        .into()
    }

    fn publish_elements_changed(&self, names: Vec<String>) {
        self.listeners.notify(&ElementEvent::new(
            self.info.id,
            EventType::ElementsChanged,
            serde_json::json!(names),
        ));
    }
}

fn member_names(members: &[ElementRef]) -> Vec<String> {
    members.iter().map(|m| m.name().to_string()).collect()
}
