//! Physical closure resolution.
//!
//! Given any element, work out which physical elements it ultimately drives,
//! grouped by owning controller. Physical elements contribute themselves;
//! composites contribute the index they already maintain, so resolution is a
//! merge and never walks the whole tree.

use std::collections::BTreeSet;

use minipool_domain::id::ElementId;
use minipool_domain::physical_index::PhysicalIndex;

use crate::ports::{ElementRef, Role};

/// Controller → physical elements, holding live element handles.
pub type PhysicalClosure = PhysicalIndex<ElementRef>;

/// Resolve `element` into `accumulator`, returning the physical elements that
/// were not already present.
///
/// Resolving the same element twice leaves the accumulator unchanged the
/// second time.
pub fn resolve_physical(
    element: &ElementRef,
    accumulator: &mut PhysicalClosure,
) -> Vec<ElementRef> {
    merge_role(element, &element.role(), accumulator)
}

/// Physical closure of a single element.
#[must_use]
pub fn physical_closure(element: &ElementRef) -> PhysicalClosure {
    let mut closure = PhysicalClosure::new();
    resolve_physical(element, &mut closure);
    closure
}

fn merge_role(
    element: &ElementRef,
    role: &Role,
    accumulator: &mut PhysicalClosure,
) -> Vec<ElementRef> {
    match role {
        Role::Physical { controller } => {
            if accumulator.insert(*controller, element.clone()) {
                vec![element.clone()]
            } else {
                Vec::new()
            }
        }
        Role::Composite(reach) => accumulator.merge(&reach.physical),
    }
}

/// Everything reachable from a set of members: the physical closure, the
/// direct member ids, and the direct composite members.
///
/// Containment is answered by walking the composite members' current roles,
/// so it sees changes made to nested groups after they were added.
#[derive(Debug, Clone, Default)]
pub struct Reachability {
    pub physical: PhysicalClosure,
    members: BTreeSet<ElementId>,
    composites: Vec<ElementRef>,
}

impl Reachability {
    /// Compute from scratch over `members`.
    pub fn of<'a>(members: impl IntoIterator<Item = &'a ElementRef>) -> Self {
        let mut reach = Self::default();
        for member in members {
            reach.absorb(member, &member.role());
        }
        reach
    }

    /// Add one member whose role was already queried, returning the physical
    /// elements that became reachable.
    pub fn absorb(&mut self, member: &ElementRef, role: &Role) -> Vec<ElementRef> {
        if self.members.insert(member.id()) && matches!(role, Role::Composite(_)) {
            self.composites.push(member.clone());
        }
        merge_role(member, role, &mut self.physical)
    }

    /// Whether `id` is a member, directly or through nested composites.
    ///
    /// The walk never queries the role of `id` itself, so it is safe to call
    /// while the element behind `id` is locked.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.members.contains(&id)
            || self.composites.iter().any(|composite| match composite.role() {
                Role::Composite(inner) => inner.contains(id),
                Role::Physical { .. } => false,
            })
    }
}
