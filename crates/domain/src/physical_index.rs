//! Physical index: physical elements grouped by the controller that owns them.

use std::collections::{BTreeMap, BTreeSet};

use crate::id::ControllerId;

/// Controller → set of physical elements.
///
/// Generic over the element handle so the domain stays free of the `Element`
/// port. Set semantics make every insertion idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalIndex<E> {
    by_controller: BTreeMap<ControllerId, BTreeSet<E>>,
}

impl<E> Default for PhysicalIndex<E> {
    fn default() -> Self {
        Self {
            by_controller: BTreeMap::new(),
        }
    }
}

impl<E: Ord + Clone> PhysicalIndex<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `element` under `controller`, creating the set if absent.
    ///
    /// Returns `true` if the element was not already present.
    pub fn insert(&mut self, controller: ControllerId, element: E) -> bool {
        self.by_controller
            .entry(controller)
            .or_default()
            .insert(element)
    }

    /// Union `other` into `self`, returning the elements that were new.
    pub fn merge(&mut self, other: &Self) -> Vec<E> {
        let mut added = Vec::new();
        for (controller, elements) in &other.by_controller {
            let own = self.by_controller.entry(*controller).or_default();
            for element in elements {
                if own.insert(element.clone()) {
                    added.push(element.clone());
                }
            }
        }
        added
    }

    /// Elements owned by `controller`.
    #[must_use]
    pub fn get(&self, controller: ControllerId) -> Option<&BTreeSet<E>> {
        self.by_controller.get(&controller)
    }

    pub fn controllers(&self) -> impl Iterator<Item = ControllerId> + '_ {
        self.by_controller.keys().copied()
    }

    /// Every `(controller, element)` pair, ordered by controller.
    pub fn iter(&self) -> impl Iterator<Item = (ControllerId, &E)> + '_ {
        self.by_controller
            .iter()
            .flat_map(|(controller, elements)| elements.iter().map(move |e| (*controller, e)))
    }

    /// Every element regardless of controller.
    pub fn elements(&self) -> impl Iterator<Item = &E> + '_ {
        self.by_controller.values().flatten()
    }

    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.by_controller.values().any(|set| set.contains(element))
    }

    /// Total number of physical elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_controller.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_controller.values().all(BTreeSet::is_empty)
    }

    /// Elements present in `self` but absent from `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Vec<E> {
        let remaining: BTreeSet<&E> = other.elements().collect();
        self.elements()
            .filter(|element| !remaining.contains(element))
            .cloned()
            .collect()
    }
}
