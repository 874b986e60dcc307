//! State statistics: members of a group bucketed by the state they report.

use crate::state::ElementState;

/// Buckets of group members keyed by the four states a group understands.
///
/// Precedence, highest first: `Fault`, `Alarm`, `Moving`, `On`. Any other
/// state has no bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateStatistics<T> {
    fault: Vec<T>,
    alarm: Vec<T>,
    moving: Vec<T>,
    on: Vec<T>,
}

impl<T> Default for StateStatistics<T> {
    fn default() -> Self {
        Self {
            fault: Vec::new(),
            alarm: Vec::new(),
            moving: Vec::new(),
            on: Vec::new(),
        }
    }
}

impl<T> StateStatistics<T> {
    /// Bucketed states, highest precedence first.
    pub const PRECEDENCE: [ElementState; 4] = [
        ElementState::Fault,
        ElementState::Alarm,
        ElementState::Moving,
        ElementState::On,
    ];

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `state` has a bucket.
    #[must_use]
    pub fn tracks(state: ElementState) -> bool {
        Self::PRECEDENCE.contains(&state)
    }

    /// Put `item` in the bucket for `state`.
    ///
    /// Returns `false` (and drops `item`) when the state has no bucket.
    pub fn record(&mut self, state: ElementState, item: T) -> bool {
        match self.bucket_mut(state) {
            Some(bucket) => {
                bucket.push(item);
                true
            }
            None => false,
        }
    }

    /// Members recorded under `state`, in recording order.
    #[must_use]
    pub fn get(&self, state: ElementState) -> &[T] {
        match state {
            ElementState::Fault => &self.fault,
            ElementState::Alarm => &self.alarm,
            ElementState::Moving => &self.moving,
            ElementState::On => &self.on,
            _ => &[],
        }
    }

    /// The highest-precedence non-empty bucket, or `On` when all are empty.
    #[must_use]
    pub fn group_state(&self) -> ElementState {
        Self::PRECEDENCE
            .into_iter()
            .find(|state| !self.get(*state).is_empty())
            .unwrap_or(ElementState::On)
    }

    /// Number of recorded members across all buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fault.len() + self.alarm.len() + self.moving.len() + self.on.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn bucket_mut(&mut self, state: ElementState) -> Option<&mut Vec<T>> {
        match state {
            ElementState::Fault => Some(&mut self.fault),
            ElementState::Alarm => Some(&mut self.alarm),
            ElementState::Moving => Some(&mut self.moving),
            ElementState::On => Some(&mut self.on),
            _ => None,
        }
    }
}
