//! Event: an immutable record of a change on an element.
//!
//! Elements emit events when their state, position or value changes, and
//! groups emit one when their member list changes. Groups forward member
//! events to their own listeners unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ElementId, EventId};

/// UTC time at which an event was emitted.
pub type Timestamp = DateTime<Utc>;

/// What changed on the source element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    StateChanged,
    PositionChanged,
    ValueChanged,
    ElementsChanged,
}

/// A change notification emitted by an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEvent {
    pub id: EventId,
    pub source: ElementId,
    pub event_type: EventType,
    pub value: serde_json::Value,
    pub timestamp: Timestamp,
}

impl ElementEvent {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(source: ElementId, event_type: EventType, value: serde_json::Value) -> Self {
        Self {
            id: EventId::new(),
            source,
            event_type,
            value,
            timestamp: Utc::now(),
        }
    }
}
