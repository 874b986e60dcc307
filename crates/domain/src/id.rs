//! Typed identifiers backed by random UUIDs.
//!
//! Ids are totally ordered so that physical indexes and member sets iterate
//! deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self(uuid::Uuid::new_v4())
            }
        }

        impl $name {
            /// Generate a fresh identifier.
            #[must_use]
            pub fn new() -> Self {
                Self::default()
            }

            /// Use a known UUID, e.g. one assigned by the control system.
            #[must_use]
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identity of a pool element, physical or composite.
    ElementId
);

define_id!(
    /// Identity of the controller owning a physical element.
    ControllerId
);

define_id!(
    /// Key of one subscription on an element's change notifications.
    ListenerId
);

define_id!(
    /// Identity of an [`ElementEvent`](crate::event::ElementEvent).
    EventId
);

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn should_generate_distinct_listener_ids() {
        let ids: BTreeSet<_> = (0..16).map(|_| ListenerId::new()).collect();
        assert_eq!(ids.len(), 16);
    }

    #[test]
    fn should_serialize_as_bare_uuid_string() {
        let uuid = uuid::Uuid::from_u128(7);
        let json = serde_json::to_string(&ElementId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{uuid}\""));
    }

    #[test]
    fn should_display_inner_uuid() {
        let uuid = uuid::Uuid::from_u128(42);
        assert_eq!(ControllerId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn should_sort_controller_ids_by_uuid() {
        let ids: Vec<_> = [3_u128, 1, 2]
            .into_iter()
            .map(|n| ControllerId::from_uuid(uuid::Uuid::from_u128(n)))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let expected: Vec<_> = [1_u128, 2, 3]
            .into_iter()
            .map(|n| ControllerId::from_uuid(uuid::Uuid::from_u128(n)))
            .collect();
        assert_eq!(ids, expected);
    }
}
