//! In-process event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use minipool_domain::event::ElementEvent;

use crate::ports::ElementListener;

/// In-process event bus using a tokio [`broadcast`] channel.
///
/// Subscribe it to a group (or any element) to turn synchronous change
/// notifications into queued messages that async consumers can drain.
/// Publishing succeeds even when there are no active receivers (the event is
/// simply dropped).
pub struct InProcessEventBus {
    sender: broadcast::Sender<ElementEvent>,
}

impl InProcessEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ElementEvent> {
        self.sender.subscribe()
    }

    /// Enqueue `event` for every receiver.
    pub fn publish(&self, event: ElementEvent) {
        // send fails only when there are zero receivers
        let _ = self.sender.send(event);
    }
}

impl ElementListener for InProcessEventBus {
    fn on_element_changed(&self, event: &ElementEvent) {
        self.publish(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::group::Group;
    use crate::ports::Element;
    use crate::testing::FakePhysical;
    use minipool_domain::element::{ElementInfo, ElementType};
    use minipool_domain::event::EventType;
    use minipool_domain::id::{ControllerId, ElementId, ListenerId};
    use minipool_domain::state::ElementState;

    #[tokio::test]
    async fn should_deliver_event_to_subscriber() {
        let bus = InProcessEventBus::new(16);
        let mut rx = bus.subscribe();

        let event = ElementEvent::new(
            ElementId::new(),
            EventType::StateChanged,
            serde_json::json!("moving"),
        );
        let event_id = event.id;

        bus.publish(event);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, event_id);
    }

    #[tokio::test]
    async fn should_deliver_event_to_multiple_subscribers() {
        let bus = InProcessEventBus::new(16);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let event = ElementEvent::new(ElementId::new(), EventType::ValueChanged, serde_json::json!(3));
        let event_id = event.id;

        bus.on_element_changed(&event);

        assert_eq!(rx1.recv().await.unwrap().id, event_id);
        assert_eq!(rx2.recv().await.unwrap().id, event_id);
    }

    #[tokio::test]
    async fn should_succeed_when_no_subscribers() {
        let bus = InProcessEventBus::new(16);
        bus.publish(ElementEvent::new(
            ElementId::new(),
            EventType::StateChanged,
            serde_json::json!("on"),
        ));
    }

    #[tokio::test]
    async fn should_queue_member_events_forwarded_by_group() {
        let group = Group::new(
            ElementInfo::builder(ElementType::MotorGroup)
                .name("mg01")
                .build()
                .unwrap(),
        )
        .unwrap();
        let mot = FakePhysical::shared("mot01", ControllerId::new());
        group.add_member(mot.clone().into(), None).unwrap();

        let bus = Arc::new(InProcessEventBus::new(16));
        let mut rx = bus.subscribe();
        group.subscribe(ListenerId::new(), bus.clone());

        mot.set_state(ElementState::Moving);

        let received = rx.recv().await.unwrap();
        assert_eq!(received.source, mot.id());
        assert_eq!(received.event_type, EventType::StateChanged);
    }
}
