//! Virtual motor: moves instantly, reports `MOVING` until stopped.

use std::sync::{Arc, Mutex, PoisonError};

use minipool_app::ports::{Element, ElementListener, Role};
use minipool_domain::element::{ElementInfo, ElementType};
use minipool_domain::error::MiniPoolError;
use minipool_domain::event::EventType;
use minipool_domain::id::{ControllerId, ElementId, ListenerId};
use minipool_domain::state::ElementState;

use super::Channel;
use crate::error::VirtualError;

/// A simulated motor channel.
pub struct VirtualMotor {
    channel: Channel,
    position: Mutex<f64>,
}

impl VirtualMotor {
    pub(crate) fn new(info: ElementInfo, controller: ControllerId) -> Self {
        debug_assert_eq!(info.element_type, ElementType::Motor);
        Self {
            channel: Channel::new(info, controller, ElementState::On),
            position: Mutex::new(0.0),
        }
    }

    #[must_use]
    pub fn controller(&self) -> ControllerId {
        self.channel.controller
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        *self.position.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state, even when unreachable.
    #[must_use]
    pub fn state(&self) -> ElementState {
        self.channel.state()
    }

    /// Force a state, e.g. to simulate a fault.
    pub fn set_state(&self, state: ElementState) {
        self.channel.set_state(state);
    }

    /// Make subsequent state inspections fail (or succeed again).
    pub fn set_reachable(&self, reachable: bool) {
        self.channel.set_reachable(reachable);
    }

    /// Start a motion to `target`. The motor stays `MOVING` until
    /// [`stop`](Self::stop) is called.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::NotReady`] while in `FAULT` or `DISABLE`, or
    /// [`VirtualError::Unreachable`].
    pub fn move_to(&self, target: f64) -> Result<(), VirtualError> {
        self.channel.ensure_ready()?;
        self.channel.set_state(ElementState::Moving);
        *self.position.lock().unwrap_or_else(PoisonError::into_inner) = target;
        self.channel
            .emit(EventType::PositionChanged, serde_json::json!(target));
        Ok(())
    }

    /// End the current motion.
    pub fn stop(&self) {
        if self.channel.state() == ElementState::Moving {
            self.channel.set_state(ElementState::On);
        }
    }
}

impl Element for VirtualMotor {
    fn id(&self) -> ElementId {
        self.channel.info.id
    }

    fn name(&self) -> &str {
        &self.channel.info.name
    }

    fn element_type(&self) -> ElementType {
        self.channel.info.element_type
    }

    fn role(&self) -> Role {
        self.channel.role()
    }

    fn inspect_state(&self) -> Result<ElementState, MiniPoolError> {
        Ok(self.channel.read_state()?)
    }

    fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool {
        self.channel.subscribe(id, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.channel.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minipool_domain::event::ElementEvent;

    fn motor() -> VirtualMotor {
        let info = ElementInfo::builder(ElementType::Motor)
            .name("mot01")
            .build()
            .unwrap();
        VirtualMotor::new(info, ControllerId::new())
    }

    #[test]
    fn should_default_to_on_at_zero() {
        let mot = motor();
        assert_eq!(mot.inspect_state().unwrap(), ElementState::On);
        assert!(mot.position().abs() < f64::EPSILON);
    }

    #[test]
    fn should_be_moving_until_stopped() {
        let mot = motor();
        mot.move_to(10.0).unwrap();
        assert_eq!(mot.inspect_state().unwrap(), ElementState::Moving);
        assert!((mot.position() - 10.0).abs() < f64::EPSILON);

        mot.stop();
        assert_eq!(mot.inspect_state().unwrap(), ElementState::On);
    }

    #[test]
    fn should_refuse_motion_when_faulted() {
        let mot = motor();
        mot.set_state(ElementState::Fault);
        let result = mot.move_to(1.0);
        assert!(matches!(
            result,
            Err(VirtualError::NotReady {
                state: ElementState::Fault,
                ..
            })
        ));
    }

    #[test]
    fn should_fail_inspection_when_unreachable() {
        let mot = motor();
        mot.set_reachable(false);
        assert!(matches!(
            mot.inspect_state(),
            Err(MiniPoolError::Inspection(_))
        ));
        assert_eq!(mot.state(), ElementState::On);
    }

    #[test]
    fn should_emit_state_and_position_events_on_move() {
        let mot = motor();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        mot.subscribe(
            ListenerId::new(),
            Arc::new(move |event: &ElementEvent| {
                sink.lock().unwrap().push(event.event_type);
            }),
        );

        mot.move_to(5.0).unwrap();
        mot.stop();

        assert_eq!(
            *events.lock().unwrap(),
            vec![
                EventType::StateChanged,
                EventType::PositionChanged,
                EventType::StateChanged
            ]
        );
    }

    #[test]
    fn should_not_emit_when_state_is_unchanged() {
        let mot = motor();
        let events = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&events);
        mot.subscribe(
            ListenerId::new(),
            Arc::new(move |_: &ElementEvent| {
                *sink.lock().unwrap() += 1;
            }),
        );

        mot.set_state(ElementState::On);
        mot.stop();

        assert_eq!(*events.lock().unwrap(), 0);
    }
}
