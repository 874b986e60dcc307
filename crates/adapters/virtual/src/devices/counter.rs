//! Virtual counter/timer: counts while `MOVING`, holds its last value otherwise.

use std::sync::{Arc, Mutex, PoisonError};

use minipool_app::ports::{Element, ElementListener, Role};
use minipool_domain::element::{ElementInfo, ElementType};
use minipool_domain::error::MiniPoolError;
use minipool_domain::event::EventType;
use minipool_domain::id::{ControllerId, ElementId, ListenerId};
use minipool_domain::state::ElementState;

use super::Channel;
use crate::error::VirtualError;

/// A simulated counter/timer channel.
pub struct VirtualCounter {
    channel: Channel,
    value: Mutex<f64>,
}

impl VirtualCounter {
    pub(crate) fn new(info: ElementInfo, controller: ControllerId) -> Self {
        Self {
            channel: Channel::new(info, controller, ElementState::On),
            value: Mutex::new(0.0),
        }
    }

    #[must_use]
    pub fn controller(&self) -> ControllerId {
        self.channel.controller
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn state(&self) -> ElementState {
        self.channel.state()
    }

    pub fn set_state(&self, state: ElementState) {
        self.channel.set_state(state);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.channel.set_reachable(reachable);
    }

    /// Reset the value and start acquiring.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::NotReady`] while in `FAULT` or `DISABLE`, or
    /// [`VirtualError::Unreachable`].
    pub fn start(&self) -> Result<(), VirtualError> {
        self.channel.ensure_ready()?;
        self.record(0.0);
        self.channel.set_state(ElementState::Moving);
        Ok(())
    }

    /// Publish a new reading.
    pub fn record(&self, value: f64) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
        self.channel
            .emit(EventType::ValueChanged, serde_json::json!(value));
    }

    /// End the acquisition.
    pub fn stop(&self) {
        if self.channel.state() == ElementState::Moving {
            self.channel.set_state(ElementState::On);
        }
    }
}

impl Element for VirtualCounter {
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
