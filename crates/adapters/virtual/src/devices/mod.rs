//! Virtual channel implementations: motor and counter/timer.
//!
//! Every channel is a physical element: it belongs to exactly one
//! [`VirtualController`](crate::VirtualController) and emits change events to
//! its subscribers whenever its state or reading changes.

mod counter;
mod motor;

pub use counter::VirtualCounter;
pub use motor::VirtualMotor;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use minipool_app::listeners::ListenerRegistry;
use minipool_app::ports::{ElementListener, Role};
use minipool_domain::element::ElementInfo;
use minipool_domain::event::{ElementEvent, EventType};
use minipool_domain::id::{ControllerId, ListenerId};
use minipool_domain::state::ElementState;

use crate::error::VirtualError;

/// State and subscriptions shared by every virtual channel.
struct Channel {
    info: ElementInfo,
    controller: ControllerId,
    status: Mutex<Status>,
    listeners: ListenerRegistry,
}

struct Status {
    state: ElementState,
    reachable: bool,
}

impl Channel {
    fn new(info: ElementInfo, controller: ControllerId, state: ElementState) -> Self {
        Self {
            info,
            controller,
            status: Mutex::new(Status {
                state,
                reachable: true,
            }),
            listeners: ListenerRegistry::new(),
        }
    }

    fn role(&self) -> Role {
        Role::Physical {
            controller: self.controller,
        }
    }

    fn read_state(&self) -> Result<ElementState, VirtualError> {
        let status = self.lock();
        if !status.reachable {
            return Err(VirtualError::Unreachable {
                element: self.info.name.clone(),
            });
        }
        Ok(status.state)
    }

    /// Current state, ignoring reachability.
    fn state(&self) -> ElementState {
        self.lock().state
    }

    fn set_state(&self, state: ElementState) {
        let changed = {
            let mut status = self.lock();
            let changed = status.state != state;
            status.state = state;
            changed
        };
        if changed {
            tracing::debug!(element = %self.info.name, %state, "state changed");
            self.emit(EventType::StateChanged, serde_json::json!(state));
        }
    }

    fn set_reachable(&self, reachable: bool) {
        self.lock().reachable = reachable;
    }

    /// Reject commands while faulted, disabled, or unreachable.
    fn ensure_ready(&self) -> Result<(), VirtualError> {
        let state = self.read_state()?;
        if matches!(state, ElementState::Fault | ElementState::Disable) {
            return Err(VirtualError::NotReady {
                element: self.info.name.clone(),
                state,
            });
        }
        Ok(())
    }

    fn emit(&self, event_type: EventType, value: serde_json::Value) {
        self.listeners
            .notify(&ElementEvent::new(self.info.id, event_type, value));
    }

    fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool {
        self.listeners.subscribe(id, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn lock(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
