//! In-crate fakes shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use minipool_domain::element::{ElementInfo, ElementType};
use minipool_domain::error::MiniPoolError;
use minipool_domain::event::{ElementEvent, EventType};
use minipool_domain::id::{ControllerId, ElementId, ListenerId};
use minipool_domain::state::ElementState;

use crate::listeners::ListenerRegistry;
use crate::physical::Reachability;
use crate::ports::{Element, ElementListener, ElementRef, Role};

/// Leaf element with a settable state and inspection counter.
pub struct FakePhysical {
    info: ElementInfo,
    controller: ControllerId,
    state: Mutex<Option<ElementState>>,
    inspections: AtomicUsize,
    listeners: ListenerRegistry,
}

impl FakePhysical {
    pub fn shared(name: &str, controller: ControllerId) -> Arc<Self> {
        Arc::new(Self {
            info: ElementInfo::builder(ElementType::Motor)
                .name(name)
                .build()
                .unwrap(),
            controller,
            state: Mutex::new(Some(ElementState::On)),
            inspections: AtomicUsize::new(0),
            listeners: ListenerRegistry::new(),
        })
    }

    pub fn element(name: &str, controller: ControllerId) -> ElementRef {
        Self::shared(name, controller).into()
    }

    pub fn with_state(name: &str, state: ElementState) -> Arc<Self> {
        let fake = Self::shared(name, ControllerId::new());
        fake.set_state(state);
        fake
    }

    pub fn set_state(&self, state: ElementState) {
        *self.state.lock().unwrap() = Some(state);
        self.listeners.notify(&ElementEvent::new(
            self.info.id,
            EventType::StateChanged,
            serde_json::json!(state),
        ));
    }

    /// Make every following inspection fail.
    pub fn break_inspection(&self) {
        *self.state.lock().unwrap() = None;
    }

    pub fn inspections(&self) -> usize {
        self.inspections.load(Ordering::SeqCst)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Element for FakePhysical {
    fn id(&self) -> ElementId {
        self.info.id
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    fn element_type(&self) -> ElementType {
        self.info.element_type
    }

    fn role(&self) -> Role {
        Role::Physical {
            controller: self.controller,
        }
    }

    fn inspect_state(&self) -> Result<ElementState, MiniPoolError> {
        self.inspections.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().ok_or_else(|| {
            MiniPoolError::Inspection(Box::new(std::io::Error::other(format!(
                "{} is unreachable",
                self.info.name
            ))))
        })
    }

    fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool {
        self.listeners.subscribe(id, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// Composite with a fixed member list, e.g. a pseudo motor.
pub struct FakeComposite {
    info: ElementInfo,
    reach: Reachability,
    listeners: ListenerRegistry,
}

impl FakeComposite {
    pub fn element(name: &str, members: &[&ElementRef]) -> ElementRef {
        Arc::new(Self {
            info: ElementInfo::builder(ElementType::PseudoMotor)
                .name(name)
                .build()
                .unwrap(),
            reach: Reachability::of(members.iter().copied()),
            listeners: ListenerRegistry::new(),
        })
        .into()
    }
}

impl Element for FakeComposite {
    fn id(&self) -> ElementId {
        self.info.id
    }

    fn name(&self) -> &str {
        &self.info.name
    }

    fn element_type(&self) -> ElementType {
        self.info.element_type
    }

    fn role(&self) -> Role {
        Role::Composite(self.reach.clone())
    }

    fn inspect_state(&self) -> Result<ElementState, MiniPoolError> {
        Ok(ElementState::On)
    }

    fn subscribe(&self, id: ListenerId, listener: Arc<dyn ElementListener>) -> bool {
        self.listeners.subscribe(id, listener)
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
