//! # minipool-adapter-virtual
//!
//! Virtual hardware that provides simulated physical elements for testing and
//! demonstration purposes.
//!
//! ## Provided elements
//!
//! | Element | Type | Behaviour |
//! |---------|------|-----------|
//! | [`VirtualMotor`] | `motor` | `move_to` → `MOVING`, `stop` → `ON`, reports position |
//! | [`VirtualCounter`] | `counter_timer` | `start` → `MOVING`, `stop` → `ON`, reports value |
//!
//! Every element is created through a [`VirtualController`], which becomes its
//! owning controller in group physical indexes.
//!
//! ## Dependency rule
//!
//! Depends on `minipool-app` (port traits) and `minipool-domain` only.

mod devices;
pub mod error;

use std::sync::Arc;

use minipool_domain::element::{ElementInfo, ElementType};
use minipool_domain::error::MiniPoolError;
use minipool_domain::id::ControllerId;

pub use devices::{VirtualCounter, VirtualMotor};
pub use error::VirtualError;

/// A simulated controller owning motors and counter/timer channels.
#[derive(Debug, Clone)]
pub struct VirtualController {
    id: ControllerId,
    name: String,
}

impl VirtualController {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ControllerId::new(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a motor owned by this controller.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is empty.
    pub fn motor(&self, name: &str) -> Result<Arc<VirtualMotor>, MiniPoolError> {
        let info = ElementInfo::builder(ElementType::Motor).name(name).build()?;
        tracing::debug!(controller = %self.name, element = %name, "creating virtual motor");
        Ok(Arc::new(VirtualMotor::new(info, self.id)))
    }

    /// Create a counter/timer channel owned by this controller.
    ///
    /// # Errors
    ///
    /// Returns a validation error if `name` is empty.
    pub fn counter(&self, name: &str) -> Result<Arc<VirtualCounter>, MiniPoolError> {
        let info = ElementInfo::builder(ElementType::CounterTimer)
            .name(name)
            .build()?;
        tracing::debug!(controller = %self.name, element = %name, "creating virtual counter");
        Ok(Arc::new(VirtualCounter::new(info, self.id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minipool_app::action_cache::InMemoryActionCache;
    use minipool_app::group::Group;
    use minipool_app::ports::{Element, ElementRef};
    use minipool_domain::error::ValidationError;
    use minipool_domain::state::ElementState;

    fn group(name: &str, element_type: ElementType) -> Group {
        Group::new(ElementInfo::builder(element_type).name(name).build().unwrap()).unwrap()
    }

    #[test]
    fn should_own_created_elements() {
        let ctrl = VirtualController::new("motctrl01");
        let mot = ctrl.motor("mot01").unwrap();
        let ct = ctrl.counter("ct01").unwrap();

        assert_eq!(mot.controller(), ctrl.id());
        assert_eq!(ct.controller(), ctrl.id());
        assert_eq!(mot.element_type(), ElementType::Motor);
        assert_eq!(ct.element_type(), ElementType::CounterTimer);
    }

    #[test]
    fn should_reject_empty_element_name() {
        let ctrl = VirtualController::new("motctrl01");
        assert!(matches!(
            ctrl.motor(""),
            Err(MiniPoolError::Validation(ValidationError::EmptyName))
        ));
    }

    #[test]
    fn should_follow_motion_in_motor_group_state() {
        let ctrl = VirtualController::new("motctrl01");
        let m1 = ctrl.motor("mot01").unwrap();
        let m2 = ctrl.motor("mot02").unwrap();
        let mg = group("mg01", ElementType::MotorGroup);
        mg.add_member(m1.clone().into(), None).unwrap();
        mg.add_member(m2.clone().into(), None).unwrap();

        assert_eq!(mg.aggregate_state().unwrap().state, ElementState::On);

        m2.move_to(3.5).unwrap();
        let aggregation = mg.aggregate_state().unwrap();
        assert_eq!(aggregation.state, ElementState::Moving);
        assert_eq!(aggregation.status, vec!["mot01 is in ON", "mot02 is in MOVING"]);

        m2.stop();
        assert_eq!(mg.aggregate_state().unwrap().state, ElementState::On);
    }

    #[test]
    fn should_propagate_unreachable_channel_from_measurement_group() {
        let ctrl = VirtualController::new("ctctrl01");
        let ct = ctrl.counter("ct01").unwrap();
        let mg = group("mntgrp01", ElementType::MeasurementGroup);
        mg.add_member(ct.clone().into(), None).unwrap();

        ct.set_reachable(false);

        assert!(matches!(
            mg.aggregate_state(),
            Err(MiniPoolError::Inspection(_))
        ));
    }

    #[test]
    fn should_index_channels_of_two_controllers() {
        let motctrl = VirtualController::new("motctrl01");
        let ctctrl = VirtualController::new("ctctrl01");
        let mot: ElementRef = motctrl.motor("mot01").unwrap().into();
        let ct: ElementRef = ctctrl.counter("ct01").unwrap().into();

        let mg = group("mntgrp01", ElementType::MeasurementGroup);
        let cache = Arc::new(InMemoryActionCache::new());
        mg.set_action_cache(cache.clone());
        mg.add_member(mot.clone(), None).unwrap();
        mg.add_member(ct.clone(), None).unwrap();

        let index = mg.physical_elements();
        assert!(index.get(motctrl.id()).unwrap().contains(&mot));
        assert!(index.get(ctctrl.id()).unwrap().contains(&ct));
        assert_eq!(cache.len(), 2);
    }
}
