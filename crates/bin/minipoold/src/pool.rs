//! Pool assembly: turns a [`Config`] into live controllers, elements and
//! groups.
//!
//! Elements are created first, then groups in declaration order. Every group
//! is registered as soon as it is built, so later groups can nest it. Each
//! group owns its own [`InMemoryActionCache`].

use std::collections::BTreeMap;
use std::sync::Arc;

use minipool_adapter_virtual::{VirtualController, VirtualCounter, VirtualMotor};
use minipool_app::action_cache::InMemoryActionCache;
use minipool_app::group::Group;
use minipool_app::ports::ElementRef;
use minipool_app::registry::ElementRegistry;
use minipool_domain::element::ElementInfo;
use minipool_domain::error::MiniPoolError;

use crate::config::{Config, ElementConfig, ElementKind, GroupConfig};

/// Errors raised while assembling a pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("element {element:?} references unknown controller {controller:?}")]
    UnknownController { element: String, controller: String },

    #[error("group {group:?} references unknown member {member:?}")]
    UnknownMember { group: String, member: String },

    #[error("failed to build {name:?}")]
    Element {
        name: String,
        #[source]
        source: MiniPoolError,
    },
}

/// A built group and the action cache it keeps in sync.
pub struct PoolGroup {
    pub group: Arc<Group>,
    pub action_cache: Arc<InMemoryActionCache>,
}

/// Every controller, element and group declared by a configuration.
pub struct Pool {
    controllers: BTreeMap<String, VirtualController>,
    motors: Vec<Arc<VirtualMotor>>,
    counters: Vec<Arc<VirtualCounter>>,
    groups: Vec<PoolGroup>,
    registry: ElementRegistry,
}

impl Pool {
    /// Build the pool described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError`] if an element names an undeclared controller, a
    /// group names a member not declared before it, or a group rejects a
    /// member.
    pub fn build(config: &Config) -> Result<Self, PoolError> {
        let mut pool = Self {
            controllers: config
                .controllers
                .iter()
                .map(|c| (c.name.clone(), VirtualController::new(c.name.clone())))
                .collect(),
            motors: Vec::new(),
            counters: Vec::new(),
            groups: Vec::new(),
            registry: ElementRegistry::new(),
        };
        for element in &config.elements {
            pool.add_element(element)?;
        }
        for group in &config.groups {
            pool.add_group(group)?;
        }
        tracing::info!(
            controllers = pool.controllers.len(),
            elements = pool.registry.len(),
            groups = pool.groups.len(),
            "pool built"
        );
        Ok(pool)
    }

    fn add_element(&mut self, config: &ElementConfig) -> Result<(), PoolError> {
        let controller = self.controllers.get(&config.controller).ok_or_else(|| {
            PoolError::UnknownController {
                element: config.name.clone(),
                controller: config.controller.clone(),
            }
        })?;
        let failed = |source: MiniPoolError| PoolError::Element {
            name: config.name.clone(),
            source,
        };
        let element: ElementRef = match config.kind {
            ElementKind::Motor => {
                let motor = controller.motor(&config.name).map_err(failed)?;
                motor.set_state(config.state);
                self.motors.push(Arc::clone(&motor));
                motor.into()
            }
            ElementKind::Counter => {
                let counter = controller.counter(&config.name).map_err(failed)?;
                counter.set_state(config.state);
                self.counters.push(Arc::clone(&counter));
                counter.into()
            }
        };
        self.registry.register(element).map_err(failed)
    }

    fn add_group(&mut self, config: &GroupConfig) -> Result<(), PoolError> {
        let failed = |source: MiniPoolError| PoolError::Element {
            name: config.name.clone(),
            source,
        };
        let member_ids = config
            .members
            .iter()
            .map(|member| {
                self.registry
                    .get_by_name(member)
                    .map(|element| element.id())
                    .ok_or_else(|| PoolError::UnknownMember {
                        group: config.name.clone(),
                        member: member.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let info = ElementInfo::builder(config.kind.element_type())
            .name(&config.name)
            .build()
            .map_err(failed)?;
        let group = Group::with_members(info, &member_ids, &self.registry).map_err(failed)?;
        let group = Arc::new(group);
        let action_cache = Arc::new(InMemoryActionCache::new());
        group.set_action_cache(action_cache.clone());

        self.registry
            .register(Arc::clone(&group).into())
            .map_err(failed)?;
        self.groups.push(PoolGroup {
            group,
            action_cache,
        });
        Ok(())
    }

    #[must_use]
    pub fn controller(&self, name: &str) -> Option<&VirtualController> {
        self.controllers.get(name)
    }

    /// Groups in declaration order.
    pub fn groups(&self) -> impl Iterator<Item = &PoolGroup> {
        self.groups.iter()
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&PoolGroup> {
        self.groups.iter().find(|g| g.group.info().name == name)
    }

    pub fn motors(&self) -> impl Iterator<Item = &Arc<VirtualMotor>> {
        self.motors.iter()
    }

    pub fn counters(&self) -> impl Iterator<Item = &Arc<VirtualCounter>> {
        self.counters.iter()
    }

    /// Any element or group by name.
    #[must_use]
    pub fn element(&self, name: &str) -> Option<ElementRef> {
        self.registry.get_by_name(name)
    }
}
