//! System runner: the host side of the event loop.
//!
//! The runner owns the world and the subscription table for one simulation
//! instance. Hosts feed it interactions ("this user used that entity"),
//! and call [`SystemRunner::flush`] at the end of each update to process
//! deferred deletions.

use engine_component::Entity;
use engine_world::World;
use tracing::info;

use crate::config::SimulationConfig;
use crate::containers::ItemSlotsSystem;
use crate::context::SystemContext;
use crate::error::{ContainerError, SystemError};
use crate::event::{ActivateInWorldEvent, Event, ExaminedEvent};
use crate::registry::EventRegistry;
use crate::role::ExecutionRole;
use crate::system::EntitySystem;

/// One simulation instance: world, systems and role.
#[derive(Debug)]
pub struct SystemRunner {
    config: SimulationConfig,
    world: World,
    registry: EventRegistry,
    systems: Vec<&'static str>,
}

impl SystemRunner {
    /// Create a runner with an empty world and the built-in
    /// [`ItemSlotsSystem`] installed.
    ///
    /// # Errors
    ///
    /// Propagates initialization failures of the built-in systems.
    pub fn new(config: SimulationConfig) -> Result<Self, SystemError> {
        let mut runner = Self {
            config,
            world: World::new(),
            registry: EventRegistry::new(),
            systems: Vec::new(),
        };
        runner.add_system(&ItemSlotsSystem)?;
        Ok(runner)
    }

    /// Initialize and register a system.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::DuplicateSystem`] if a system with the same
    /// name is already registered, or whatever the system's `initialize`
    /// reports.
    pub fn add_system(&mut self, system: &dyn EntitySystem) -> Result<&mut Self, SystemError> {
        let name = system.name();
        if self.systems.contains(&name) {
            return Err(SystemError::DuplicateSystem(name));
        }
        system.initialize(&mut self.world, &mut self.registry)?;
        self.systems.push(name);
        info!(
            system = name,
            role = %self.config.role,
            subscriptions = self.registry.subscription_count(),
            "system initialized"
        );
        Ok(self)
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn role(&self) -> ExecutionRole {
        self.config.role
    }

    /// Names of the registered systems, in registration order.
    #[must_use]
    pub fn systems(&self) -> &[&'static str] {
        &self.systems
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// A dispatch context for this instance.
    pub fn context(&mut self) -> SystemContext<'_> {
        SystemContext::new(&mut self.world, &self.registry, self.config.role)
    }

    /// Raise `event` on `target`. Returns the number of handlers that ran.
    pub fn raise_local_event<E: Event>(&mut self, target: Entity, event: &mut E) -> usize {
        self.context().raise_local_event(target, event)
    }

    /// `user` uses `target`.
    pub fn activate(&mut self, user: Entity, target: Entity) -> ActivateInWorldEvent {
        let mut event = ActivateInWorldEvent::new(user, target, false);
        self.raise_local_event(target, &mut event);
        event
    }

    /// `examiner` examines `target`; returns the collected text.
    pub fn examine(&mut self, examiner: Entity, target: Entity) -> ExaminedEvent {
        let mut event = ExaminedEvent::new(examiner, target);
        self.raise_local_event(target, &mut event);
        event
    }

    /// See [`ItemSlotsSystem::try_insert`].
    ///
    /// # Errors
    ///
    /// Returns the slot refusal.
    pub fn insert_into_slot(&mut self, owner: Entity, slot_id: &str, item: Entity) -> Result<(), ContainerError> {
        ItemSlotsSystem::try_insert(&mut self.context(), owner, slot_id, item)
    }

    /// See [`ItemSlotsSystem::try_eject`].
    ///
    /// # Errors
    ///
    /// Returns the slot refusal.
    pub fn eject_from_slot(&mut self, owner: Entity, slot_id: &str) -> Result<Entity, ContainerError> {
        ItemSlotsSystem::try_eject(&mut self.context(), owner, slot_id)
    }

    /// End-of-update synchronization point: removes queued entities.
    pub fn flush(&mut self) -> Vec<Entity> {
        self.world.flush_deletions()
    }
}
