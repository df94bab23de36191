//! Per-dispatch execution context handed to event handlers.

use engine_component::Entity;
use engine_world::World;
use tracing::debug;

use crate::event::Event;
use crate::registry::EventRegistry;
use crate::role::ExecutionRole;

/// What a handler can see and touch while it runs.
///
/// Carries the world, the subscription table (so handlers can raise further
/// events) and the execution role of this simulation instance.
pub struct SystemContext<'a> {
    world: &'a mut World,
    registry: &'a EventRegistry,
    role: ExecutionRole,
}

impl<'a> SystemContext<'a> {
    #[must_use]
    pub fn new(world: &'a mut World, registry: &'a EventRegistry, role: ExecutionRole) -> Self {
        Self {
            world,
            registry,
            role,
        }
    }

    #[must_use]
    pub fn world(&self) -> &World {
        self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.world
    }

    #[must_use]
    pub fn role(&self) -> ExecutionRole {
        self.role
    }

    /// Shorthand for `self.role().is_authoritative()`.
    #[must_use]
    pub fn is_authoritative(&self) -> bool {
        self.role.is_authoritative()
    }

    /// Deliver `event` to every handler subscribed to `E` through a
    /// component `target` has, in registration order.
    ///
    /// Handlers may raise further events from inside. Returns the number of
    /// handlers that ran.
    pub fn raise_local_event<E: Event>(&mut self, target: Entity, event: &mut E) -> usize {
        let registry = self.registry;
        let mut delivered = 0;
        for subscription in registry.subscriptions_for::<E>() {
            if !self.world.has_component_id(target, subscription.component) {
                continue;
            }
            debug!(
                event = E::event_name(),
                %target,
                system = subscription.system,
                component = subscription.component_name,
                role = %self.role,
                "dispatching"
            );
            (subscription.handler)(self, target, event);
            delivered += 1;
        }
        delivered
    }
}

impl std::fmt::Debug for SystemContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemContext")
            .field("role", &self.role)
            .field("entities", &self.world.entity_count())
            .finish_non_exhaustive()
    }
}
