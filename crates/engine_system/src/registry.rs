//! Event subscription registry.
//!
//! Systems declare, at initialization, which events they handle and through
//! which component: "call `on_examined` when an `ExaminedEvent` is raised on
//! an entity that has a `ModularComputer`". The registry keeps those
//! declarations in registration order, keyed by event type.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use engine_component::{Component, ComponentTypeId, Entity};

use crate::context::SystemContext;
use crate::error::SystemError;
use crate::event::{self, Event};

/// A typed event handler: context, owning entity, a snapshot of the owner's
/// component, and the event.
pub type Handler<C, E> = fn(&mut SystemContext<'_>, Entity, &C, &mut E);

type ErasedHandler = Box<dyn Fn(&mut SystemContext<'_>, Entity, &mut dyn Any) + Send + Sync>;

fn erase<F>(handler: F) -> ErasedHandler
where
    F: Fn(&mut SystemContext<'_>, Entity, &mut dyn Any) + Send + Sync + 'static,
{
    Box::new(handler)
}

/// One registered handler.
pub(crate) struct Subscription {
    pub(crate) system: &'static str,
    pub(crate) component: ComponentTypeId,
    pub(crate) component_name: &'static str,
    pub(crate) handler: ErasedHandler,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("system", &self.system)
            .field("component", &self.component_name)
            .finish_non_exhaustive()
    }
}

/// All subscriptions, keyed by event type.
#[derive(Debug, Default)]
pub struct EventRegistry {
    subscriptions: HashMap<TypeId, Vec<Subscription>>,
}

impl EventRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to events of type `E` raised on entities that
    /// have a `C`.
    ///
    /// The handler receives a clone of the owner's `C` taken just before the
    /// call; changes must be written back through the world.
    ///
    /// # Errors
    ///
    /// Returns [`SystemError::DuplicateSubscription`] if `system` already
    /// handles `E` through `C`.
    pub fn subscribe_local<C, E>(&mut self, system: &'static str, handler: Handler<C, E>) -> Result<(), SystemError>
    where
        C: Component + Clone,
        E: Event,
    {
        let component = C::component_type_id();
        let entries = self.subscriptions.entry(TypeId::of::<E>()).or_default();
        if entries
            .iter()
            .any(|s| s.system == system && s.component == component)
        {
            return Err(SystemError::DuplicateSubscription {
                system,
                component: C::type_name(),
                event: E::event_name(),
            });
        }

        let erased = erase(move |ctx, owner, event| {
            let Some(component) = ctx.world().get::<C>(owner).cloned() else {
                return;
            };
            let Some(event) = event::downcast::<E>(event) else {
                return;
            };
            handler(ctx, owner, &component, event);
        });

        entries.push(Subscription {
            system,
            component,
            component_name: C::type_name(),
            handler: erased,
        });
        Ok(())
    }

    /// Subscriptions for `E`, in registration order.
    pub(crate) fn subscriptions_for<E: Event>(&self) -> &[Subscription] {
        self.subscriptions
            .get(&TypeId::of::<E>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(system, component)` pairs subscribed to `E`, in dispatch order.
    #[must_use]
    pub fn subscribers<E: Event>(&self) -> Vec<(&'static str, &'static str)> {
        self.subscriptions_for::<E>()
            .iter()
            .map(|s| (s.system, s.component_name))
            .collect()
    }

    /// Total number of subscriptions across all event types.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.values().map(Vec::len).sum()
    }
}
