//! Type-erased component storage.
//!
//! One column per component type, each column a map from [`Entity`] to a
//! boxed value. Lookups downcast back to the concrete type.

use std::any::Any;
use std::collections::HashMap;

use crate::component::{Component, ComponentTypeId};
use crate::entity::Entity;

type Column = HashMap<Entity, Box<dyn Any + Send + Sync>>;

/// Component columns keyed by [`ComponentTypeId`].
#[derive(Default)]
pub struct ComponentStorage {
    columns: HashMap<ComponentTypeId, Column>,
}

impl ComponentStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `component` to `entity`, returning the value it replaced.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> Option<C> {
        self.columns
            .entry(C::component_type_id())
            .or_default()
            .insert(entity, Box::new(component))
            .and_then(|old| old.downcast::<C>().ok())
            .map(|old| *old)
    }

    #[must_use]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.columns
            .get(&C::component_type_id())?
            .get(&entity)?
            .downcast_ref::<C>()
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.columns
            .get_mut(&C::component_type_id())?
            .get_mut(&entity)?
            .downcast_mut::<C>()
    }

    #[must_use]
    pub fn contains(&self, entity: Entity, type_id: ComponentTypeId) -> bool {
        self.columns
            .get(&type_id)
            .is_some_and(|column| column.contains_key(&entity))
    }

    /// Drop every component attached to `entity`.
    pub fn remove_entity(&mut self, entity: Entity) {
        for column in self.columns.values_mut() {
            column.remove(&entity);
        }
    }
}

impl std::fmt::Debug for ComponentStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.columns.iter().map(|(id, column)| (id, column.len())))
            .finish()
    }
}
