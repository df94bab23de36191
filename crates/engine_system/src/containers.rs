//! Item slots: named single-item containers on an entity.
//!
//! An entity with [`ItemSlots`] owns any number of slots, each holding at
//! most one item. Inserting moves the item onto the owner, parents it there
//! and raises [`EntInsertedIntoContainer`] on the owner; ejecting re-roots
//! the item and raises [`EntRemovedFromContainer`].

use std::collections::BTreeMap;

use engine_component::{Component, Entity};
use engine_math::{Transform, Vec3};
use engine_world::World;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::SystemContext;
use crate::error::{ContainerError, SystemError};
use crate::event::{EntInsertedIntoContainer, EntRemovedFromContainer};
use crate::registry::EventRegistry;
use crate::system::EntitySystem;

/// A single item position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSlot {
    #[serde(default)]
    pub item: Option<Entity>,
    /// Locked slots refuse both insertion and ejection.
    #[serde(default)]
    pub locked: bool,
}

impl ItemSlot {
    /// The contained item, ignoring handles to entities that no longer exist.
    #[must_use]
    pub fn item_in(&self, world: &World) -> Option<Entity> {
        self.item.filter(|item| world.exists(*item))
    }
}

/// The slots an entity owns, by slot id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSlots {
    #[serde(default)]
    pub slots: BTreeMap<String, ItemSlot>,
}

impl ItemSlots {
    /// Add an empty slot.
    #[must_use]
    pub fn with_slot(mut self, id: impl Into<String>) -> Self {
        self.slots.insert(id.into(), ItemSlot::default());
        self
    }

    #[must_use]
    pub fn get_slot(&self, id: &str) -> Option<&ItemSlot> {
        self.slots.get(id)
    }

    pub fn get_slot_mut(&mut self, id: &str) -> Option<&mut ItemSlot> {
        self.slots.get_mut(id)
    }
}

impl Component for ItemSlots {
    fn type_name() -> &'static str {
        "ItemSlots"
    }
}

/// Owns the [`ItemSlots`] component and the insert/eject operations.
#[derive(Debug, Default)]
pub struct ItemSlotsSystem;

impl ItemSlotsSystem {
    pub const NAME: &'static str = "item_slots";

    /// Resolve slot `slot_id` on `owner`.
    ///
    /// `None` when the owner has no [`ItemSlots`] or no such slot.
    #[must_use]
    pub fn try_get_slot<'w>(world: &'w World, owner: Entity, slot_id: &str) -> Option<&'w ItemSlot> {
        world.get::<ItemSlots>(owner)?.get_slot(slot_id)
    }

    /// The slot currently holding `item`, as `(owner, slot id)`.
    #[must_use]
    pub fn containing_slot(world: &World, item: Entity) -> Option<(Entity, String)> {
        world.entities().into_iter().find_map(|owner| {
            let slots = world.get::<ItemSlots>(owner)?;
            slots
                .slots
                .iter()
                .find(|(_, slot)| slot.item_in(world) == Some(item))
                .map(|(id, _)| (owner, id.clone()))
        })
    }

    /// Put `item` into slot `slot_id` on `owner`.
    ///
    /// # Errors
    ///
    /// Refuses missing items, items already held by a slot, missing or
    /// unknown slots, and locked or occupied slots.
    pub fn try_insert(
        ctx: &mut SystemContext<'_>,
        owner: Entity,
        slot_id: &str,
        item: Entity,
    ) -> Result<(), ContainerError> {
        if !ctx.world().exists(item) {
            return Err(ContainerError::MissingItem(item));
        }
        if let Some((holder, slot)) = Self::containing_slot(ctx.world(), item) {
            return Err(ContainerError::AlreadyContained {
                item,
                owner: holder,
                slot,
            });
        }
        let slot = Self::checked_slot(ctx.world(), owner, slot_id)?;
        if slot.item_in(ctx.world()).is_some() {
            return Err(ContainerError::Occupied {
                owner,
                slot: slot_id.to_string(),
            });
        }

        ctx.world_mut().set_parent(item, owner)?;
        if let Some(transform) = ctx.world_mut().get_mut::<Transform>(item) {
            transform.local_position = Vec3::ZERO;
        }
        if let Some(slot) = ctx
            .world_mut()
            .get_mut::<ItemSlots>(owner)
            .and_then(|slots| slots.get_slot_mut(slot_id))
        {
            slot.item = Some(item);
        }
        info!(%owner, %item, slot = slot_id, "inserted into slot");

        let mut event = EntInsertedIntoContainer {
            container_id: slot_id.to_string(),
            entity: item,
            owner,
        };
        ctx.raise_local_event(owner, &mut event);
        Ok(())
    }

    /// Take whatever is in slot `slot_id` on `owner` out and drop it beside
    /// the owner.
    ///
    /// # Errors
    ///
    /// Refuses missing, unknown, locked or empty slots.
    pub fn try_eject(ctx: &mut SystemContext<'_>, owner: Entity, slot_id: &str) -> Result<Entity, ContainerError> {
        let slot = Self::checked_slot(ctx.world(), owner, slot_id)?;
        let item = slot.item_in(ctx.world()).ok_or_else(|| ContainerError::Empty {
            owner,
            slot: slot_id.to_string(),
        })?;

        if let Some(slot) = ctx
            .world_mut()
            .get_mut::<ItemSlots>(owner)
            .and_then(|slots| slots.get_slot_mut(slot_id))
        {
            slot.item = None;
        }
        ctx.world_mut().detach(item)?;
        info!(%owner, %item, slot = slot_id, "ejected from slot");

        let mut event = EntRemovedFromContainer {
            container_id: slot_id.to_string(),
            entity: item,
            owner,
        };
        ctx.raise_local_event(owner, &mut event);
        Ok(item)
    }

    fn checked_slot<'w>(world: &'w World, owner: Entity, slot_id: &str) -> Result<&'w ItemSlot, ContainerError> {
        let slots = world
            .get::<ItemSlots>(owner)
            .ok_or(ContainerError::NoSlots(owner))?;
        let slot = slots
            .get_slot(slot_id)
            .ok_or_else(|| ContainerError::UnknownSlot {
                owner,
                slot: slot_id.to_string(),
            })?;
        if slot.locked {
            return Err(ContainerError::Locked {
                owner,
                slot: slot_id.to_string(),
            });
        }
        Ok(slot)
    }
}

impl EntitySystem for ItemSlotsSystem {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&self, world: &mut World, _registry: &mut EventRegistry) -> Result<(), SystemError> {
        world.register_component::<ItemSlots>();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::ExecutionRole;

    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    struct InsertLog {
        seen: Vec<(String, Entity)>,
    }

    impl Component for InsertLog {
        fn type_name() -> &'static str {
            "InsertLog"
        }
    }

    fn log_insert(ctx: &mut SystemContext<'_>, owner: Entity, _: &InsertLog, ev: &mut EntInsertedIntoContainer) {
        if let Some(log) = ctx.world_mut().get_mut::<InsertLog>(owner) {
            log.seen.push((ev.container_id.clone(), ev.entity));
        }
    }

    fn setup() -> (World, EventRegistry, Entity, Entity) {
        let mut world = World::new();
        let mut registry = EventRegistry::new();
        ItemSlotsSystem.initialize(&mut world, &mut registry).unwrap();
        registry
            .subscribe_local::<InsertLog, EntInsertedIntoContainer>("test", log_insert)
            .unwrap();

        let owner = world.spawn("locker");
        world
            .insert(owner, ItemSlots::default().with_slot("main").with_slot("side"))
            .unwrap();
        world.insert(owner, InsertLog::default()).unwrap();
        let item = world.spawn("wrench");
        (world, registry, owner, item)
    }

    #[test]
    fn test_insert_parents_and_raises_event() {
        let (mut world, registry, owner, item) = setup();
        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);

        ItemSlotsSystem::try_insert(&mut ctx, owner, "main", item).unwrap();

        let world = ctx.world();
        assert_eq!(world.parent(item), Some(owner));
        assert_eq!(world.world_position(item), world.world_position(owner));
        assert_eq!(
            ItemSlotsSystem::try_get_slot(world, owner, "main").unwrap().item,
            Some(item)
        );
        assert_eq!(
            world.get::<InsertLog>(owner).unwrap().seen,
            vec![("main".to_string(), item)]
        );
    }

    #[test]
    fn test_insert_into_occupied_slot_fails() {
        let (mut world, registry, owner, item) = setup();
        let other = world.spawn("screwdriver");
        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);

        ItemSlotsSystem::try_insert(&mut ctx, owner, "main", item).unwrap();
        let err = ItemSlotsSystem::try_insert(&mut ctx, owner, "main", other).unwrap_err();
        assert!(matches!(err, ContainerError::Occupied { .. }));
        assert_eq!(ctx.world().parent(other), None);
    }

    #[test]
    fn test_insert_refusals() {
        let (mut world, registry, owner, item) = setup();
        let bare = world.spawn("bare");
        world
            .get_mut::<ItemSlots>(owner)
            .unwrap()
            .get_slot_mut("side")
            .unwrap()
            .locked = true;
        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);

        assert!(matches!(
            ItemSlotsSystem::try_insert(&mut ctx, bare, "main", item),
            Err(ContainerError::NoSlots(_))
        ));
        assert!(matches!(
            ItemSlotsSystem::try_insert(&mut ctx, owner, "hatch", item),
            Err(ContainerError::UnknownSlot { .. })
        ));
        assert!(matches!(
            ItemSlotsSystem::try_insert(&mut ctx, owner, "side", item),
            Err(ContainerError::Locked { .. })
        ));
        assert!(matches!(
            ItemSlotsSystem::try_insert(&mut ctx, owner, "main", Entity::from_raw(999)),
            Err(ContainerError::MissingItem(_))
        ));
        assert!(ctx.world().get::<InsertLog>(owner).unwrap().seen.is_empty());
    }

    #[test]
    fn test_eject_empties_slot() {
        let (mut world, registry, owner, item) = setup();
        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);

        ItemSlotsSystem::try_insert(&mut ctx, owner, "main", item).unwrap();
        assert_eq!(ItemSlotsSystem::try_eject(&mut ctx, owner, "main").unwrap(), item);
        assert_eq!(ctx.world().parent(item), None);
        assert!(matches!(
            ItemSlotsSystem::try_eject(&mut ctx, owner, "main"),
            Err(ContainerError::Empty { .. })
        ));
    }

    #[test]
    fn test_item_held_elsewhere_is_refused() {
        let (mut world, registry, owner, item) = setup();
        let other = world.spawn("crate");
        world.insert(other, ItemSlots::default().with_slot("main")).unwrap();
        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);

        ItemSlotsSystem::try_insert(&mut ctx, owner, "main", item).unwrap();
        let err = ItemSlotsSystem::try_insert(&mut ctx, other, "main", item).unwrap_err();
        assert!(matches!(
            err,
            ContainerError::AlreadyContained { owner: holder, ref slot, .. } if holder == owner && slot == "main"
        ));
        // Same owner, other slot: still one slot per item.
        assert!(matches!(
            ItemSlotsSystem::try_insert(&mut ctx, owner, "side", item),
            Err(ContainerError::AlreadyContained { .. })
        ));

        let world = ctx.world();
        assert_eq!(world.parent(item), Some(owner));
        assert_eq!(ItemSlotsSystem::try_get_slot(world, other, "main").unwrap().item, None);
        assert_eq!(
            ItemSlotsSystem::containing_slot(world, item),
            Some((owner, "main".to_string()))
        );
    }

    #[test]
    fn test_ejected_item_can_move_to_another_owner() {
        let (mut world, registry, owner, item) = setup();
        let other = world.spawn("crate");
        world.insert(other, ItemSlots::default().with_slot("main")).unwrap();
        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);

        ItemSlotsSystem::try_insert(&mut ctx, owner, "main", item).unwrap();
        ItemSlotsSystem::try_eject(&mut ctx, owner, "main").unwrap();
        ItemSlotsSystem::try_insert(&mut ctx, other, "main", item).unwrap();
        assert_eq!(ctx.world().parent(item), Some(other));
        assert_eq!(
            ItemSlotsSystem::containing_slot(ctx.world(), item),
            Some((other, "main".to_string()))
        );
    }

    #[test]
    fn test_deleted_item_leaves_slot_free() {
        let (mut world, registry, owner, item) = setup();
        let other = world.spawn("screwdriver");
        {
            let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);
            ItemSlotsSystem::try_insert(&mut ctx, owner, "main", item).unwrap();
        }
        world.queue_delete(item);
        world.flush_deletions();

        let mut ctx = SystemContext::new(&mut world, &registry, ExecutionRole::Authoritative);
        ItemSlotsSystem::try_insert(&mut ctx, owner, "main", other).unwrap();
    }
}
