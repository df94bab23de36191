//! World state storage.
//!
//! The [`World`] holds every live entity and its components. It is the only
//! place entities are created or destroyed. Destruction is two-phase: callers
//! queue an entity with [`World::queue_delete`] and the owner of the update
//! cycle removes queued entities at a defined point with
//! [`World::flush_deletions`].

use std::collections::{BTreeSet, HashSet};

use engine_component::{Component, ComponentCatalog, ComponentStorage, ComponentTypeId, Entity, EntityAllocator};
use engine_math::{EntityCoordinates, Transform, Vec3};
use tracing::{debug, info};

use crate::audio::{AudioOutbox, AudioParams, PlayedSound, SoundSpecifier};
use crate::error::WorldError;
use crate::metadata::MetaData;
use crate::popup::{Popup, PopupOutbox};
use crate::prototype::PrototypeRegistry;

/// Entity and component storage plus the side-effect outboxes.
#[derive(Debug)]
pub struct World {
    allocator: EntityAllocator,
    live: HashSet<Entity>,
    storage: ComponentStorage,
    catalog: ComponentCatalog,
    prototypes: PrototypeRegistry,
    /// Entities marked for removal at the next flush.
    pending_deletion: BTreeSet<Entity>,
    audio: AudioOutbox,
    popups: PopupOutbox,
}

impl World {
    /// Create an empty world. [`MetaData`] and [`Transform`] are registered.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<MetaData>();
        catalog.register::<Transform>();
        Self {
            allocator: EntityAllocator::new(),
            live: HashSet::new(),
            storage: ComponentStorage::new(),
            catalog,
            prototypes: PrototypeRegistry::new(),
            pending_deletion: BTreeSet::new(),
            audio: AudioOutbox::default(),
            popups: PopupOutbox::default(),
        }
    }

    /// Make `C` constructible from prototype data.
    pub fn register_component<C: Component>(&mut self) {
        self.catalog.register::<C>();
    }

    #[must_use]
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn prototypes(&self) -> &PrototypeRegistry {
        &self.prototypes
    }

    pub fn prototypes_mut(&mut self) -> &mut PrototypeRegistry {
        &mut self.prototypes
    }

    // -- Entity lifecycle --

    /// Spawn a bare entity at the world root with only a name.
    pub fn spawn(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.allocator.allocate();
        self.live.insert(entity);
        self.storage.insert(entity, MetaData::named(name));
        self.storage.insert(entity, Transform::default());
        entity
    }

    /// Spawn an entity from a prototype at the world position of `coords`.
    ///
    /// The new entity sits at the root of the hierarchy.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownPrototype`] for an unknown id,
    /// [`WorldError::EntityNotFound`] if the coordinates' entity is gone, and
    /// [`WorldError::Component`] if any component fails to build. Nothing is
    /// spawned on error.
    pub fn spawn_at(&mut self, prototype_id: &str, coords: EntityCoordinates) -> Result<Entity, WorldError> {
        let prototype = self
            .prototypes
            .get(prototype_id)
            .ok_or_else(|| WorldError::UnknownPrototype(prototype_id.to_string()))?
            .clone();
        let position = self.resolve(coords)?;

        let entity = self.allocator.allocate();
        for (name, value) in prototype.components.iter() {
            if let Err(source) = self
                .catalog
                .insert_from_json(&mut self.storage, entity, name, value.clone())
            {
                self.storage.remove_entity(entity);
                return Err(WorldError::Component {
                    prototype: prototype.id.clone(),
                    source,
                });
            }
        }

        self.live.insert(entity);
        self.storage.insert(
            entity,
            MetaData {
                name: prototype.display_name().to_string(),
                description: prototype.description.clone(),
                prototype: Some(prototype.id.clone()),
            },
        );
        self.storage.insert(entity, Transform::at(position));

        debug!(%entity, prototype = %prototype.id, "spawned from prototype");
        Ok(entity)
    }

    /// Check if an entity is alive (queued entities are still alive).
    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.live.contains(&entity)
    }

    /// All live entities, sorted.
    #[must_use]
    pub fn entities(&self) -> Vec<Entity> {
        let mut all: Vec<_> = self.live.iter().copied().collect();
        all.sort();
        all
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.live.len()
    }

    /// The entity's display name.
    #[must_use]
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.get::<MetaData>(entity).map(|meta| meta.name.as_str())
    }

    // -- Deferred deletion --

    /// Mark `entity` for removal at the next [`World::flush_deletions`].
    ///
    /// Returns `false` if the entity is not alive. Queuing twice is a no-op.
    pub fn queue_delete(&mut self, entity: Entity) -> bool {
        if !self.exists(entity) {
            return false;
        }
        if self.pending_deletion.insert(entity) {
            debug!(%entity, "queued for deletion");
        }
        true
    }

    #[must_use]
    pub fn is_queued_for_deletion(&self, entity: Entity) -> bool {
        self.pending_deletion.contains(&entity)
    }

    /// Remove every queued entity and all of its descendants.
    ///
    /// Returns the removed entities, sorted.
    pub fn flush_deletions(&mut self) -> Vec<Entity> {
        if self.pending_deletion.is_empty() {
            return Vec::new();
        }

        let mut doomed = BTreeSet::new();
        let mut stack: Vec<Entity> = std::mem::take(&mut self.pending_deletion).into_iter().collect();
        while let Some(entity) = stack.pop() {
            if doomed.insert(entity) {
                stack.extend(self.children(entity));
            }
        }

        for entity in &doomed {
            self.storage.remove_entity(*entity);
            self.live.remove(entity);
        }

        info!(count = doomed.len(), "flushed deleted entities");
        doomed.into_iter().collect()
    }

    // -- Component operations --

    /// Attach a component, replacing any existing one of the same type.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the entity is not alive.
    pub fn insert<C: Component>(&mut self, entity: Entity, component: C) -> Result<(), WorldError> {
        if !self.exists(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        self.storage.insert(entity, component);
        Ok(())
    }

    #[must_use]
    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        self.storage.get::<C>(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<&mut C> {
        self.storage.get_mut::<C>(entity)
    }

    #[must_use]
    pub fn has<C: Component>(&self, entity: Entity) -> bool {
        self.has_component_id(entity, C::component_type_id())
    }

    #[must_use]
    pub fn has_component_id(&self, entity: Entity, type_id: ComponentTypeId) -> bool {
        self.storage.contains(entity, type_id)
    }

    // -- Hierarchy --

    #[must_use]
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.get::<Transform>(entity).and_then(|t| t.parent)
    }

    /// Direct children of `entity`, sorted.
    #[must_use]
    pub fn children(&self, entity: Entity) -> Vec<Entity> {
        let mut children: Vec<_> = self
            .live
            .iter()
            .copied()
            .filter(|e| self.parent(*e) == Some(entity))
            .collect();
        children.sort();
        children
    }

    /// World-space position, following the parent chain.
    #[must_use]
    pub fn world_position(&self, entity: Entity) -> Option<Vec3> {
        let mut transform = self.get::<Transform>(entity)?;
        let mut position = transform.local_position;
        while let Some(parent) = transform.parent {
            transform = self.get::<Transform>(parent)?;
            position += transform.local_position;
        }
        Some(position)
    }

    /// Coordinates at the origin of `entity`.
    #[must_use]
    pub fn coordinates(&self, entity: Entity) -> EntityCoordinates {
        EntityCoordinates::of(entity)
    }

    /// Resolve coordinates to a world position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the anchor entity is gone.
    pub fn resolve(&self, coords: EntityCoordinates) -> Result<Vec3, WorldError> {
        let origin = self
            .world_position(coords.entity)
            .ok_or(WorldError::EntityNotFound(coords.entity))?;
        Ok(origin + coords.position)
    }

    /// Attach `child` under `parent`, keeping its world position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if either entity is gone and
    /// [`WorldError::InvalidParent`] if the link would create a cycle.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), WorldError> {
        for entity in [child, parent] {
            if !self.exists(entity) {
                return Err(WorldError::EntityNotFound(entity));
            }
        }
        if child == parent {
            return Err(WorldError::InvalidParent {
                child,
                parent,
                reason: "an entity cannot parent itself",
            });
        }
        let mut ancestor = self.parent(parent);
        while let Some(a) = ancestor {
            if a == child {
                return Err(WorldError::InvalidParent {
                    child,
                    parent,
                    reason: "parent is a descendant of the child",
                });
            }
            ancestor = self.parent(a);
        }

        let child_position = self.world_position(child).unwrap_or(Vec3::ZERO);
        let parent_position = self.world_position(parent).unwrap_or(Vec3::ZERO);
        self.storage
            .insert(child, Transform::attached(parent, child_position - parent_position));
        debug!(%child, %parent, "reparented");
        Ok(())
    }

    /// Move `entity` to the root of the hierarchy, keeping its world position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the entity is gone.
    pub fn detach(&mut self, entity: Entity) -> Result<(), WorldError> {
        if !self.exists(entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        let position = self.world_position(entity).unwrap_or(Vec3::ZERO);
        self.storage.insert(entity, Transform::at(position));
        Ok(())
    }

    // -- Side effects --

    /// Play a sound at `source`, audible to everyone who can see it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] if the source is gone.
    pub fn play_pvs(&mut self, sound: SoundSpecifier, source: Entity, params: AudioParams) -> Result<(), WorldError> {
        let position = self
            .world_position(source)
            .ok_or(WorldError::EntityNotFound(source))?;
        debug!(%source, ?sound, volume = params.volume, "playing sound");
        self.audio.push(PlayedSound {
            sound,
            source,
            position,
            params,
        });
        Ok(())
    }

    /// Show `message` to `recipient`, anchored over `anchor`.
    pub fn popup_entity(&mut self, message: impl Into<String>, anchor: Entity, recipient: Entity) {
        let message = message.into();
        debug!(%anchor, %recipient, %message, "popup");
        self.popups.push(Popup {
            message,
            anchor,
            recipient,
        });
    }

    #[must_use]
    pub fn pending_sounds(&self) -> &[PlayedSound] {
        self.audio.pending()
    }

    pub fn drain_sounds(&mut self) -> Vec<PlayedSound> {
        self.audio.drain()
    }

    #[must_use]
    pub fn pending_popups(&self) -> &[Popup] {
        self.popups.pending()
    }

    pub fn drain_popups(&mut self) -> Vec<Popup> {
        self.popups.drain()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
