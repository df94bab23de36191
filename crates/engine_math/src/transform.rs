//! Spatial hierarchy component.
//!
//! [`Transform`] places an entity relative to an optional parent entity. An
//! entity without a parent sits at the root and its local position is its
//! world position. Resolving world positions walks the parent chain, which
//! is the world's job since only it can see other entities' transforms.

use engine_component::{Component, Entity};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Parent link and position relative to that parent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Transform {
    /// The entity this one is attached to, if any.
    #[serde(default)]
    pub parent: Option<Entity>,
    /// Position in the parent's space (world space when `parent` is `None`).
    #[serde(default)]
    pub local_position: Vec3,
}

impl Transform {
    /// A root transform at `position`.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            parent: None,
            local_position: position,
        }
    }

    /// A transform attached to `parent` at `offset`.
    #[must_use]
    pub fn attached(parent: Entity, offset: Vec3) -> Self {
        Self {
            parent: Some(parent),
            local_position: offset,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Component for Transform {
    fn type_name() -> &'static str {
        "Transform"
    }
}

/// A position expressed relative to an entity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EntityCoordinates {
    pub entity: Entity,
    pub position: Vec3,
}

impl EntityCoordinates {
    #[must_use]
    pub fn new(entity: Entity, position: Vec3) -> Self {
        Self { entity, position }
    }

    /// The origin of `entity` itself.
    #[must_use]
    pub fn of(entity: Entity) -> Self {
        Self::new(entity, Vec3::ZERO)
    }

    #[must_use]
    pub fn offset(mut self, by: Vec3) -> Self {
        self.position += by;
        self
    }
}
