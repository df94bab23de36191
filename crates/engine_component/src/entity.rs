//! Entity type and allocation utilities.
//!
//! An [`Entity`] is a lightweight `u64` handle with no inherent data. The
//! world hands them out; everything else only ever holds copies.

use serde::{Deserialize, Serialize};

/// An opaque entity handle.
///
/// Entities carry no data of their own. Components attached to them give
/// them meaning. A reference that may or may not point at an entity is
/// always spelled `Option<Entity>`; there is no null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Create an entity from a raw identifier.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Allocates monotonically increasing entity ids, starting at 1.
///
/// Ids are never recycled, so a stale `Entity` held after deletion can never
/// alias a newer one.
#[derive(Debug)]
pub struct EntityAllocator {
    next_id: u64,
}

impl EntityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Allocates a fresh entity.
    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next_id);
        self.next_id += 1;
        entity
    }

    /// Number of entities allocated so far, live or not.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next_id - 1
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_raw_id() {
        let e = Entity::from_raw(42);
        assert_eq!(e.id(), 42);
        assert_eq!(e.to_string(), "Entity(42)");
    }

    #[test]
    fn test_allocator_never_repeats() {
        let mut alloc = EntityAllocator::new();
        let e1 = alloc.allocate();
        let e2 = alloc.allocate();
        assert_eq!(e1.id(), 1);
        assert_eq!(e2.id(), 2);
        assert_ne!(e1, e2);
        assert_eq!(alloc.allocated(), 2);
    }

    #[test]
    fn test_entity_serializes_as_plain_number() {
        let json = serde_json::to_value(Entity::from_raw(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
        let back: Option<Entity> = serde_json::from_value(serde_json::json!(null)).unwrap();
        assert_eq!(back, None);
    }
}
