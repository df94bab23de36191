//! Core [`Component`] trait and the name-keyed [`ComponentCatalog`].
//!
//! Components are plain Rust types. Each one also has a stable string name so
//! that data files (entity prototypes) can refer to it; [`ComponentTypeId`] is
//! derived from that name with FNV-1a 64-bit.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::Entity;
use crate::storage::ComponentStorage;

/// A unique identifier for a component type, derived from its string name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Hash a component name with FNV-1a 64-bit.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name:
    ///     hash = (hash ^ byte) * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The id of component type `T`.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// The core component trait.
///
/// Components must be deserialisable so prototypes can construct them from
/// JSON, and `Send + Sync` so a world can move between threads.
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use engine_component::Component;
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     fn type_name() -> &'static str { "Health" }
/// }
/// ```
pub trait Component: Send + Sync + 'static + Serialize + DeserializeOwned {
    /// The name data files use for this component.
    fn type_name() -> &'static str;

    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }

    /// Returns the [`ComponentMeta`] descriptor for this component type.
    fn meta() -> ComponentMeta {
        ComponentMeta {
            type_id: Self::component_type_id(),
            name: Self::type_name(),
            insert_json: |storage, entity, value| {
                let component: Self = serde_json::from_value(value)?;
                storage.insert(entity, component);
                Ok(())
            },
        }
    }
}

/// Type-erased description of a component type.
#[derive(Debug, Clone, Copy)]
pub struct ComponentMeta {
    pub type_id: ComponentTypeId,
    pub name: &'static str,
    /// Deserialise a JSON value as this component and attach it to `entity`.
    pub insert_json: fn(&mut ComponentStorage, Entity, serde_json::Value) -> Result<(), serde_json::Error>,
}

/// Errors raised when constructing components by name.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unknown component '{0}'")]
    UnknownComponent(String),

    #[error("invalid data for component '{component}': {source}")]
    InvalidData {
        component: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Registry of component types that can be built from data, keyed by name.
#[derive(Debug, Default)]
pub struct ComponentCatalog {
    by_name: HashMap<&'static str, ComponentMeta>,
}

impl ComponentCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `C`. Registering the same type twice is harmless.
    pub fn register<C: Component>(&mut self) {
        self.by_name.insert(C::type_name(), C::meta());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ComponentMeta> {
        self.by_name.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Construct the component called `name` from `value` and attach it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownComponent`] if `name` was never
    /// registered, or [`CatalogError::InvalidData`] if `value` does not
    /// deserialise.
    pub fn insert_from_json(
        &self,
        storage: &mut ComponentStorage,
        entity: Entity,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), CatalogError> {
        let meta = self
            .by_name
            .get(name)
            .ok_or_else(|| CatalogError::UnknownComponent(name.to_string()))?;
        (meta.insert_json)(storage, entity, value).map_err(|source| CatalogError::InvalidData {
            component: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
    struct Health {
        current: f32,
        max: f32,
    }

    impl Component for Health {
        fn type_name() -> &'static str {
            "Health"
        }
    }

    #[test]
    fn test_component_type_id_matches_from_name() {
        assert_eq!(Health::component_type_id(), ComponentTypeId::from_name("Health"));
        assert_eq!(ComponentTypeId::of::<Health>(), Health::component_type_id());
        assert_ne!(Health::component_type_id(), ComponentTypeId::from_name("Velocity"));
    }

    #[test]
    fn test_fnv1a_known_vector() {
        assert_eq!(
            ComponentTypeId::from_name(""),
            ComponentTypeId(0xcbf2_9ce4_8422_2325)
        );
    }

    #[test]
    fn test_catalog_builds_component_from_json() {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<Health>();
        assert!(catalog.contains("Health"));

        let mut storage = ComponentStorage::new();
        let e = Entity::from_raw(1);
        catalog
            .insert_from_json(
                &mut storage,
                e,
                "Health",
                serde_json::json!({"current": 5.0, "max": 10.0}),
            )
            .unwrap();
        assert_eq!(
            storage.get::<Health>(e),
            Some(&Health {
                current: 5.0,
                max: 10.0
            })
        );
    }

    #[test]
    fn test_catalog_rejects_unknown_and_malformed() {
        let mut catalog = ComponentCatalog::new();
        catalog.register::<Health>();
        let mut storage = ComponentStorage::new();
        let e = Entity::from_raw(1);

        let err = catalog
            .insert_from_json(&mut storage, e, "Mana", serde_json::json!({}))
            .unwrap_err();
        assert!(matches!(err, CatalogError::UnknownComponent(name) if name == "Mana"));

        let err = catalog
            .insert_from_json(&mut storage, e, "Health", serde_json::json!({"current": "x"}))
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidData { .. }));
        assert!(!storage.contains(e, Health::component_type_id()));
    }
}
