//! Entity prototypes.
//!
//! A prototype is a named template: a display name plus a map from
//! component name to that component's JSON data. Prototype files are JSON
//! arrays:
//!
//! ```json
//! [
//!   {
//!     "id": "ArcadeProgram",
//!     "name": "Space Arcade",
//!     "components": { "Transform": {} }
//!   }
//! ]
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A named entity template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityPrototype {
    pub id: String,
    /// Display name given to spawned entities. Falls back to the id.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Component name to component data.
    #[serde(default)]
    pub components: serde_json::Map<String, serde_json::Value>,
}

impl EntityPrototype {
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// All known prototypes, by id.
#[derive(Debug, Default)]
pub struct PrototypeRegistry {
    prototypes: HashMap<String, EntityPrototype>,
}

impl PrototypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one prototype.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicatePrototype`] if the id is taken.
    pub fn register(&mut self, prototype: EntityPrototype) -> Result<(), WorldError> {
        if self.prototypes.contains_key(&prototype.id) {
            return Err(WorldError::DuplicatePrototype(prototype.id));
        }
        self.prototypes.insert(prototype.id.clone(), prototype);
        Ok(())
    }

    /// Parse a JSON array of prototypes and register each of them.
    ///
    /// Returns the number of prototypes added.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Json`] on malformed input and
    /// [`WorldError::DuplicatePrototype`] on id clashes.
    pub fn load_json(&mut self, source: &str) -> Result<usize, WorldError> {
        let prototypes: Vec<EntityPrototype> = serde_json::from_str(source)?;
        let count = prototypes.len();
        for prototype in prototypes {
            self.register(prototype)?;
        }
        Ok(count)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EntityPrototype> {
        self.prototypes.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }
}
