//! Per-entity metadata.

use engine_component::Component;
use serde::{Deserialize, Serialize};

/// Display name and origin of an entity. Every spawned entity has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// The prototype this entity was spawned from, if any.
    #[serde(default)]
    pub prototype: Option<String>,
}

impl MetaData {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            prototype: None,
        }
    }
}

impl Component for MetaData {
    fn type_name() -> &'static str {
        "MetaData"
    }
}
