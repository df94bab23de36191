//! World error types.

use engine_component::{CatalogError, Entity};

/// Errors raised by [`World`](crate::World) operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error("{0} not found")]
    EntityNotFound(Entity),

    #[error("unknown prototype '{0}'")]
    UnknownPrototype(String),

    #[error("prototype '{0}' is defined more than once")]
    DuplicatePrototype(String),

    /// A prototype named a component that could not be built.
    #[error("prototype '{prototype}': {source}")]
    Component {
        prototype: String,
        #[source]
        source: CatalogError,
    },

    #[error("cannot parent {child} to {parent}: {reason}")]
    InvalidParent {
        child: Entity,
        parent: Entity,
        reason: &'static str,
    },

    #[error("failed to parse prototypes: {0}")]
    Json(#[from] serde_json::Error),
}
