//! System-layer error types.

use engine_component::Entity;
use engine_world::WorldError;

/// Errors raised while wiring up or driving systems.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("system '{system}' already handles {event} through {component}")]
    DuplicateSubscription {
        system: &'static str,
        component: &'static str,
        event: &'static str,
    },

    #[error("system '{0}' is already registered")]
    DuplicateSystem(&'static str),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Container(#[from] ContainerError),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Why an item slot operation was refused.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("{0} has no item slots")]
    NoSlots(Entity),

    #[error("{owner} has no slot '{slot}'")]
    UnknownSlot { owner: Entity, slot: String },

    #[error("slot '{slot}' on {owner} is occupied")]
    Occupied { owner: Entity, slot: String },

    #[error("slot '{slot}' on {owner} is empty")]
    Empty { owner: Entity, slot: String },

    #[error("slot '{slot}' on {owner} is locked")]
    Locked { owner: Entity, slot: String },

    #[error("{0} does not exist")]
    MissingItem(Entity),

    #[error("{item} is already in slot '{slot}' on {owner}")]
    AlreadyContained { item: Entity, owner: Entity, slot: String },

    #[error(transparent)]
    World(#[from] WorldError),
}
