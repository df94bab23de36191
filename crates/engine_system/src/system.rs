//! The entity system contract.

use engine_world::World;

use crate::error::SystemError;
use crate::registry::EventRegistry;

/// A unit of game logic wired in by explicit registration.
///
/// `initialize` runs once when the system is added to a runner. It registers
/// the components the system owns (so prototypes can build them) and
/// subscribes its handlers.
pub trait EntitySystem {
    /// Unique name, used in logs and subscription bookkeeping.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error if a subscription clashes with an existing one.
    fn initialize(&self, world: &mut World, registry: &mut EventRegistry) -> Result<(), SystemError>;
}
