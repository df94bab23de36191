//! # engine_system
//!
//! Event-driven system runtime.
//!
//! Game logic lives in [`EntitySystem`]s. At initialization a system
//! subscribes handlers to `(component, event)` pairs in an
//! [`EventRegistry`]. Raising an event on an entity runs every handler
//! whose component the entity has, through a [`SystemContext`] that carries
//! the world and the [`ExecutionRole`] of the running instance.
//!
//! ## Usage
//!
//! ```rust
//! use engine_system::{SimulationConfig, SystemRunner};
//!
//! let mut runner = SystemRunner::new(SimulationConfig::new("lab")).unwrap();
//! let user = runner.world_mut().spawn("user");
//! let table = runner.world_mut().spawn("table");
//! let examined = runner.examine(user, table);
//! assert!(examined.lines().is_empty());
//! ```

pub mod config;
pub mod containers;
pub mod context;
pub mod error;
pub mod event;
pub mod registry;
pub mod role;
pub mod runner;
pub mod system;

pub use config::SimulationConfig;
pub use containers::{ItemSlot, ItemSlots, ItemSlotsSystem};
pub use context::SystemContext;
pub use error::{ContainerError, SystemError};
pub use event::{ActivateInWorldEvent, EntInsertedIntoContainer, EntRemovedFromContainer, Event, ExaminedEvent};
pub use registry::{EventRegistry, Handler};
pub use role::ExecutionRole;
pub use runner::SystemRunner;
pub use system::EntitySystem;
