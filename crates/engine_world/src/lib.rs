//! # engine_world
//!
//! The world: the single owner of entity and component state.
//!
//! This crate provides:
//!
//! - [`World`]: entity lifecycle, components, hierarchy, deferred deletion.
//! - [`PrototypeRegistry`]: named entity templates loaded from JSON.
//! - [`MetaData`]: the display name every entity carries.
//! - [`audio`] / [`popup`]: outboxes for replicated side effects.
//! - [`WorldError`]: everything that can go wrong above.

pub mod audio;
pub mod error;
pub mod metadata;
pub mod popup;
pub mod prototype;
pub mod world;

pub use audio::{AudioParams, PlayedSound, SoundSpecifier};
pub use error::WorldError;
pub use metadata::MetaData;
pub use popup::Popup;
pub use prototype::{EntityPrototype, PrototypeRegistry};
pub use world::World;
