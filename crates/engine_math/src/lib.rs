//! # engine_math
//!
//! Math types for the engine. Re-exports [`glam`] for linear algebra and
//! defines the spatial components that implement
//! [`Component`](engine_component::Component).

pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Quat, Vec2, Vec3};

pub use transform::{EntityCoordinates, Transform};
