//! # engine_component
//!
//! The "E" and "C" in ECS: entity handles, the component contract, and the
//! storage that holds component values.
//!
//! This crate provides:
//!
//! - [`Entity`]: lightweight `u64` entity handles.
//! - [`EntityAllocator`]: monotonically increasing handle allocator.
//! - [`Component`] trait: the contract all ECS data must satisfy.
//! - [`ComponentStorage`]: type-erased per-type columns.
//! - [`ComponentCatalog`]: builds components by name from JSON data.

pub mod component;
pub mod entity;
pub mod storage;

pub use component::{CatalogError, Component, ComponentCatalog, ComponentMeta, ComponentTypeId};
pub use entity::{Entity, EntityAllocator};
pub use storage::ComponentStorage;
