//! The entity-component system (spec component C2): sparse-set storage,
//! generational entities, a parent/child hierarchy, and dirty-set-driven
//! transform propagation. Grounded throughout on
//! `original_source/.../EntityComponentSystem.cpp`.

pub mod component_pool;
pub mod components;
pub mod entity;
pub mod hierarchy;
pub mod signature;
pub mod transform;
pub mod world;

pub use components::{LightComponent, LightType, MeshMetallic, NameComponent, RenderComponent};
pub use entity::{Entity, EntityMap};
pub use hierarchy::Hierarchy;
pub use signature::Signature;
pub use world::{World, WorldConfig};
