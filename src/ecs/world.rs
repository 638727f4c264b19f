//! Top-level ECS orchestration: entity lifecycle, signature bookkeeping, and
//! wiring between the component pools, hierarchy, and dirty-transform set.
//!
//! Grounded on `original_source/.../EntityComponentSystem.cpp`'s
//! `EntityComponentSystem::CreateEntity`/`DestroyEntity` sequencing (create
//! in the entity map, then each component pool, then register signatures;
//! destroy recurses into children first).

use std::collections::HashMap;

use glam::{Quat, Vec3};

use crate::ecs::component_pool::ComponentPool;
use crate::ecs::components::{LightComponent, MeshMetallic, NameComponent, RenderComponent};
use crate::ecs::entity::{Entity, EntityMap};
use crate::ecs::hierarchy::Hierarchy;
use crate::ecs::signature::Signature;
use crate::ecs::transform::{self, DirtySet, LocalMatrix, Position, Rotation, Scale, WorldMatrix};
use crate::error::Result;

pub struct WorldConfig {
    pub entity_count: usize,
    pub render_component_count: usize,
    pub light_count: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            entity_count: 4096,
            render_component_count: 4096,
            light_count: 256,
        }
    }
}

pub struct World {
    entities: EntityMap,
    signatures: HashMap<Entity, Signature>,
    hierarchy: Hierarchy,

    names: ComponentPool<NameComponent>,
    positions: ComponentPool<Position>,
    rotations: ComponentPool<Rotation>,
    scales: ComponentPool<Scale>,
    locals: ComponentPool<LocalMatrix>,
    worlds: ComponentPool<WorldMatrix>,
    renders: ComponentPool<RenderComponent>,
    lights: ComponentPool<LightComponent>,

    dirty_transforms: DirtySet,
}

impl World {
    pub fn new(config: WorldConfig) -> World {
        World {
            entities: EntityMap::with_capacity(config.entity_count),
            signatures: HashMap::new(),
            hierarchy: Hierarchy::new(),
            names: ComponentPool::with_capacity(config.entity_count),
            positions: ComponentPool::with_capacity(config.entity_count),
            rotations: ComponentPool::with_capacity(config.entity_count),
            scales: ComponentPool::with_capacity(config.entity_count),
            locals: ComponentPool::with_capacity(config.entity_count),
            worlds: ComponentPool::with_capacity(config.entity_count),
            renders: ComponentPool::with_capacity(config.render_component_count),
            lights: ComponentPool::with_capacity(config.light_count),
            dirty_transforms: DirtySet::new(),
        }
    }

    pub fn register_signature(&mut self, entity: Entity, bit: Signature) {
        self.signatures.entry(entity).or_default().insert(bit);
    }

    pub fn signature(&self, entity: Entity) -> Signature {
        self.signatures.get(&entity).copied().unwrap_or_else(Signature::empty)
    }

    /// Allocates an entity and its transform components, wires it into the
    /// hierarchy if `parent` is set, and seeds the dirty-transform set.
    pub fn create_entity(
        &mut self,
        name: &str,
        parent: Option<Entity>,
        position: Vec3,
        rotation: Quat,
        scale: Vec3,
    ) -> Result<Entity> {
        let entity = self.entities.create();

        self.names.create(entity, NameComponent::from_str(name))?;
        self.positions.create(entity, Position(position))?;
        self.rotations.create(entity, Rotation(rotation))?;
        self.scales.create(entity, Scale(scale))?;
        self.locals.create(entity, LocalMatrix::default())?;
        self.worlds.create(entity, WorldMatrix::default())?;

        self.register_signature(entity, Signature::NAME);
        self.register_signature(entity, Signature::POSITION);
        self.register_signature(entity, Signature::ROTATION);
        self.register_signature(entity, Signature::SCALE);
        self.register_signature(entity, Signature::LOCAL_MATRIX);
        self.register_signature(entity, Signature::WORLD_MATRIX);

        if let Some(parent) = parent {
            self.hierarchy.attach(entity, parent);
        }
        self.dirty_transforms.insert(entity);

        Ok(entity)
    }

    pub fn assign_render_component(&mut self, entity: Entity, component: RenderComponent) -> Result<()> {
        self.renders.create(entity, component)?;
        self.register_signature(entity, Signature::RENDER);
        Ok(())
    }

    pub fn assign_light(&mut self, entity: Entity, light: LightComponent) -> Result<()> {
        self.lights.create(entity, light)?;
        self.register_signature(entity, Signature::LIGHT);
        Ok(())
    }

    pub fn render_component(&self, entity: Entity) -> &RenderComponent {
        self.renders.get(entity)
    }

    /// Overwrites an entity's per-draw metallic/roughness data and marks the
    /// component dirty so the material cache rewrites the instance's
    /// uniform buffer before the next frame, matching `SceneHierarchy.cpp`'s
    /// `mesh_info.material_dirty = true` whenever `material_data` changes.
    pub fn set_material_data(&mut self, entity: Entity, material_data: MeshMetallic) {
        let component = self.renders.get_mut(entity);
        component.material_data = material_data;
        component.material_dirty = true;
    }

    /// Recursively destroys `entity`'s children first, then frees every
    /// component the entity's signature says it owns, then removes it from
    /// the entity map. Any stale handle subsequently fails `EntityMap::contains`.
    pub fn destroy_entity(&mut self, entity: Entity) {
        for child in self.hierarchy.children(entity).to_vec() {
            self.destroy_entity(child);
        }
        self.hierarchy.detach(entity);

        let sig = self.signature(entity);
        if sig.contains(Signature::NAME) {
            self.names.free(entity);
        }
        if sig.contains(Signature::POSITION) {
            self.positions.free(entity);
        }
        if sig.contains(Signature::ROTATION) {
            self.rotations.free(entity);
        }
        if sig.contains(Signature::SCALE) {
            self.scales.free(entity);
        }
        if sig.contains(Signature::LOCAL_MATRIX) {
            self.locals.free(entity);
        }
        if sig.contains(Signature::WORLD_MATRIX) {
            self.worlds.free(entity);
        }
        if sig.contains(Signature::RENDER) {
            self.renders.free(entity);
        }
        if sig.contains(Signature::LIGHT) {
            self.lights.free(entity);
        }

        self.dirty_transforms.remove(entity);
        self.signatures.remove(&entity);
        self.entities.erase(entity);
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.contains(entity)
    }

    pub fn translate(&mut self, entity: Entity, delta: Vec3) {
        self.positions.get_mut(entity).0 += delta;
        self.dirty_transforms.insert(entity);
    }

    pub fn rotate(&mut self, entity: Entity, delta: Quat) {
        self.rotations.get_mut(entity).0 *= delta;
        self.dirty_transforms.insert(entity);
    }

    pub fn set_position(&mut self, entity: Entity, position: Vec3) {
        self.positions.get_mut(entity).0 = position;
        self.dirty_transforms.insert(entity);
    }

    pub fn set_rotation(&mut self, entity: Entity, rotation: Quat) {
        self.rotations.get_mut(entity).0 = rotation;
        self.dirty_transforms.insert(entity);
    }

    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) {
        self.scales.get_mut(entity).0 = scale;
        self.dirty_transforms.insert(entity);
    }

    pub fn world_matrix(&self, entity: Entity) -> glam::Mat4 {
        self.worlds.get(entity).0
    }

    /// Drains the dirty-transform set until every touched entity's world
    /// matrix is coherent with its parent.
    pub fn transform_system_update(&mut self) {
        transform::transform_system_update(
            &self.positions,
            &self.rotations,
            &self.scales,
            &mut self.locals,
            &mut self.worlds,
            &self.hierarchy,
            &mut self.dirty_transforms,
        );
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_entity_registers_transform_signature() {
        let mut world = World::new(WorldConfig::default());
        let e = world
            .create_entity("root", None, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        assert!(world.signature(e).contains(Signature::POSITION | Signature::WORLD_MATRIX));
    }

    #[test]
    fn destroy_entity_recursively_destroys_children() {
        let mut world = World::new(WorldConfig::default());
        let parent = world
            .create_entity("p", None, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        let child = world
            .create_entity("c", Some(parent), Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();

        world.destroy_entity(parent);
        assert!(!world.is_alive(parent));
        assert!(!world.is_alive(child));
    }

    #[test]
    fn destroyed_entity_handle_fails_generation_check_after_reuse() {
        let mut world = World::new(WorldConfig::default());
        let e0 = world
            .create_entity("a", None, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        world.destroy_entity(e0);
        let e1 = world
            .create_entity("b", None, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        assert_eq!(e0.index(), e1.index());
        assert!(!world.is_alive(e0));
        assert!(world.is_alive(e1));
    }

    #[test]
    fn transform_system_update_drains_dirty_set() {
        let mut world = World::new(WorldConfig::default());
        let e = world
            .create_entity("a", None, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        world.translate(e, Vec3::new(1.0, 0.0, 0.0));
        world.transform_system_update();
        assert_eq!(world.world_matrix(e).w_axis.truncate(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn set_material_data_marks_component_dirty() {
        use crate::handle::{DescriptorIndex, Handle};

        let mut world = World::new(WorldConfig::default());
        let e = world
            .create_entity("mesh", None, Vec3::ZERO, Quat::IDENTITY, Vec3::ONE)
            .unwrap();
        world
            .assign_render_component(
                e,
                RenderComponent {
                    mesh: Handle::new(0, 1),
                    index_start: 0,
                    index_count: 6,
                    master_material: Handle::new(0, 1),
                    material_instance: DescriptorIndex::new(0),
                    material_data: MeshMetallic::default(),
                    material_dirty: false,
                },
            )
            .unwrap();

        let updated = MeshMetallic { metallic: 0.8, roughness: 0.2 };
        world.set_material_data(e, updated);

        let component = world.render_component(e);
        assert_eq!(component.material_data, updated);
        assert!(component.material_dirty);
    }
}
