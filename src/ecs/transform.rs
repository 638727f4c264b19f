//! Decomposed transform storage and the dirty-set propagation pass.
//!
//! Grounded on `original_source/.../EntityComponentSystem.cpp`'s
//! `UpdateTransform` (recompute local, recurse into a dirty parent before
//! combining with its world matrix, then erase self from the dirty set).
//! Position/rotation/scale are stored decomposed per spec §3.3; matrices use
//! `glam` rather than a hand-rolled `float3`/`float3x3`/`float4x4`, the
//! corpus's default math crate for GPU-friendly layouts.

use std::collections::HashSet;

use glam::{Mat4, Quat, Vec3};

use crate::ecs::component_pool::ComponentPool;
use crate::ecs::entity::Entity;
use crate::ecs::hierarchy::Hierarchy;

#[derive(Copy, Clone, Debug)]
pub struct Position(pub Vec3);

#[derive(Copy, Clone, Debug)]
pub struct Rotation(pub Quat);

#[derive(Copy, Clone, Debug)]
pub struct Scale(pub Vec3);

#[derive(Copy, Clone, Debug, Default)]
pub struct LocalMatrix(pub Mat4);

#[derive(Copy, Clone, Debug, Default)]
pub struct WorldMatrix(pub Mat4);

impl Default for Position {
    fn default() -> Self {
        Position(Vec3::ZERO)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation(Quat::IDENTITY)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Scale(Vec3::ONE)
    }
}

/// Sparse set of entities needing `local`/`world` recomputation. Membership
/// is O(1); `pop_any` and `remove` don't preserve order, matching the
/// source's "take any element" semantics.
#[derive(Default)]
pub struct DirtySet {
    entities: HashSet<Entity>,
}

impl DirtySet {
    pub fn new() -> DirtySet {
        DirtySet::default()
    }

    pub fn insert(&mut self, entity: Entity) {
        self.entities.insert(entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn remove(&mut self, entity: Entity) {
        self.entities.remove(&entity);
    }

    pub fn pop_any(&mut self) -> Option<Entity> {
        let entity = *self.entities.iter().next()?;
        self.entities.remove(&entity);
        Some(entity)
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }
}

/// Recomputes `local = T(position) * R(rotation) * S(scale)` for `entity`,
/// recursing into a still-dirty parent first so `world = parent.world *
/// local` always reads a coherent parent, then removes `entity` from the
/// dirty set.
pub fn update_transform(
    entity: Entity,
    positions: &ComponentPool<Position>,
    rotations: &ComponentPool<Rotation>,
    scales: &ComponentPool<Scale>,
    locals: &mut ComponentPool<LocalMatrix>,
    worlds: &mut ComponentPool<WorldMatrix>,
    hierarchy: &Hierarchy,
    dirty: &mut DirtySet,
) {
    let position = positions.get(entity).0;
    let rotation = rotations.get(entity).0;
    let scale = scales.get(entity).0;
    let local = Mat4::from_scale_rotation_translation(scale, rotation, position);
    locals.get_mut(entity).0 = local;

    let world = match hierarchy.parent(entity) {
        Some(parent) if worlds.contains(parent) => {
            if dirty.contains(parent) {
                update_transform(
                    parent, positions, rotations, scales, locals, worlds, hierarchy, dirty,
                );
            }
            worlds.get(parent).0 * local
        }
        _ => local,
    };
    worlds.get_mut(entity).0 = world;

    dirty.remove(entity);
}

/// Drains the dirty set, updating each entity (and transitively its
/// still-dirty ancestors) until every transform in the set is coherent.
pub fn transform_system_update(
    positions: &ComponentPool<Position>,
    rotations: &ComponentPool<Rotation>,
    scales: &ComponentPool<Scale>,
    locals: &mut ComponentPool<LocalMatrix>,
    worlds: &mut ComponentPool<WorldMatrix>,
    hierarchy: &Hierarchy,
    dirty: &mut DirtySet,
) {
    while let Some(entity) = dirty.pop_any() {
        update_transform(
            entity, positions, rotations, scales, locals, worlds, hierarchy, dirty,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    fn make_pools() -> (
        ComponentPool<Position>,
        ComponentPool<Rotation>,
        ComponentPool<Scale>,
        ComponentPool<LocalMatrix>,
        ComponentPool<WorldMatrix>,
    ) {
        (
            ComponentPool::with_capacity(8),
            ComponentPool::with_capacity(8),
            ComponentPool::with_capacity(8),
            ComponentPool::with_capacity(8),
            ComponentPool::with_capacity(8),
        )
    }

    #[test]
    fn orphan_world_equals_local() {
        let (mut pos, mut rot, mut scale, mut local, mut world) = make_pools();
        let hierarchy = Hierarchy::new();
        let mut dirty = DirtySet::new();

        let e = Handle::new(0, 1);
        pos.create(e, Position(Vec3::new(1.0, 2.0, 3.0))).unwrap();
        rot.create(e, Rotation::default()).unwrap();
        scale.create(e, Scale::default()).unwrap();
        local.create(e, LocalMatrix::default()).unwrap();
        world.create(e, WorldMatrix::default()).unwrap();
        dirty.insert(e);

        transform_system_update(&pos, &rot, &scale, &mut local, &mut world, &hierarchy, &mut dirty);

        assert!(dirty.is_empty());
        assert_eq!(world.get(e).0, local.get(e).0);
    }

    #[test]
    fn child_world_composes_with_dirty_parent() {
        let (mut pos, mut rot, mut scale, mut local, mut world) = make_pools();
        let mut hierarchy = Hierarchy::new();
        let mut dirty = DirtySet::new();

        let parent = Handle::new(0, 1);
        let child = Handle::new(1, 1);
        hierarchy.attach(child, parent);

        for e in [parent, child] {
            pos.create(e, Position(Vec3::X)).unwrap();
            rot.create(e, Rotation::default()).unwrap();
            scale.create(e, Scale::default()).unwrap();
            local.create(e, LocalMatrix::default()).unwrap();
            world.create(e, WorldMatrix::default()).unwrap();
        }
        // Only the child is marked dirty; updating it must recurse into the
        // still-dirty parent to produce a coherent world matrix.
        dirty.insert(parent);
        dirty.insert(child);

        transform_system_update(&pos, &rot, &scale, &mut local, &mut world, &hierarchy, &mut dirty);

        assert!(dirty.is_empty());
        let expected = world.get(parent).0 * local.get(child).0;
        assert_eq!(world.get(child).0, expected);
    }
}
