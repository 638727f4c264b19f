//! Parent/child relationships. Each entity has at most one parent and an
//! unordered list of children; destroying an entity recursively destroys
//! its children first.
//!
//! Grounded on `original_source/.../EntityComponentSystem.cpp`'s
//! `m_ecs_entities.GetParent` traversal, translated from raw owning
//! pointers (per Design Notes section 9, "pointer-graph node parents/
//! children ... model as arena + index") into handle-keyed adjacency lists.

use std::collections::HashMap;

use crate::ecs::entity::Entity;

#[derive(Default)]
pub struct Hierarchy {
    parent: HashMap<Entity, Entity>,
    children: HashMap<Entity, Vec<Entity>>,
}

impl Hierarchy {
    pub fn new() -> Hierarchy {
        Hierarchy::default()
    }

    pub fn attach(&mut self, entity: Entity, parent: Entity) {
        self.parent.insert(entity, parent);
        self.children.entry(parent).or_default().push(entity);
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.parent.get(&entity).copied()
    }

    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.children.get(&entity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Removes `entity` from its parent's child list and drops its own
    /// child list, returning the (now orphaned) children so the caller can
    /// recursively destroy them.
    pub fn detach(&mut self, entity: Entity) -> Vec<Entity> {
        if let Some(parent) = self.parent.remove(&entity) {
            if let Some(siblings) = self.children.get_mut(&parent) {
                siblings.retain(|&e| e != entity);
            }
        }
        self.children.remove(&entity).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::Handle;

    #[test]
    fn attach_registers_both_directions() {
        let mut h = Hierarchy::new();
        let parent = Handle::new(0, 1);
        let child = Handle::new(1, 1);
        h.attach(child, parent);
        assert_eq!(h.parent(child), Some(parent));
        assert_eq!(h.children(parent), &[child]);
    }

    #[test]
    fn detach_returns_children_for_cascading_destroy() {
        let mut h = Hierarchy::new();
        let root = Handle::new(0, 1);
        let a = Handle::new(1, 1);
        let b = Handle::new(2, 1);
        h.attach(a, root);
        h.attach(b, a);
        let orphans = h.detach(a);
        assert_eq!(orphans, vec![b]);
        assert!(h.children(root).is_empty());
    }
}
