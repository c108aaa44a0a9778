use std::collections::HashSet;

use fixedbitset::FixedBitSet;

use crate::capability::CapabilityKind;
use crate::entity::{Entity, EntityAllocator};

use super::{SceneProvider, Transform};

/// One entity's stored attributes.
struct Node {
    name: String,
    tag: String,
    layer: i32,
    active: bool,
    transform: Transform,
    capabilities: FixedBitSet,
    parent: Option<Entity>,
    children: Vec<Entity>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            tag: String::new(),
            layer: 0,
            active: true,
            transform: Transform::IDENTITY,
            capabilities: FixedBitSet::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Snapshot of the mutable attributes of one entity, captured by a host
/// undo engine before a write and restored on a physical undo step.
///
/// Parent/child links are not part of the snapshot: batch mutations never
/// touch the hierarchy, only attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeState {
    name: String,
    tag: String,
    layer: i32,
    active: bool,
    transform: Transform,
    capabilities: FixedBitSet,
}

/// In-memory scene tree: the crate's reference [`SceneProvider`].
///
/// Owns entity allocation, per-entity attributes, and parent/child
/// bookkeeping. Root enumeration follows ascending slot order, so repeated
/// passes over an unchanged scene are deterministic.
///
/// # Example
///
/// ```
/// use scene_workbench::SceneWorld;
///
/// let mut scene = SceneWorld::new();
/// let root = scene.spawn("Level");
/// let child = scene.spawn("Prop");
/// scene.set_parent(child, root);
/// ```
#[derive(Default)]
pub struct SceneWorld {
    allocator: EntityAllocator,
    nodes: Vec<Option<Node>>,
    dirty: HashSet<Entity>,
}

impl SceneWorld {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a root entity with the given name and default attributes.
    pub fn spawn(&mut self, name: impl Into<String>) -> Entity {
        let entity = self.allocator.allocate();
        let idx = entity.index() as usize;
        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || None);
        }
        self.nodes[idx] = Some(Node::new(name.into()));
        entity
    }

    /// Despawns an entity and its whole subtree.
    ///
    /// Returns `false` if the handle was already dead or stale.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.allocator.is_alive(entity) {
            return false;
        }

        // Detach from the parent's children list first.
        if let Some(parent) = self.node(entity).and_then(|n| n.parent) {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.children.retain(|&e| e != entity);
            }
        }

        self.despawn_subtree(entity);
        true
    }

    fn despawn_subtree(&mut self, entity: Entity) {
        let children = self
            .node(entity)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.despawn_subtree(child);
        }

        self.nodes[entity.index() as usize] = None;
        self.dirty.remove(&entity);
        self.allocator.deallocate(entity);
    }

    /// Sets `entity` as a child of `parent`, detaching it from its old
    /// parent if needed.
    ///
    /// Degrades to a logged no-op when either handle is dead, when
    /// `entity == parent`, or when the new parent sits inside `entity`'s
    /// own subtree (which would close a cycle).
    pub fn set_parent(&mut self, entity: Entity, parent: Entity) {
        if !self.allocator.is_alive(entity) || !self.allocator.is_alive(parent) {
            return;
        }
        if entity == parent || self.is_ancestor(entity, parent) {
            log::warn!("rejected reparent of {entity} under {parent}: would close a cycle");
            return;
        }

        let old_parent = self.node(entity).and_then(|n| n.parent);
        if old_parent == Some(parent) {
            return;
        }
        if let Some(old) = old_parent {
            if let Some(old_node) = self.node_mut(old) {
                old_node.children.retain(|&e| e != entity);
            }
        }

        if let Some(node) = self.node_mut(entity) {
            node.parent = Some(parent);
        }
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(entity);
        }
    }

    /// Detaches `entity` from its parent, making it a root. No-op if it
    /// already is one.
    pub fn remove_parent(&mut self, entity: Entity) {
        let Some(parent) = self.node(entity).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.retain(|&e| e != entity);
        }
        if let Some(node) = self.node_mut(entity) {
            node.parent = None;
        }
    }

    /// Returns the entity's parent, if any.
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.node(entity).and_then(|n| n.parent)
    }

    /// Returns the number of alive entities.
    pub fn entity_count(&self) -> u32 {
        self.allocator.count()
    }

    /// Renames an entity. No-op when dead.
    pub fn set_name(&mut self, entity: Entity, name: impl Into<String>) {
        if let Some(node) = self.node_mut(entity) {
            node.name = name.into();
        }
    }

    /// Returns whether the entity is flagged for persistence.
    pub fn is_dirty(&self, entity: Entity) -> bool {
        self.dirty.contains(&entity)
    }

    /// Drains the set of entities flagged for persistence.
    pub fn take_dirty(&mut self) -> HashSet<Entity> {
        std::mem::take(&mut self.dirty)
    }

    /// Captures the mutable attributes of an entity, or `None` if dead.
    pub fn capture(&self, entity: Entity) -> Option<NodeState> {
        self.node(entity).map(|n| NodeState {
            name: n.name.clone(),
            tag: n.tag.clone(),
            layer: n.layer,
            active: n.active,
            transform: n.transform,
            capabilities: n.capabilities.clone(),
        })
    }

    /// Restores previously captured attributes. Skips silently if the
    /// entity has been destroyed since the capture.
    pub fn restore(&mut self, entity: Entity, state: &NodeState) {
        if let Some(node) = self.node_mut(entity) {
            node.name = state.name.clone();
            node.tag = state.tag.clone();
            node.layer = state.layer;
            node.active = state.active;
            node.transform = state.transform;
            node.capabilities = state.capabilities.clone();
        }
    }

    /// `true` if `ancestor` appears on `entity`'s parent chain (the entity
    /// itself does not count).
    fn is_ancestor(&self, ancestor: Entity, entity: Entity) -> bool {
        let mut current = self.node(entity).and_then(|n| n.parent);
        while let Some(e) = current {
            if e == ancestor {
                return true;
            }
            current = self.node(e).and_then(|n| n.parent);
        }
        false
    }

    fn node(&self, entity: Entity) -> Option<&Node> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.nodes.get(entity.index() as usize)?.as_ref()
    }

    fn node_mut(&mut self, entity: Entity) -> Option<&mut Node> {
        if !self.allocator.is_alive(entity) {
            return None;
        }
        self.nodes.get_mut(entity.index() as usize)?.as_mut()
    }
}

impl SceneProvider for SceneWorld {
    fn roots(&self) -> Vec<Entity> {
        self.allocator
            .iter_alive()
            .filter(|&e| self.node(e).map_or(false, |n| n.parent.is_none()))
            .collect()
    }

    fn children(&self, entity: Entity) -> Vec<Entity> {
        self.node(entity).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.allocator.is_alive(entity)
    }

    fn name(&self, entity: Entity) -> Option<&str> {
        self.node(entity).map(|n| n.name.as_str())
    }

    fn is_active(&self, entity: Entity) -> bool {
        self.node(entity).map_or(false, |n| n.active)
    }

    fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        let Some(node) = self.node(entity) else {
            return false;
        };
        if !node.active {
            return false;
        }
        let mut current = node.parent;
        while let Some(e) = current {
            match self.node(e) {
                Some(n) if n.active => current = n.parent,
                _ => return false,
            }
        }
        true
    }

    fn tag(&self, entity: Entity) -> Option<&str> {
        self.node(entity).map(|n| n.tag.as_str())
    }

    fn layer(&self, entity: Entity) -> Option<i32> {
        self.node(entity).map(|n| n.layer)
    }

    fn local_transform(&self, entity: Entity) -> Option<Transform> {
        self.node(entity).map(|n| n.transform)
    }

    fn has_capability(&self, entity: Entity, kind: CapabilityKind) -> bool {
        self.node(entity)
            .map_or(false, |n| n.capabilities.contains(kind.index()))
    }

    fn set_active(&mut self, entity: Entity, active: bool) {
        if let Some(node) = self.node_mut(entity) {
            node.active = active;
        }
    }

    fn set_tag(&mut self, entity: Entity, tag: &str) {
        if let Some(node) = self.node_mut(entity) {
            node.tag = tag.to_owned();
        }
    }

    fn set_layer(&mut self, entity: Entity, layer: i32) {
        if let Some(node) = self.node_mut(entity) {
            node.layer = layer;
        }
    }

    fn set_local_transform(&mut self, entity: Entity, transform: Transform) {
        if let Some(node) = self.node_mut(entity) {
            node.transform = transform;
        }
    }

    fn attach_capability(&mut self, entity: Entity, kind: CapabilityKind) {
        if let Some(node) = self.node_mut(entity) {
            node.capabilities.grow(kind.index() + 1);
            node.capabilities.set(kind.index(), true);
        }
    }

    fn detach_capability(&mut self, entity: Entity, kind: CapabilityKind) {
        if let Some(node) = self.node_mut(entity) {
            if kind.index() < node.capabilities.len() {
                node.capabilities.set(kind.index(), false);
            }
        }
    }

    fn mark_dirty(&mut self, entity: Entity) {
        if self.allocator.is_alive(entity) {
            self.dirty.insert(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::CapabilityRegistry;
    use glam::Vec3;

    #[test]
    fn spawn_defaults() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("Cube");

        assert!(scene.is_alive(e));
        assert_eq!(scene.name(e), Some("Cube"));
        assert!(scene.is_active(e));
        assert_eq!(scene.tag(e), Some(""));
        assert_eq!(scene.layer(e), Some(0));
        assert_eq!(scene.local_transform(e), Some(Transform::IDENTITY));
    }

    #[test]
    fn set_parent_creates_relationship() {
        let mut scene = SceneWorld::new();
        let parent = scene.spawn("Parent");
        let child = scene.spawn("Child");

        scene.set_parent(child, parent);

        assert_eq!(scene.parent(child), Some(parent));
        assert_eq!(scene.children(parent), vec![child]);
        assert_eq!(scene.roots(), vec![parent]);
    }

    #[test]
    fn set_parent_reparents() {
        let mut scene = SceneWorld::new();
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        let child = scene.spawn("Child");

        scene.set_parent(child, a);
        scene.set_parent(child, b);

        assert_eq!(scene.parent(child), Some(b));
        assert!(scene.children(a).is_empty());
        assert_eq!(scene.children(b), vec![child]);
    }

    #[test]
    fn set_parent_rejects_self() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        scene.set_parent(e, e);
        assert_eq!(scene.parent(e), None);
    }

    #[test]
    fn set_parent_rejects_cycle() {
        let mut scene = SceneWorld::new();
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        let c = scene.spawn("C");
        scene.set_parent(b, a);
        scene.set_parent(c, b);

        // a -> b -> c; parenting a under c would close a cycle
        scene.set_parent(a, c);

        assert_eq!(scene.parent(a), None);
        assert_eq!(scene.children(c), Vec::new());
    }

    #[test]
    fn remove_parent_makes_root() {
        let mut scene = SceneWorld::new();
        let parent = scene.spawn("Parent");
        let child = scene.spawn("Child");
        scene.set_parent(child, parent);

        scene.remove_parent(child);

        assert_eq!(scene.parent(child), None);
        assert!(scene.children(parent).is_empty());
        assert_eq!(scene.roots().len(), 2);
    }

    #[test]
    fn despawn_removes_subtree() {
        let mut scene = SceneWorld::new();
        let root = scene.spawn("Root");
        let child = scene.spawn("Child");
        let grandchild = scene.spawn("Grandchild");
        scene.set_parent(child, root);
        scene.set_parent(grandchild, child);

        assert!(scene.despawn(child));

        assert!(scene.is_alive(root));
        assert!(!scene.is_alive(child));
        assert!(!scene.is_alive(grandchild));
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn despawn_stale_handle() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        assert!(scene.despawn(e));
        assert!(!scene.despawn(e));
    }

    #[test]
    fn hierarchy_active_propagates() {
        let mut scene = SceneWorld::new();
        let root = scene.spawn("Root");
        let child = scene.spawn("Child");
        scene.set_parent(child, root);

        assert!(scene.is_active_in_hierarchy(child));

        scene.set_active(root, false);
        assert!(scene.is_active(child)); // self flag untouched
        assert!(!scene.is_active_in_hierarchy(child));

        scene.set_active(root, true);
        assert!(scene.is_active_in_hierarchy(child));
    }

    #[test]
    fn capabilities_attach_detach() {
        let mut registry = CapabilityRegistry::new();
        let renderer = registry.register("MeshRenderer");
        let collider = registry.register("Collider");

        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");

        assert!(!scene.has_capability(e, renderer));
        scene.attach_capability(e, renderer);
        assert!(scene.has_capability(e, renderer));
        assert!(!scene.has_capability(e, collider));

        scene.detach_capability(e, renderer);
        assert!(!scene.has_capability(e, renderer));

        // Detaching a never-attached capability is a no-op.
        scene.detach_capability(e, collider);
        assert!(!scene.has_capability(e, collider));
    }

    #[test]
    fn dirty_tracking() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");

        assert!(!scene.is_dirty(e));
        scene.mark_dirty(e);
        assert!(scene.is_dirty(e));

        let drained = scene.take_dirty();
        assert!(drained.contains(&e));
        assert!(!scene.is_dirty(e));
    }

    #[test]
    fn capture_restore_round_trip() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        let saved = scene.capture(e).unwrap();

        scene.set_name(e, "Renamed");
        scene.set_active(e, false);
        scene.set_layer(e, 9);
        scene.set_local_transform(e, Transform::from_translation(Vec3::X));

        scene.restore(e, &saved);
        assert_eq!(scene.name(e), Some("E"));
        assert!(scene.is_active(e));
        assert_eq!(scene.layer(e), Some(0));
        assert_eq!(scene.local_transform(e), Some(Transform::IDENTITY));
    }

    #[test]
    fn reads_on_dead_entity() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        scene.despawn(e);

        assert_eq!(scene.name(e), None);
        assert!(!scene.is_active(e));
        assert!(!scene.is_active_in_hierarchy(e));
        assert_eq!(scene.layer(e), None);
        assert!(scene.children(e).is_empty());
        assert!(scene.capture(e).is_none());
    }
}
