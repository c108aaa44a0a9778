//! The host undo engine seam and a snapshot engine for [`SceneWorld`].
//!
//! Physical reversal of field writes is the host's job, not the ledger's.
//! [`UndoEngine`] is the call surface the batch controller drives: open a
//! named group, mark each entity before writing it, collapse the group so
//! one physical step covers the whole batch, and step backward/forward on
//! request. [`SnapshotUndoEngine`] implements it over [`SceneWorld`] by
//! capturing per-entity attribute snapshots and swapping them on step.

use crate::entity::Entity;
use crate::scene::{NodeState, SceneWorld};

/// Identifier for one open undo group.
pub type UndoGroupId = u64;

/// Host undo engine surface, generic over the scene type it reverses.
///
/// Call order for one batch: [`begin_group`](Self::begin_group), then for
/// each entity [`record_object`](Self::record_object) *before* writing it,
/// then [`collapse_group`](Self::collapse_group). Later physical steps
/// treat the collapsed group as one atomic unit.
pub trait UndoEngine<S> {
    /// Opens a named undo group and returns its id. An already-open group
    /// is closed first.
    fn begin_group(&mut self, name: &str) -> UndoGroupId;

    /// Marks an entity as about to change, capturing whatever pre-write
    /// state the engine needs. Dead entities are ignored.
    fn record_object(&mut self, scene: &S, entity: Entity, label: &str);

    /// Closes the group so later physical steps treat everything recorded
    /// since [`begin_group`](Self::begin_group) as one unit.
    fn collapse_group(&mut self, group: UndoGroupId);

    /// Performs one physical undo step against the scene.
    fn perform_undo(&mut self, scene: &mut S);

    /// Performs one physical redo step against the scene.
    fn perform_redo(&mut self, scene: &mut S);
}

struct StepGroup {
    name: String,
    snapshots: Vec<(Entity, NodeState)>,
}

struct OpenGroup {
    id: UndoGroupId,
    group: StepGroup,
}

/// Field-snapshot undo engine for [`SceneWorld`].
///
/// Each collapsed group holds the pre-write attribute state of every
/// entity recorded into it; an undo step swaps those snapshots with the
/// live state (so the matching redo step swaps them back). Committing a
/// new group clears the redo side. Entities destroyed after being
/// recorded are skipped on restore.
#[derive(Default)]
pub struct SnapshotUndoEngine {
    open: Option<OpenGroup>,
    undo_stack: Vec<StepGroup>,
    redo_stack: Vec<StepGroup>,
    next_group: UndoGroupId,
}

impl SnapshotUndoEngine {
    /// Creates an engine with empty step stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a physical undo step is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns `true` if a physical redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of committed undo steps.
    pub fn undo_steps(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of committed redo steps.
    pub fn redo_steps(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name of the step the next undo would reverse.
    pub fn next_undo_name(&self) -> Option<&str> {
        self.undo_stack.last().map(|g| g.name.as_str())
    }

    fn commit(&mut self, group: StepGroup) {
        self.undo_stack.push(group);
        self.redo_stack.clear();
    }

    fn swap_step(scene: &mut SceneWorld, group: &mut StepGroup) {
        // Reverse order within the group, so overlapping records unwind
        // in last-written-first order.
        for (entity, saved) in group.snapshots.iter_mut().rev() {
            let Some(live) = scene.capture(*entity) else {
                continue; // destroyed since; skip
            };
            scene.restore(*entity, saved);
            *saved = live;
        }
    }
}

impl UndoEngine<SceneWorld> for SnapshotUndoEngine {
    fn begin_group(&mut self, name: &str) -> UndoGroupId {
        if let Some(open) = self.open.take() {
            self.commit(open.group);
        }
        let id = self.next_group;
        self.next_group += 1;
        self.open = Some(OpenGroup {
            id,
            group: StepGroup {
                name: name.to_owned(),
                snapshots: Vec::new(),
            },
        });
        id
    }

    fn record_object(&mut self, scene: &SceneWorld, entity: Entity, label: &str) {
        let Some(state) = scene.capture(entity) else {
            return;
        };

        if let Some(open) = self.open.as_mut() {
            if !open.group.snapshots.iter().any(|(e, _)| *e == entity) {
                open.group.snapshots.push((entity, state));
            }
            return;
        }

        // Record outside any group becomes its own single-entity step.
        self.commit(StepGroup {
            name: label.to_owned(),
            snapshots: vec![(entity, state)],
        });
    }

    fn collapse_group(&mut self, group: UndoGroupId) {
        let Some(open) = self.open.take() else {
            return;
        };
        if open.id != group {
            log::debug!(
                "collapsing undo group {} while group {} was open",
                group,
                open.id
            );
        }
        self.commit(open.group);
    }

    fn perform_undo(&mut self, scene: &mut SceneWorld) {
        let Some(mut group) = self.undo_stack.pop() else {
            return;
        };
        Self::swap_step(scene, &mut group);
        self.redo_stack.push(group);
    }

    fn perform_redo(&mut self, scene: &mut SceneWorld) {
        let Some(mut group) = self.redo_stack.pop() else {
            return;
        };
        Self::swap_step(scene, &mut group);
        self.undo_stack.push(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneProvider, Transform};
    use glam::Vec3;

    #[test]
    fn collapsed_group_reverses_as_one_step() {
        let mut scene = SceneWorld::new();
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        let mut undo = SnapshotUndoEngine::new();

        let group = undo.begin_group("Move both");
        undo.record_object(&scene, a, "Move");
        scene.set_local_transform(a, Transform::from_translation(Vec3::X));
        undo.record_object(&scene, b, "Move");
        scene.set_local_transform(b, Transform::from_translation(Vec3::Y));
        undo.collapse_group(group);

        assert_eq!(undo.undo_steps(), 1);

        undo.perform_undo(&mut scene);
        assert_eq!(scene.local_transform(a), Some(Transform::IDENTITY));
        assert_eq!(scene.local_transform(b), Some(Transform::IDENTITY));
    }

    #[test]
    fn redo_restores_the_group() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        let mut undo = SnapshotUndoEngine::new();

        let group = undo.begin_group("Deactivate");
        undo.record_object(&scene, e, "Toggle Active");
        scene.set_active(e, false);
        undo.collapse_group(group);

        undo.perform_undo(&mut scene);
        assert!(scene.is_active(e));

        undo.perform_redo(&mut scene);
        assert!(!scene.is_active(e));
        assert_eq!(undo.undo_steps(), 1);
        assert_eq!(undo.redo_steps(), 0);
    }

    #[test]
    fn new_step_clears_redo() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        let mut undo = SnapshotUndoEngine::new();

        let group = undo.begin_group("First");
        undo.record_object(&scene, e, "Change");
        scene.set_layer(e, 1);
        undo.collapse_group(group);
        undo.perform_undo(&mut scene);
        assert!(undo.can_redo());

        let group = undo.begin_group("Second");
        undo.record_object(&scene, e, "Change");
        scene.set_layer(e, 2);
        undo.collapse_group(group);

        assert!(!undo.can_redo());
        assert_eq!(undo.next_undo_name(), Some("Second"));
    }

    #[test]
    fn record_outside_group_is_single_step() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        let mut undo = SnapshotUndoEngine::new();

        undo.record_object(&scene, e, "Change Tag");
        scene.set_tag(e, "props");

        assert_eq!(undo.undo_steps(), 1);
        assert_eq!(undo.next_undo_name(), Some("Change Tag"));

        undo.perform_undo(&mut scene);
        assert_eq!(scene.tag(e), Some(""));
    }

    #[test]
    fn duplicate_record_keeps_first_snapshot() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        let mut undo = SnapshotUndoEngine::new();

        let group = undo.begin_group("Edit");
        undo.record_object(&scene, e, "Edit");
        scene.set_layer(e, 1);
        undo.record_object(&scene, e, "Edit");
        scene.set_layer(e, 2);
        undo.collapse_group(group);

        undo.perform_undo(&mut scene);
        assert_eq!(scene.layer(e), Some(0)); // back to the pre-group value
    }

    #[test]
    fn destroyed_entity_skipped_on_step() {
        let mut scene = SceneWorld::new();
        let keep = scene.spawn("Keep");
        let gone = scene.spawn("Gone");
        let mut undo = SnapshotUndoEngine::new();

        let group = undo.begin_group("Edit");
        undo.record_object(&scene, keep, "Edit");
        scene.set_layer(keep, 5);
        undo.record_object(&scene, gone, "Edit");
        scene.set_layer(gone, 5);
        undo.collapse_group(group);

        scene.despawn(gone);
        undo.perform_undo(&mut scene);

        assert_eq!(scene.layer(keep), Some(0));
        assert!(!scene.is_alive(gone));
    }

    #[test]
    fn dead_entity_record_is_ignored() {
        let mut scene = SceneWorld::new();
        let e = scene.spawn("E");
        scene.despawn(e);
        let mut undo = SnapshotUndoEngine::new();

        undo.record_object(&scene, e, "Edit");
        assert_eq!(undo.undo_steps(), 0);
    }

    #[test]
    fn step_on_empty_stacks_is_noop() {
        let mut scene = SceneWorld::new();
        let mut undo = SnapshotUndoEngine::new();
        undo.perform_undo(&mut scene);
        undo.perform_redo(&mut scene);
        assert!(!undo.can_undo());
        assert!(!undo.can_redo());
    }
}
