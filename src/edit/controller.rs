use glam::Vec3;

use crate::capability::{CapabilityKind, CapabilityRegistry};
use crate::entity::Entity;
use crate::scene::{SceneProvider, Transform};

use super::config::ActiveTogglePolicy;
use super::history::ChangeHistory;
use super::undo::UndoEngine;

/// Applies batch mutations to a selection and keeps the change ledger.
///
/// Every operation treats its selection as one logically atomic unit: one
/// host undo group per call, so one physical host step reverses the whole
/// batch, matching the one descriptor the ledger gets per batch. Entities
/// destroyed between selection and mutation are skipped silently; an empty
/// selection makes the whole call a no-op with no host calls and no ledger
/// entry.
///
/// Descriptor counts always report the requested selection size, not the
/// number of entities actually mutated, and numeric values are formatted
/// to two decimals — descriptors are for human review, never replayed.
pub struct EditController {
    history: ChangeHistory,
    active_toggle_policy: ActiveTogglePolicy,
}

impl EditController {
    /// Creates a controller with an empty ledger.
    pub fn new(active_toggle_policy: ActiveTogglePolicy) -> Self {
        Self {
            history: ChangeHistory::new(),
            active_toggle_policy,
        }
    }

    /// Read access to the ledger.
    pub fn history(&self) -> &ChangeHistory {
        &self.history
    }

    /// Mutable access to the ledger, for undo/redo bookkeeping.
    pub fn history_mut(&mut self) -> &mut ChangeHistory {
        &mut self.history
    }

    /// The policy batch active toggles follow.
    pub fn active_toggle_policy(&self) -> ActiveTogglePolicy {
        self.active_toggle_policy
    }

    /// Applies position, XYZ Euler rotation (radians), and scale to every
    /// entity in the selection as a single undo group.
    pub fn apply_transforms<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        selection: &[Entity],
        position: Vec3,
        rotation: Vec3,
        scale: Vec3,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        if selection.is_empty() {
            return;
        }

        let group = undo.begin_group("Modify Multiple Transforms");
        let transform = Transform::from_trs_euler(position, rotation, scale);
        for &entity in selection {
            if !scene.is_alive(entity) {
                log::debug!("skipping destroyed {entity} in transform batch");
                continue;
            }
            undo.record_object(scene, entity, "Modify Transform");
            scene.set_local_transform(entity, transform);
            scene.mark_dirty(entity);
        }
        undo.collapse_group(group);

        self.history.record(format!(
            "Applied transform to {} entities (P: {}, R: {}, S: {})",
            selection.len(),
            fmt_vec(position),
            fmt_vec(rotation),
            fmt_vec(scale),
        ));
    }

    /// Sets the active flag on every entity in the selection as a single
    /// undo group. The ledger path depends on the controller's
    /// [`ActiveTogglePolicy`].
    pub fn set_active<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        selection: &[Entity],
        active: bool,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        if selection.is_empty() {
            return;
        }

        let group = undo.begin_group("Toggle Active State");
        for &entity in selection {
            if !scene.is_alive(entity) {
                log::debug!("skipping destroyed {entity} in active batch");
                continue;
            }
            undo.record_object(scene, entity, "Toggle Active");
            scene.set_active(entity, active);
            scene.mark_dirty(entity);
        }
        undo.collapse_group(group);

        match self.active_toggle_policy {
            ActiveTogglePolicy::HistoryOnly => {
                let note = if active { "Set Active" } else { "Set Inactive" };
                self.history.add_note(note);
            }
            ActiveTogglePolicy::Recorded => {
                let state = if active { "active" } else { "inactive" };
                self.history
                    .record(format!("Set {} entities {state}", selection.len()));
            }
        }
    }

    /// Attaches a capability to every entity in the selection as a single
    /// undo group. A kind unknown to the registry makes the whole call a
    /// no-op.
    pub fn add_capability<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        registry: &CapabilityRegistry,
        selection: &[Entity],
        kind: CapabilityKind,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.change_capability(scene, undo, registry, selection, kind, true);
    }

    /// Detaches a capability from every entity in the selection as a single
    /// undo group. A kind unknown to the registry makes the whole call a
    /// no-op.
    pub fn remove_capability<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        registry: &CapabilityRegistry,
        selection: &[Entity],
        kind: CapabilityKind,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.change_capability(scene, undo, registry, selection, kind, false);
    }

    fn change_capability<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        registry: &CapabilityRegistry,
        selection: &[Entity],
        kind: CapabilityKind,
        attach: bool,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        if selection.is_empty() {
            return;
        }
        let Some(info) = registry.info(kind) else {
            log::debug!("ignoring capability batch for unregistered kind {kind:?}");
            return;
        };
        let name = info.name().to_owned();

        let (group_name, label) = if attach {
            ("Add Capability", "Add Capability")
        } else {
            ("Remove Capability", "Remove Capability")
        };

        let group = undo.begin_group(group_name);
        for &entity in selection {
            if !scene.is_alive(entity) {
                log::debug!("skipping destroyed {entity} in capability batch");
                continue;
            }
            undo.record_object(scene, entity, label);
            if attach {
                scene.attach_capability(entity, kind);
            } else {
                scene.detach_capability(entity, kind);
            }
            scene.mark_dirty(entity);
        }
        undo.collapse_group(group);

        let description = if attach {
            format!("Added {name} to {} entities", selection.len())
        } else {
            format!("Removed {name} from {} entities", selection.len())
        };
        self.history.record(description);
    }

    /// Sets the tag on every entity in the selection as a single undo
    /// group.
    pub fn set_tags<S, U>(&mut self, scene: &mut S, undo: &mut U, selection: &[Entity], tag: &str)
    where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        if selection.is_empty() {
            return;
        }

        let group = undo.begin_group("Change Tag");
        for &entity in selection {
            if !scene.is_alive(entity) {
                continue;
            }
            undo.record_object(scene, entity, "Change Tag");
            scene.set_tag(entity, tag);
            scene.mark_dirty(entity);
        }
        undo.collapse_group(group);

        self.history
            .record(format!("Set tag \"{tag}\" on {} entities", selection.len()));
    }

    /// Sets the layer on every entity in the selection as a single undo
    /// group.
    pub fn set_layers<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        selection: &[Entity],
        layer: i32,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        if selection.is_empty() {
            return;
        }

        let group = undo.begin_group("Change Layer");
        for &entity in selection {
            if !scene.is_alive(entity) {
                continue;
            }
            undo.record_object(scene, entity, "Change Layer");
            scene.set_layer(entity, layer);
            scene.mark_dirty(entity);
        }
        undo.collapse_group(group);

        self.history
            .record(format!("Set layer {layer} on {} entities", selection.len()));
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}
