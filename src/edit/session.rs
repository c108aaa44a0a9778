use glam::Vec3;

use crate::browse::{collect, sort_entities, EntityFilter, PresenceFilter, SortKey};
use crate::capability::{CapabilityKind, CapabilityRegistry};
use crate::entity::Entity;
use crate::scene::SceneProvider;

use super::config::SessionConfig;
use super::controller::EditController;
use super::history::ChangeHistory;
use super::undo::UndoEngine;

/// Display-only cache of the first selected entity's editable values.
///
/// Presentation reads these instead of hitting the scene every frame; the
/// session refreshes them after its own mutations and when the host
/// reports an undo/redo it performed on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayState {
    /// Local position.
    pub position: Vec3,
    /// Local rotation as XYZ Euler angles in radians.
    pub rotation: Vec3,
    /// Local scale.
    pub scale: Vec3,
    /// The entity's own active flag.
    pub active: bool,
}

/// A deferred undo or redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingStep {
    Undo,
    Redo,
}

/// One operator's editing session: filter and sort criteria, the working
/// list they project, the selection inside it, and the batch controller
/// with its change ledger.
///
/// All state is per-session; nothing is shared between sessions or held in
/// globals. Create one per editing window/context and pass the scene and
/// undo engine into each call.
///
/// Undo/redo button presses go through [`request_undo`](Self::request_undo)
/// and [`request_redo`](Self::request_redo), which park a single pending
/// step; [`tick`](Self::tick) drains it on the next control-loop pass so
/// host state is never mutated mid-frame. The drain preserves the required
/// order: pop the ledger first, then ask the host engine to step.
pub struct EditSession {
    filter: EntityFilter,
    sort: SortKey,
    entities: Vec<Entity>,
    selection: Vec<Entity>,
    controller: EditController,
    pending: Option<PendingStep>,
    display: Option<DisplayState>,
}

impl EditSession {
    /// Creates a session with default criteria and an empty ledger.
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            filter: EntityFilter::new(),
            sort: SortKey::default(),
            entities: Vec::new(),
            selection: Vec::new(),
            controller: EditController::new(config.active_toggle_policy),
            pending: None,
            display: None,
        }
    }

    // ---- Browsing ----

    /// Recomputes the working list from the scene, then re-validates the
    /// selection against it: entities filtered out, reparented away, or
    /// destroyed since the last pass drop out of the selection.
    pub fn refresh<S: SceneProvider>(&mut self, scene: &S) {
        self.entities = collect(scene, &self.filter, self.sort);
        let entities = &self.entities;
        self.selection.retain(|e| entities.contains(e));
        self.sync_display(scene);
    }

    /// The current working list, in sort order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// The active filter criteria.
    pub fn filter(&self) -> &EntityFilter {
        &self.filter
    }

    /// The active sort key.
    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// Changes the sort key and re-sorts the current working list without
    /// re-collecting.
    pub fn set_sort<S: SceneProvider>(&mut self, scene: &S, key: SortKey) {
        self.sort = key;
        sort_entities(scene, &mut self.entities, key);
    }

    /// Changes the name search query and refreshes the working list.
    pub fn set_search_query<S: SceneProvider>(&mut self, scene: &S, query: impl Into<String>) {
        self.filter.search_query = query.into();
        self.refresh(scene);
    }

    /// Changes the show-inactive flag and refreshes the working list.
    pub fn set_show_inactive<S: SceneProvider>(&mut self, scene: &S, show: bool) {
        self.filter.show_inactive = show;
        self.refresh(scene);
    }

    /// Changes one capability presence filter and refreshes the working
    /// list.
    pub fn set_presence_filter<S: SceneProvider>(
        &mut self,
        scene: &S,
        kind: CapabilityKind,
        presence: PresenceFilter,
    ) {
        self.filter.set_presence(kind, presence);
        self.refresh(scene);
    }

    // ---- Selection ----

    /// The current selection, in the order entities were selected.
    pub fn selection(&self) -> &[Entity] {
        &self.selection
    }

    /// Whether an entity is currently selected.
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selection.contains(&entity)
    }

    /// Adds a working-list entity to the selection. Entities outside the
    /// working list are ignored.
    pub fn select(&mut self, entity: Entity) {
        if self.entities.contains(&entity) && !self.selection.contains(&entity) {
            self.selection.push(entity);
        }
    }

    /// Removes an entity from the selection.
    pub fn deselect(&mut self, entity: Entity) {
        self.selection.retain(|&e| e != entity);
    }

    /// Toggles an entity's selection state.
    pub fn toggle_selected(&mut self, entity: Entity) {
        if self.is_selected(entity) {
            self.deselect(entity);
        } else {
            self.select(entity);
        }
    }

    /// Selects the entire working list, in list order.
    pub fn select_all(&mut self) {
        self.selection = self.entities.clone();
    }

    /// Empties the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ---- Batch edits ----

    /// Applies a transform to the whole selection. See
    /// [`EditController::apply_transforms`].
    pub fn apply_transforms<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        position: Vec3,
        rotation: Vec3,
        scale: Vec3,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.controller
            .apply_transforms(scene, undo, &self.selection, position, rotation, scale);
        self.sync_display(scene);
    }

    /// Sets the active flag on the whole selection. See
    /// [`EditController::set_active`].
    pub fn set_active<S, U>(&mut self, scene: &mut S, undo: &mut U, active: bool)
    where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.controller
            .set_active(scene, undo, &self.selection, active);
        self.sync_display(scene);
    }

    /// Attaches a capability to the whole selection. See
    /// [`EditController::add_capability`].
    pub fn add_capability<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        registry: &CapabilityRegistry,
        kind: CapabilityKind,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.controller
            .add_capability(scene, undo, registry, &self.selection, kind);
        self.sync_display(scene);
    }

    /// Detaches a capability from the whole selection. See
    /// [`EditController::remove_capability`].
    pub fn remove_capability<S, U>(
        &mut self,
        scene: &mut S,
        undo: &mut U,
        registry: &CapabilityRegistry,
        kind: CapabilityKind,
    ) where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.controller
            .remove_capability(scene, undo, registry, &self.selection, kind);
        self.sync_display(scene);
    }

    /// Sets the tag on the whole selection. See
    /// [`EditController::set_tags`].
    pub fn set_tags<S, U>(&mut self, scene: &mut S, undo: &mut U, tag: &str)
    where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.controller.set_tags(scene, undo, &self.selection, tag);
        self.sync_display(scene);
    }

    /// Sets the layer on the whole selection. See
    /// [`EditController::set_layers`].
    pub fn set_layers<S, U>(&mut self, scene: &mut S, undo: &mut U, layer: i32)
    where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        self.controller
            .set_layers(scene, undo, &self.selection, layer);
        self.sync_display(scene);
    }

    // ---- Undo / redo ----

    /// The change ledger.
    pub fn history(&self) -> &ChangeHistory {
        self.controller.history()
    }

    /// Whether an undo is available, for UI enablement.
    pub fn can_undo(&self) -> bool {
        self.controller.history().can_undo()
    }

    /// Whether a redo is available, for UI enablement.
    pub fn can_redo(&self) -> bool {
        self.controller.history().can_redo()
    }

    /// Parks an undo request for the next [`tick`](Self::tick).
    ///
    /// The pending slot holds one step: a second request before the tick
    /// replaces the first.
    pub fn request_undo(&mut self) {
        self.pending = Some(PendingStep::Undo);
    }

    /// Parks a redo request for the next [`tick`](Self::tick).
    pub fn request_redo(&mut self) {
        self.pending = Some(PendingStep::Redo);
    }

    /// Drains at most one pending undo/redo step.
    ///
    /// Pops the ledger first; only if the ledger had an entry does the
    /// host engine get asked for the matching physical step. An empty
    /// ledger makes the drained request a no-op.
    pub fn tick<S, U>(&mut self, scene: &mut S, undo: &mut U)
    where
        S: SceneProvider,
        U: UndoEngine<S>,
    {
        let Some(step) = self.pending.take() else {
            return;
        };

        match step {
            PendingStep::Undo => {
                if self.controller.history_mut().undo().is_some() {
                    undo.perform_undo(scene);
                }
            }
            PendingStep::Redo => {
                if self.controller.history_mut().redo().is_some() {
                    undo.perform_redo(scene);
                }
            }
        }
        self.sync_display(scene);
    }

    /// Host undo/redo notification hook body.
    ///
    /// Call this whenever the host performs an undo or redo outside this
    /// session's own [`tick`](Self::tick). It re-reads display-only cached
    /// values from live entity state and touches nothing else — in
    /// particular, the ledger stacks stay exactly as they were, even
    /// though they may now disagree with the host's undo depth.
    pub fn on_host_undo_redo<S: SceneProvider>(&mut self, scene: &S) {
        self.sync_display(scene);
    }

    /// The cached editable values of the first selected entity.
    pub fn display(&self) -> Option<&DisplayState> {
        self.display.as_ref()
    }

    fn sync_display<S: SceneProvider>(&mut self, scene: &S) {
        self.display = self
            .selection
            .iter()
            .find(|&&e| scene.is_alive(e))
            .and_then(|&e| {
                let transform = scene.local_transform(e)?;
                Some(DisplayState {
                    position: transform.translation,
                    rotation: transform.euler_angles(),
                    scale: transform.scale,
                    active: scene.is_active(e),
                })
            });
    }
}
