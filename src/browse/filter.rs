use std::collections::HashMap;

use crate::capability::CapabilityKind;
use crate::entity::Entity;
use crate::scene::SceneProvider;

/// Tri-state presence test for one capability kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PresenceFilter {
    /// Do not filter on this capability.
    #[default]
    Any,
    /// Only entities carrying the capability match.
    Present,
    /// Only entities lacking the capability match.
    Absent,
}

impl PresenceFilter {
    /// Cycles Any → Present → Absent → Any, for tri-state toggle buttons.
    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::Present,
            Self::Present => Self::Absent,
            Self::Absent => Self::Any,
        }
    }
}

/// Filter criteria for one browse pass over the scene.
///
/// A value object: immutable while a pass evaluates it, mutated by the
/// operator between passes. [`matches`](Self::matches) is pure — no side
/// effects, same inputs same output — so concurrent passes may share one
/// filter.
///
/// # Example
///
/// ```
/// use scene_workbench::{EntityFilter, PresenceFilter, CapabilityRegistry, SceneWorld};
///
/// let mut registry = CapabilityRegistry::new();
/// let collider = registry.register("Collider");
///
/// let mut filter = EntityFilter::new();
/// filter.search_query = "crate".into();
/// filter.set_presence(collider, PresenceFilter::Present);
///
/// let mut scene = SceneWorld::new();
/// let e = scene.spawn("WoodenCrate");
/// # use scene_workbench::SceneProvider;
/// scene.attach_capability(e, collider);
/// assert!(filter.matches(&scene, e));
/// ```
#[derive(Debug, Clone)]
pub struct EntityFilter {
    /// Case-insensitive name substring; empty matches every name.
    pub search_query: String,
    /// When `false`, entities inactive anywhere up their hierarchy are
    /// filtered out.
    pub show_inactive: bool,
    presence: HashMap<CapabilityKind, PresenceFilter>,
}

impl Default for EntityFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityFilter {
    /// Creates a filter that matches everything.
    pub fn new() -> Self {
        Self {
            search_query: String::new(),
            show_inactive: true,
            presence: HashMap::new(),
        }
    }

    /// Sets the presence test for one capability kind. `Any` removes the
    /// entry.
    pub fn set_presence(&mut self, kind: CapabilityKind, filter: PresenceFilter) {
        if filter == PresenceFilter::Any {
            self.presence.remove(&kind);
        } else {
            self.presence.insert(kind, filter);
        }
    }

    /// Returns the presence test for one capability kind.
    pub fn presence(&self, kind: CapabilityKind) -> PresenceFilter {
        self.presence.get(&kind).copied().unwrap_or_default()
    }

    /// Evaluates one entity against all criteria.
    pub fn matches<S: SceneProvider>(&self, scene: &S, entity: Entity) -> bool {
        if !self.show_inactive && !scene.is_active_in_hierarchy(entity) {
            return false;
        }

        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            match scene.name(entity) {
                Some(name) if name.to_lowercase().contains(&query) => {}
                _ => return false,
            }
        }

        for (&kind, &filter) in &self.presence {
            let present = scene.has_capability(entity, kind);
            match filter {
                PresenceFilter::Present if !present => return false,
                PresenceFilter::Absent if present => return false,
                _ => {}
            }
        }

        true
    }
}
