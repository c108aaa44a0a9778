//! Capability kinds and their registry.
//!
//! A capability is an attachable behavior/data unit on an entity (a
//! renderer, a collider, a physics body) whose presence or absence the
//! browse filter can test and the edit controller can toggle. The core
//! never inspects capability internals: it deals in opaque
//! [`CapabilityKind`] identifiers resolved through a [`CapabilityRegistry`]
//! built once at startup.

/// Opaque identifier for a registered capability kind.
///
/// Ids are indices into the [`CapabilityRegistry`] that issued them and are
/// stable for the registry's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CapabilityKind(u32);

impl CapabilityKind {
    /// Returns the registry index of this kind.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Metadata for one registered capability kind.
#[derive(Debug, Clone)]
pub struct CapabilityInfo {
    name: String,
}

impl CapabilityInfo {
    /// The display name of the capability (e.g. `"MeshRenderer"`).
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// An ordered list of capability kinds, resolved once at startup.
///
/// Registration order is the registry order; ids issued by
/// [`register`](Self::register) stay valid for the registry's lifetime.
/// Hosts register every capability kind they expose before any session
/// starts, then share the registry with filters and controllers.
///
/// # Example
///
/// ```
/// use scene_workbench::CapabilityRegistry;
///
/// let mut registry = CapabilityRegistry::new();
/// let renderer = registry.register("MeshRenderer");
/// let collider = registry.register("Collider");
///
/// assert_eq!(registry.info(renderer).unwrap().name(), "MeshRenderer");
/// assert_eq!(registry.resolve("Collider"), Some(collider));
/// ```
#[derive(Debug, Default)]
pub struct CapabilityRegistry {
    kinds: Vec<CapabilityInfo>,
}

impl CapabilityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Registers a capability kind and returns its id.
    ///
    /// Registering a name that already exists returns the existing id
    /// instead of creating a duplicate entry.
    pub fn register(&mut self, name: impl Into<String>) -> CapabilityKind {
        let name = name.into();
        if let Some(existing) = self.resolve(&name) {
            return existing;
        }
        let id = CapabilityKind(self.kinds.len() as u32);
        self.kinds.push(CapabilityInfo { name });
        id
    }

    /// Looks up a kind by name.
    pub fn resolve(&self, name: &str) -> Option<CapabilityKind> {
        self.kinds
            .iter()
            .position(|info| info.name == name)
            .map(|idx| CapabilityKind(idx as u32))
    }

    /// Returns the metadata for a kind, or `None` if the id was not issued
    /// by this registry.
    pub fn info(&self, kind: CapabilityKind) -> Option<&CapabilityInfo> {
        self.kinds.get(kind.index())
    }

    /// Iterates over all registered kinds in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (CapabilityKind, &CapabilityInfo)> {
        self.kinds
            .iter()
            .enumerate()
            .map(|(idx, info)| (CapabilityKind(idx as u32), info))
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
