use std::fmt;

/// A lightweight generational entity identifier.
///
/// Layout: `u32 index` + `u32 generation`.
///
/// - **index**: slot in the scene's entity allocator
/// - **generation**: bumped every time a slot is recycled, so handles held
///   across a despawn read as dead instead of aliasing the new occupant
///
/// Handles are opaque to callers: the only supported operations are
/// comparison, hashing, and passing them back to the scene that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the generation of this entity.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

/// Allocates and recycles entity slots with generation tracking.
///
/// Despawned slots go onto a free list; the next allocation reuses the slot
/// with a bumped generation, invalidating any stale [`Entity`] handles.
/// [`iter_alive`](Self::iter_alive) enumerates slots in ascending index
/// order, which keeps enumeration deterministic within one pass.
pub(crate) struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    free_list: Vec<u32>,
    count: u32,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            count: 0,
        }
    }

    /// Allocates a new entity, reusing a recycled slot if one is available.
    pub fn allocate(&mut self) -> Entity {
        self.count += 1;

        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            Entity::new(index, self.generations[idx])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            Entity::new(index, 0)
        }
    }

    /// Deallocates an entity. Returns `false` if it was already dead or the
    /// handle is stale.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        if idx >= self.alive.len()
            || !self.alive[idx]
            || self.generations[idx] != entity.generation()
        {
            return false;
        }

        self.alive[idx] = false;
        // Bump the generation so stale handles never alias the next occupant.
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_list.push(entity.index());
        self.count -= 1;
        true
    }

    /// Returns whether the entity is currently alive.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index() as usize;
        idx < self.alive.len() && self.alive[idx] && self.generations[idx] == entity.generation()
    }

    /// Returns the number of alive entities.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Iterates over all alive entities in ascending slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| Entity::new(idx as u32, self.generations[idx]))
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
