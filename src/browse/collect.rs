use std::collections::HashSet;

use crate::entity::Entity;
use crate::scene::SceneProvider;

use super::filter::EntityFilter;
use super::sort::{sort_entities, SortKey};

/// Projects the scene tree into the ordered working list.
///
/// Walks depth-first pre-order from every root, evaluating the filter on
/// each node. A node that fails the filter is still recursed into, so a
/// filtered-out ancestor never hides matching descendants. After the walk,
/// the accumulator gets one stable sort by `key` — output order is fully
/// determined by the sort key, not traversal order.
///
/// Defensive against malformed host graphs: dead handles are skipped and a
/// handle seen twice is terminal, so traversal ends even if the host graph
/// contains a cycle.
pub fn collect<S: SceneProvider>(scene: &S, filter: &EntityFilter, key: SortKey) -> Vec<Entity> {
    let mut results = Vec::new();
    let mut visited = HashSet::new();

    for root in scene.roots() {
        collect_subtree(scene, root, filter, &mut visited, &mut results);
    }

    sort_entities(scene, &mut results, key);
    results
}

fn collect_subtree<S: SceneProvider>(
    scene: &S,
    entity: Entity,
    filter: &EntityFilter,
    visited: &mut HashSet<Entity>,
    results: &mut Vec<Entity>,
) {
    if !scene.is_alive(entity) || !visited.insert(entity) {
        return;
    }

    if filter.matches(scene, entity) {
        results.push(entity);
    }

    for child in scene.children(entity) {
        collect_subtree(scene, child, filter, visited, results);
    }
}
