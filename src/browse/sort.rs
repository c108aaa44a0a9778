use crate::entity::Entity;
use crate::scene::SceneProvider;

/// Ordering applied to a collected entity list. Exactly one is active at a
/// time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Lexicographic by display name, A to Z.
    #[default]
    NameAscending,
    /// Lexicographic by display name, Z to A.
    NameDescending,
    /// Entities whose own active flag is set come first.
    ActiveFirst,
    /// Entities whose own active flag is clear come first.
    InactiveFirst,
    /// Lexicographic by tag.
    Tag,
    /// Numeric by layer.
    Layer,
}

/// Sorts a collected entity list in place by the given key.
///
/// The sort is stable: entities with equal keys keep their collection
/// order, so repeated passes over an unchanged scene produce identical
/// lists. Name comparison is case-sensitive natural string ordering; the
/// active partitions use each entity's *own* flag, not the hierarchy flag.
pub fn sort_entities<S: SceneProvider>(scene: &S, entities: &mut [Entity], key: SortKey) {
    match key {
        SortKey::NameAscending => {
            entities.sort_by(|a, b| scene.name(*a).cmp(&scene.name(*b)));
        }
        SortKey::NameDescending => {
            entities.sort_by(|a, b| scene.name(*b).cmp(&scene.name(*a)));
        }
        SortKey::ActiveFirst => {
            entities.sort_by_key(|e| !scene.is_active(*e));
        }
        SortKey::InactiveFirst => {
            entities.sort_by_key(|e| scene.is_active(*e));
        }
        SortKey::Tag => {
            entities.sort_by(|a, b| scene.tag(*a).cmp(&scene.tag(*b)));
        }
        SortKey::Layer => {
            entities.sort_by_key(|e| scene.layer(*e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneWorld;

    fn names<S: SceneProvider>(scene: &S, entities: &[Entity]) -> Vec<String> {
        entities
            .iter()
            .map(|e| scene.name(*e).unwrap_or_default().to_owned())
            .collect()
    }

    #[test]
    fn name_ascending_and_descending() {
        let mut scene = SceneWorld::new();
        let mut list = vec![
            scene.spawn("Cherry"),
            scene.spawn("Apple"),
            scene.spawn("Banana"),
        ];

        sort_entities(&scene, &mut list, SortKey::NameAscending);
        assert_eq!(names(&scene, &list), vec!["Apple", "Banana", "Cherry"]);

        sort_entities(&scene, &mut list, SortKey::NameDescending);
        assert_eq!(names(&scene, &list), vec!["Cherry", "Banana", "Apple"]);
    }

    #[test]
    fn active_partitions_use_self_flag() {
        let mut scene = SceneWorld::new();
        let parent = scene.spawn("Parent");
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        scene.set_parent(a, parent);
        scene.set_active(parent, false); // a is hierarchy-inactive, self-active
        scene.set_active(b, false);

        let mut list = vec![b, a, parent];
        sort_entities(&scene, &mut list, SortKey::ActiveFirst);
        // a keeps its own active flag, so it leads despite the parent.
        assert_eq!(list, vec![a, b, parent]);

        sort_entities(&scene, &mut list, SortKey::InactiveFirst);
        assert_eq!(list, vec![b, parent, a]);
    }

    #[test]
    fn tag_and_layer() {
        let mut scene = SceneWorld::new();
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        let c = scene.spawn("C");
        scene.set_tag(a, "props");
        scene.set_tag(b, "enemies");
        scene.set_tag(c, "player");
        scene.set_layer(a, 5);
        scene.set_layer(b, -1);
        scene.set_layer(c, 2);

        let mut list = vec![a, b, c];
        sort_entities(&scene, &mut list, SortKey::Tag);
        assert_eq!(list, vec![b, c, a]);

        sort_entities(&scene, &mut list, SortKey::Layer);
        assert_eq!(list, vec![b, c, a]);
    }

    #[test]
    fn equal_keys_keep_input_order() {
        let mut scene = SceneWorld::new();
        let first = scene.spawn("Same");
        let second = scene.spawn("Same");
        let third = scene.spawn("Same");

        let mut list = vec![first, second, third];
        sort_entities(&scene, &mut list, SortKey::NameAscending);
        assert_eq!(list, vec![first, second, third]);

        sort_entities(&scene, &mut list, SortKey::ActiveFirst);
        assert_eq!(list, vec![first, second, third]);
    }

    #[test]
    fn active_partition_is_stable_within_partitions() {
        let mut scene = SceneWorld::new();
        let on_a = scene.spawn("OnA");
        let off_a = scene.spawn("OffA");
        let on_b = scene.spawn("OnB");
        let off_b = scene.spawn("OffB");
        scene.set_active(off_a, false);
        scene.set_active(off_b, false);

        let mut list = vec![off_a, on_a, off_b, on_b];
        sort_entities(&scene, &mut list, SortKey::ActiveFirst);
        assert_eq!(list, vec![on_a, on_b, off_a, off_b]);
    }
}
