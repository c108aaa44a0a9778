use criterion::{black_box, criterion_group, criterion_main, Criterion};

use scene_workbench::{collect, EntityFilter, SceneProvider, SceneWorld, SortKey};

/// Builds a scene of `roots` root entities, each with `children` children.
fn build_scene(roots: u32, children: u32) -> SceneWorld {
    let mut scene = SceneWorld::new();
    for r in 0..roots {
        let root = scene.spawn(format!("Root{r:04}"));
        scene.set_layer(root, (r % 8) as i32);
        for c in 0..children {
            let child = scene.spawn(format!("Child{r:04}_{c:04}"));
            scene.set_parent(child, root);
            if c % 3 == 0 {
                scene.set_active(child, false);
            }
        }
    }
    scene
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

fn bench_collect_small(c: &mut Criterion) {
    let scene = build_scene(10, 10);
    let filter = EntityFilter::new();
    c.bench_function("collect_110_name_ascending", |b| {
        b.iter(|| collect(black_box(&scene), black_box(&filter), SortKey::NameAscending));
    });
}

fn bench_collect_large(c: &mut Criterion) {
    let scene = build_scene(100, 50);
    let filter = EntityFilter::new();
    c.bench_function("collect_5100_name_ascending", |b| {
        b.iter(|| collect(black_box(&scene), black_box(&filter), SortKey::NameAscending));
    });
}

fn bench_collect_filtered(c: &mut Criterion) {
    let scene = build_scene(100, 50);
    let mut filter = EntityFilter::new();
    filter.search_query = "child".into();
    filter.show_inactive = false;
    c.bench_function("collect_5100_filtered_layer", |b| {
        b.iter(|| collect(black_box(&scene), black_box(&filter), SortKey::Layer));
    });
}

criterion_group!(
    benches,
    bench_collect_small,
    bench_collect_large,
    bench_collect_filtered
);
criterion_main!(benches);
