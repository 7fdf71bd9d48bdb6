//! Benchmarks for sidebar resolution and layout selection.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use leaf_config::{NavEntry, Sidebar, SidebarGroup, SidebarMap};
use leaf_site::{LayoutRegistry, PageFrontMatter, neighbors, resolve_sidebar};

/// Create a scoped sidebar with `sections` prefixes of `depth` levels each.
fn create_sidebar(sections: usize, depth: usize) -> Sidebar {
    let mut map = SidebarMap::new();
    for s in 0..sections {
        let mut prefix = format!("/section-{s}/");
        for d in 0..depth {
            let items = (0..10)
                .map(|i| NavEntry::new(format!("Page {i}"), format!("{prefix}page-{i}")))
                .collect();
            map.insert(prefix.clone(), vec![SidebarGroup::new(format!("Level {d}"), items)]);
            prefix.push_str(&format!("level-{d}/"));
        }
    }
    Sidebar::Scoped(map)
}

fn bench_resolve_sidebar(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_sidebar");

    for sections in [10, 100] {
        let sidebar = create_sidebar(sections, 4);
        let path = format!("/section-{}/level-0/level-1/page-3", sections - 1);

        group.bench_with_input(BenchmarkId::new("scoped_hit", sections), &path, |b, path| {
            b.iter(|| resolve_sidebar(&sidebar, path));
        });

        group.bench_with_input(
            BenchmarkId::new("scoped_miss", sections),
            &"/elsewhere/page",
            |b, path| b.iter(|| resolve_sidebar(&sidebar, path)),
        );
    }

    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let sidebar = create_sidebar(1, 1);
    let groups = resolve_sidebar(&sidebar, "/section-0/page-5");

    c.bench_function("neighbors", |b| {
        b.iter(|| neighbors(groups, "/section-0/page-5"));
    });
}

fn bench_select_layout(c: &mut Criterion) {
    let mut registry = LayoutRegistry::new();
    registry.register("bento", "CustomHome");
    registry.register("cyber", "CyberHome");

    let hit = PageFrontMatter::with_layout("bento");
    let miss = PageFrontMatter::default();

    let mut group = c.benchmark_group("select_layout");
    group.bench_function("registered", |b| b.iter(|| registry.select_layout(&hit)));
    group.bench_function("default", |b| b.iter(|| registry.select_layout(&miss)));
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_sidebar,
    bench_neighbors,
    bench_select_layout
);
criterion_main!(benches);
