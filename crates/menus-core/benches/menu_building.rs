//! Benchmarks for menu building.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use menus_config::Config;
use menus_core::{
    BehaviorRegistry, MenuContext, MenuHooks, MenuItemTreeBuilder, MenuKind, MenuOptions,
    MenuSource,
};
use menus_store::{MenuPageBehavior, NewPage, PageId, PageKind, PageTree, PageTreeBuilder, Site};

/// Build a tree with `sections` top-level pages, each with `per_section`
/// children that have `per_section` children of their own.
fn generate_tree(sections: u32, per_section: u32) -> PageTree {
    let mut builder = PageTreeBuilder::new();
    let mut next_id = 1;
    let mut id = || {
        let current = next_id;
        next_id += 1;
        PageId(current)
    };

    let home = builder
        .add_page(NewPage::new(id(), "Home", "home"), None)
        .unwrap();
    for s in 0..sections {
        let section = builder
            .add_page(
                NewPage::new(id(), format!("Section {s}"), format!("section-{s}"))
                    .in_menus()
                    .with_kind(PageKind::Menu(MenuPageBehavior {
                        repeat_in_subnav: true,
                        repeated_item_text: "Overview".to_owned(),
                    })),
                Some(home),
            )
            .unwrap();
        for c in 0..per_section {
            let child = builder
                .add_page(
                    NewPage::new(id(), format!("Page {c}"), format!("page-{c}")).in_menus(),
                    Some(section),
                )
                .unwrap();
            for g in 0..per_section {
                builder
                    .add_page(
                        NewPage::new(id(), format!("Leaf {g}"), format!("leaf-{g}")).in_menus(),
                        Some(child),
                    )
                    .unwrap();
            }
        }
    }
    builder.add_site(Site::new("example.com", PageId(1)).default_site());
    builder.build().unwrap()
}

fn bench_section_menu(c: &mut Criterion) {
    let tree = generate_tree(5, 5);
    let behaviors = BehaviorRegistry::new();
    let hooks = MenuHooks::new();
    let builder = MenuItemTreeBuilder::new(&tree, &behaviors, &hooks);
    let options = MenuOptions::for_kind(MenuKind::Section, &Config::default());
    let ctx = MenuContext::new().with_current_page(&tree, PageId(4));

    c.bench_function("section_menu_5x5", |b| {
        b.iter(|| {
            builder.build(
                MenuSource::ChildrenOf(PageId(1)),
                MenuKind::Section,
                &options,
                &ctx,
            )
        });
    });
}

fn bench_menu_by_depth(c: &mut Criterion) {
    let tree = generate_tree(10, 10);
    let behaviors = BehaviorRegistry::new();
    let hooks = MenuHooks::new();
    let builder = MenuItemTreeBuilder::new(&tree, &behaviors, &hooks);
    let ctx = MenuContext::new();

    let mut group = c.benchmark_group("menu_by_depth");
    group.throughput(Throughput::Elements(tree.pages().len() as u64));

    for max_levels in 1..=3 {
        let mut options = MenuOptions::for_kind(MenuKind::Main, &Config::default());
        options.max_levels = max_levels;
        group.bench_with_input(
            BenchmarkId::new("levels", max_levels),
            &options,
            |b, options| {
                b.iter(|| builder.build(MenuSource::ChildrenOf(PageId(1)), MenuKind::Main, options, &ctx));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_section_menu, bench_menu_by_depth);
criterion_main!(benches);
