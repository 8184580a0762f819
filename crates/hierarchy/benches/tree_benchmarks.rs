use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use kinit_core::{Entity, EntityId};
use kinit_hierarchy::{TreeNode, build_tree, filter_by_keyword, flatten};

#[derive(Debug, Clone)]
struct Node {
    id: EntityId,
    parent_id: Option<EntityId>,
    name: String,
    sort: i32,
    children: Option<Vec<Node>>,
}

impl Entity for Node {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

impl TreeNode for Node {
    fn parent_id(&self) -> Option<&EntityId> {
        self.parent_id.as_ref()
    }
    fn sort_key(&self) -> i32 {
        self.sort
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name]
    }
    fn children(&self) -> Option<&[Self]> {
        self.children.as_deref()
    }
    fn children_mut(&mut self) -> &mut Option<Vec<Self>> {
        &mut self.children
    }
}

/// Flat list where node `i` hangs under node `(i - 1) / fanout`.
fn flat_nodes(size: usize, fanout: usize) -> Vec<Node> {
    (0..size)
        .map(|i| Node {
            id: EntityId::from(i as u64),
            parent_id: (i > 0).then(|| EntityId::from(((i - 1) / fanout) as u64)),
            name: format!("部门-{i}"),
            sort: (size - i) as i32,
            children: None,
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for size in [100usize, 1_000, 10_000] {
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("fanout_4", size), &size, |b, &size| {
            let flat = flat_nodes(size, 4);
            b.iter(|| build_tree(black_box(flat.clone())))
        });
    }

    group.finish();
}

fn bench_filter_and_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_flatten");

    for size in [100usize, 1_000, 10_000] {
        let Ok(tree) = build_tree(flat_nodes(size, 4)) else {
            continue;
        };
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("keyword", size), &tree, |b, tree| {
            b.iter(|| filter_by_keyword(black_box(tree), "-9"))
        });
        group.bench_with_input(BenchmarkId::new("flatten", size), &tree, |b, tree| {
            b.iter(|| flatten(black_box(tree)).len())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_tree, bench_filter_and_flatten);
criterion_main!(benches);
