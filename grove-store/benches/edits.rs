use criterion::{Criterion, black_box, criterion_group, criterion_main};
use grove_store::edit::{delete, rename};
use grove_store::locator::is_descendant;
use grove_store::{Forest, NodeId, TreeNode, move_node};

/// `width` roots, each holding `width` loaded children with one leaf each.
fn wide_forest(width: usize) -> Forest {
    Forest::from_nodes((0..width).map(|root| {
        TreeNode::with_children(
            format!("r{root}"),
            format!("Root {root}"),
            (0..width).map(|child| {
                TreeNode::with_children(
                    format!("r{root}-c{child}"),
                    format!("Child {child}"),
                    [TreeNode::new(
                        format!("r{root}-c{child}-leaf"),
                        "Leaf",
                    )],
                )
            }),
        )
    }))
}

fn bench_edits(c: &mut Criterion) {
    let forest = wide_forest(64);
    let deep_leaf = NodeId::from("r63-c63-leaf");
    let branch = NodeId::from("r63-c63");
    let target = NodeId::from("r0-c0");

    c.bench_function("rename_last_leaf", |b| {
        b.iter(|| black_box(rename(&forest, &deep_leaf, "Renamed")));
    });

    c.bench_function("delete_last_branch", |b| {
        b.iter(|| black_box(delete(&forest, &branch)));
    });

    c.bench_function("move_branch_across_roots", |b| {
        b.iter(|| black_box(move_node(&forest, &branch, &target)));
    });

    c.bench_function("descendant_check_miss", |b| {
        b.iter(|| {
            black_box(is_descendant(&forest, &NodeId::from("r0"), &deep_leaf))
        });
    });
}

criterion_group!(benches, bench_edits);
criterion_main!(benches);
