//! Lookup and move benchmarks over a deep, wide workspace.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skribe::tree::{DropPosition, FileNode, FolderNode, Node, WorkspaceTree};
use skribe::types::NodeId;

/// Build a tree of `depth` nested folders, each holding `width` files.
fn build_tree(depth: usize, width: usize) -> (WorkspaceTree, NodeId) {
    let mut deepest_file = None;
    let mut current: Option<Node> = None;
    for level in 0..depth {
        let mut children: Vec<Node> = (0..width)
            .map(|i| {
                let file = FileNode::new(format!("file-{}-{}.sk", level, i), "content");
                if deepest_file.is_none() {
                    deepest_file = Some(file.id);
                }
                Node::File(file)
            })
            .collect();
        if let Some(inner) = current.take() {
            children.push(inner);
        }
        current = Some(FolderNode::with_children(format!("level-{}", level), children).into());
    }
    let root = FolderNode::with_children("workspace", current.into_iter().collect());
    (
        WorkspaceTree::new(root),
        deepest_file.expect("at least one file"),
    )
}

fn bench_find(c: &mut Criterion) {
    let (tree, deepest) = build_tree(16, 8);
    c.bench_function("find_deepest_node", |b| {
        b.iter(|| black_box(tree.find(black_box(deepest))))
    });
}

fn bench_move(c: &mut Criterion) {
    let (tree, deepest) = build_tree(16, 8);
    let target = tree.root().children[0].id();
    c.bench_function("move_deepest_to_top", |b| {
        b.iter(|| black_box(tree.move_node(black_box(deepest), target, DropPosition::Before)))
    });
}

criterion_group!(benches, bench_find, bench_move);
criterion_main!(benches);
