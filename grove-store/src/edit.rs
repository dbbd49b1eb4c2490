//! Structural edits.
//!
//! Every edit rebuilds only the nodes on the path from a root to the edited
//! node. Siblings along the way are shared with the input forest, which is
//! never modified. The plain functions return the input unchanged when the
//! id is missing; the `try_` forms return `None` instead so callers can tell
//! that nothing happened.

use std::sync::Arc;

use crate::locator::index_path;
use crate::model::{Forest, NodeId, TreeNode};

/// What to do with the node found at the end of a path.
pub(crate) enum Splice {
    Replace(TreeNode),
    Remove,
}

/// Locate `id` and apply `splice` to it, rebuilding its ancestors.
///
/// Returns `None` when `id` is missing or `splice` declines.
pub(crate) fn splice_node<F>(
    forest: &Forest,
    id: &NodeId,
    splice: F,
) -> Option<Forest>
where
    F: FnOnce(&Arc<TreeNode>) -> Option<Splice>,
{
    let path = index_path(forest.roots(), id)?;
    let roots = splice_at(forest.roots(), &path, splice)?;
    Some(Forest::from_roots(roots))
}

fn splice_at<F>(
    nodes: &[Arc<TreeNode>],
    path: &[usize],
    splice: F,
) -> Option<Vec<Arc<TreeNode>>>
where
    F: FnOnce(&Arc<TreeNode>) -> Option<Splice>,
{
    let (&index, rest) = path.split_first()?;
    let node = nodes.get(index)?;
    let mut rebuilt = nodes.to_vec();

    if rest.is_empty() {
        match splice(node)? {
            Splice::Replace(next) => rebuilt[index] = Arc::new(next),
            Splice::Remove => {
                rebuilt.remove(index);
            },
        }
        return Some(rebuilt);
    }

    let children = splice_at(node.children()?, rest, splice)?;
    rebuilt[index] = Arc::new(node.with_replaced_children(children));
    Some(rebuilt)
}

/// Append `child` as the last child of `parent_id`.
pub fn add_child(
    forest: &Forest,
    parent_id: &NodeId,
    child: TreeNode,
) -> Forest {
    try_add_child(forest, parent_id, child).unwrap_or_else(|| forest.clone())
}

/// Append `child` under `parent_id`.
///
/// Returns `None` when the parent is missing or currently loading.
pub fn try_add_child(
    forest: &Forest,
    parent_id: &NodeId,
    child: impl Into<Arc<TreeNode>>,
) -> Option<Forest> {
    let child = child.into();
    splice_node(forest, parent_id, |parent| {
        parent.with_appended_child(child).map(Splice::Replace)
    })
}

/// Replace the name of `node_id`, keeping everything else.
pub fn rename(forest: &Forest, node_id: &NodeId, name: &str) -> Forest {
    try_rename(forest, node_id, name).unwrap_or_else(|| forest.clone())
}

/// Rename `node_id`.
///
/// Returns `None` when the node is missing or already carries `name`.
pub fn try_rename(
    forest: &Forest,
    node_id: &NodeId,
    name: &str,
) -> Option<Forest> {
    splice_node(forest, node_id, |node| {
        if node.name() == name {
            return None;
        }
        Some(Splice::Replace(node.renamed(name.to_owned())))
    })
}

/// Remove `node_id` together with its whole subtree.
pub fn delete(forest: &Forest, node_id: &NodeId) -> Forest {
    try_delete(forest, node_id).unwrap_or_else(|| forest.clone())
}

pub fn try_delete(forest: &Forest, node_id: &NodeId) -> Option<Forest> {
    try_detach(forest, node_id).map(|(forest, _)| forest)
}

/// Remove `node_id` and hand back the removed subtree intact.
pub fn detach(
    forest: &Forest,
    node_id: &NodeId,
) -> (Forest, Option<Arc<TreeNode>>) {
    match try_detach(forest, node_id) {
        Some((next, removed)) => (next, Some(removed)),
        None => (forest.clone(), None),
    }
}

pub fn try_detach(
    forest: &Forest,
    node_id: &NodeId,
) -> Option<(Forest, Arc<TreeNode>)> {
    let mut removed = None;
    let next = splice_node(forest, node_id, |node| {
        removed = Some(Arc::clone(node));
        Some(Splice::Remove)
    })?;
    Some((next, removed?))
}
