//! Lazy-load transitions: `Unloaded -> Loading -> Loaded`.
//!
//! A fetch result is applied against whatever forest is current when it
//! arrives, so every transition is a no-op when the node is gone or is not
//! in the expected state.

use std::sync::Arc;

use crate::edit::{Splice, splice_node};
use crate::model::{Forest, LoadState, NodeId, TreeNode};

/// Mark an unloaded node as loading.
pub fn begin_load(forest: &Forest, node_id: &NodeId) -> Forest {
    try_begin_load(forest, node_id).unwrap_or_else(|| forest.clone())
}

/// Returns `None` unless the node exists and is [`LoadState::Unloaded`].
pub fn try_begin_load(forest: &Forest, node_id: &NodeId) -> Option<Forest> {
    splice_node(forest, node_id, |node| {
        (node.load_state() == LoadState::Unloaded)
            .then(|| Splice::Replace(node.marked_loading()))
    })
}

/// Install fetched children on a loading node.
pub fn resolve_load(
    forest: &Forest,
    node_id: &NodeId,
    children: Vec<TreeNode>,
) -> Forest {
    try_resolve_load(forest, node_id, children)
        .unwrap_or_else(|| forest.clone())
}

/// Returns `None` unless the node exists and is [`LoadState::Loading`].
pub fn try_resolve_load(
    forest: &Forest,
    node_id: &NodeId,
    children: Vec<TreeNode>,
) -> Option<Forest> {
    splice_node(forest, node_id, |node| {
        if node.load_state() != LoadState::Loading {
            return None;
        }
        let children = children.into_iter().map(Arc::new).collect();
        Some(Splice::Replace(node.resolved(children)))
    })
}

/// Return a loading node to the unloaded state so it can be fetched again.
pub fn revert_load(forest: &Forest, node_id: &NodeId) -> Forest {
    try_revert_load(forest, node_id).unwrap_or_else(|| forest.clone())
}

pub fn try_revert_load(forest: &Forest, node_id: &NodeId) -> Option<Forest> {
    splice_node(forest, node_id, |node| {
        (node.load_state() == LoadState::Loading)
            .then(|| Splice::Replace(node.unmarked_loading()))
    })
}
