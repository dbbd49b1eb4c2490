use std::collections::HashSet;

use crate::locator::{walk, walk_subtree};
use crate::model::{Forest, LoadState, NodeId, TreeNode};

/// Current snapshot plus display state of the tree.
///
/// Expansion lives beside the forest rather than inside the nodes, so the
/// node data never depends on what is shown.
#[derive(Debug, Default)]
pub(crate) struct TreeState {
    forest: Forest,
    expanded: HashSet<NodeId>,
}

impl TreeState {
    pub(crate) fn new(forest: Forest) -> Self {
        Self {
            forest,
            expanded: HashSet::new(),
        }
    }

    // --- Read access ---

    pub(crate) fn forest(&self) -> &Forest {
        &self.forest
    }

    pub(crate) fn expanded(&self) -> &HashSet<NodeId> {
        &self.expanded
    }

    pub(crate) fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    // --- Write access ---

    pub(crate) fn set_forest(&mut self, forest: Forest) {
        self.forest = forest;
    }

    /// Replace the snapshot, keeping expansion only for nodes that are
    /// still present and not unloaded.
    pub(crate) fn replace_forest(&mut self, forest: Forest) {
        let present: HashSet<&NodeId> = walk(&forest)
            .filter(|node| node.load_state() != LoadState::Unloaded)
            .map(TreeNode::id)
            .collect();
        self.expanded.retain(|id| present.contains(id));
        self.forest = forest;
    }

    pub(crate) fn expand(&mut self, id: NodeId) {
        self.expanded.insert(id);
    }

    pub(crate) fn collapse(&mut self, id: &NodeId) -> bool {
        self.expanded.remove(id)
    }

    /// Forget expansion of every node in a removed subtree.
    pub(crate) fn forget_subtree(&mut self, removed: &TreeNode) {
        for node in walk_subtree(removed) {
            self.expanded.remove(node.id());
        }
    }
}
