use std::collections::HashSet;

use crate::model::{Forest, LoadState, NodeId, TreeNode};

/// One visible line of the tree, as a presentation layer would draw it.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    /// Zero-based depth (`0` for roots).
    pub depth: usize,
    pub node: &'a TreeNode,
    pub expanded: bool,
}

impl VisibleRow<'_> {
    /// Whether the row draws an expand/collapse marker: children are known
    /// or on their way. Unloaded rows look like leaves until first opened.
    pub fn has_disclosure(&self) -> bool {
        self.node.load_state() != LoadState::Unloaded
    }

    pub fn is_loading(&self) -> bool {
        self.node.is_loading()
    }
}

/// Flatten the forest into visible rows, depth-first in insertion order.
///
/// Children are listed only below expanded nodes.
pub fn visible_rows<'a>(
    forest: &'a Forest,
    expanded: &HashSet<NodeId>,
) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    for root in forest.roots() {
        push_row(root, 0, expanded, &mut rows);
    }
    rows
}

fn push_row<'a>(
    node: &'a TreeNode,
    depth: usize,
    expanded: &HashSet<NodeId>,
    rows: &mut Vec<VisibleRow<'a>>,
) {
    let is_expanded = expanded.contains(node.id());
    rows.push(VisibleRow {
        depth,
        node,
        expanded: is_expanded,
    });

    if !is_expanded {
        return;
    }
    if let Some(children) = node.children() {
        for child in children {
            push_row(child, depth + 1, expanded, rows);
        }
    }
}
