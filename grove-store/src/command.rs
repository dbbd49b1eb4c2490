use crate::model::{NodeId, TreeNode};

/// Commands applied to a [`crate::TreeStore`], one at a time.
#[derive(Debug, Clone)]
pub enum TreeCommand {
    /// Create a new unloaded node named `name` under `parent`.
    AddChild { parent: NodeId, name: String },
    /// Append an already built node, keeping its ids.
    InsertChild { parent: NodeId, node: TreeNode },
    /// Change the label of a node.
    Rename { id: NodeId, name: String },
    /// Remove a node and everything below it.
    Delete { id: NodeId },
    /// A node was dragged and dropped onto another node.
    Move { dragged: NodeId, target: NodeId },
    /// Expand or collapse a node, starting a lazy load when needed.
    Toggle { id: NodeId },
    /// Fetched children arrived for a loading node.
    ChildrenLoaded { id: NodeId, children: Vec<TreeNode> },
    /// The children fetch for a node failed.
    LoadFailed { id: NodeId, message: String },
}
