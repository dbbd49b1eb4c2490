use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::ForestError;
use crate::locator;

/// Stable identifier of a tree node.
///
/// Ids are opaque: the store never parses them, it only compares them.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Loading phase of a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Children were never requested.
    Unloaded,
    /// A fetch is outstanding.
    Loading,
    /// Children are present, possibly empty.
    Loaded,
}

/// A named node of the tree.
///
/// `children` keeps a three-way distinction: `None` means the children
/// have not been loaded yet, `Some(empty)` means loaded without children.
/// A loading node never has children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    id: NodeId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    children: Option<Vec<Arc<TreeNode>>>,
    /// Written for observers but never read back: no fetch is running for
    /// a node that arrives from outside the store.
    #[serde(default, skip_deserializing, skip_serializing_if = "is_false")]
    is_loading: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl TreeNode {
    /// Create a node whose children are not loaded yet.
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
            is_loading: false,
        }
    }

    /// Create a loaded node with the given children (possibly none).
    pub fn with_children(
        id: impl Into<NodeId>,
        name: impl Into<String>,
        children: impl IntoIterator<Item = TreeNode>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Some(children.into_iter().map(Arc::new).collect()),
            is_loading: false,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return loaded children, or `None` when they were never loaded.
    pub fn children(&self) -> Option<&[Arc<TreeNode>]> {
        self.children.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn load_state(&self) -> LoadState {
        match (&self.children, self.is_loading) {
            (Some(_), _) => LoadState::Loaded,
            (None, true) => LoadState::Loading,
            (None, false) => LoadState::Unloaded,
        }
    }

    // --- Path rebuilding helpers ---

    pub(crate) fn renamed(&self, name: String) -> Self {
        Self {
            name,
            ..self.clone()
        }
    }

    pub(crate) fn with_replaced_children(
        &self,
        children: Vec<Arc<TreeNode>>,
    ) -> Self {
        Self {
            children: Some(children),
            ..self.clone()
        }
    }

    /// Append a child, creating the children list when absent.
    ///
    /// Returns `None` for a loading node.
    pub(crate) fn with_appended_child(
        &self,
        child: Arc<TreeNode>,
    ) -> Option<Self> {
        if self.is_loading {
            return None;
        }

        let mut children = self.children.clone().unwrap_or_default();
        children.push(child);
        Some(self.with_replaced_children(children))
    }

    pub(crate) fn marked_loading(&self) -> Self {
        Self {
            is_loading: true,
            ..self.clone()
        }
    }

    pub(crate) fn resolved(&self, children: Vec<Arc<TreeNode>>) -> Self {
        Self {
            children: Some(children),
            is_loading: false,
            ..self.clone()
        }
    }

    pub(crate) fn unmarked_loading(&self) -> Self {
        Self {
            is_loading: false,
            ..self.clone()
        }
    }

    /// Clear loading flags across the subtree.
    ///
    /// Applied to nodes entering a store, which has no fetch running for
    /// them.
    pub(crate) fn settled(self) -> Self {
        let children = self
            .children
            .map(|children| children.into_iter().map(settle_shared).collect());
        Self {
            children,
            is_loading: false,
            ..self
        }
    }
}

/// Settle a shared subtree, keeping it shared when nothing was loading.
fn settle_shared(node: Arc<TreeNode>) -> Arc<TreeNode> {
    if !locator::walk_subtree(&node).any(TreeNode::is_loading) {
        return node;
    }
    Arc::new(Arc::unwrap_or_clone(node).settled())
}

/// Ordered sequence of root-level nodes.
///
/// A forest is a persistent value: edits produce a new forest that shares
/// every untouched subtree with the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    roots: Vec<Arc<TreeNode>>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest without checking id uniqueness.
    ///
    /// Use [`Forest::try_from_nodes`] for data coming from outside.
    pub fn from_nodes(nodes: impl IntoIterator<Item = TreeNode>) -> Self {
        Self {
            roots: nodes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build a forest and validate its invariants.
    pub fn try_from_nodes(
        nodes: impl IntoIterator<Item = TreeNode>,
    ) -> Result<Self, ForestError> {
        let forest = Self::from_nodes(nodes);
        forest.validate()?;
        Ok(forest)
    }

    /// Parse a JSON array of nodes and validate it.
    pub fn from_json(source: &str) -> Result<Self, ForestError> {
        let forest: Forest = serde_json::from_str(source)?;
        forest.validate()?;
        Ok(forest)
    }

    pub fn to_json_pretty(&self) -> Result<String, ForestError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn from_roots(roots: Vec<Arc<TreeNode>>) -> Self {
        Self { roots }
    }

    pub(crate) fn settled(self) -> Self {
        Self {
            roots: self.roots.into_iter().map(settle_shared).collect(),
        }
    }

    pub fn roots(&self) -> &[Arc<TreeNode>] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn find(&self, id: &NodeId) -> Option<&TreeNode> {
        locator::find(self, id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        locator::contains(self, id)
    }

    /// Count every node of the forest, at any depth.
    pub fn count_nodes(&self) -> usize {
        locator::count_nodes(self)
    }

    /// Check that every id appears once.
    pub fn validate(&self) -> Result<(), ForestError> {
        let mut seen = HashSet::new();
        for node in locator::walk(self) {
            if !seen.insert(node.id()) {
                return Err(ForestError::DuplicateId(node.id().clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_new_node_when_inspected_then_children_are_unloaded() {
        let node = TreeNode::new("1", "File");

        assert_eq!(node.load_state(), LoadState::Unloaded);
        assert!(node.children().is_none());
    }

    #[test]
    fn given_node_with_empty_children_when_inspected_then_it_is_loaded() {
        let node = TreeNode::with_children("1", "File", Vec::new());

        assert_eq!(node.load_state(), LoadState::Loaded);
        assert_eq!(node.children().map(<[_]>::len), Some(0));
    }

    #[test]
    fn given_loading_node_when_appending_then_child_is_refused() {
        let node = TreeNode::new("1", "File").marked_loading();

        let appended =
            node.with_appended_child(Arc::new(TreeNode::new("2", "Child")));

        assert!(appended.is_none());
    }

    #[test]
    fn given_nodes_when_serialized_then_absent_and_empty_children_differ() {
        let forest = Forest::from_nodes([
            TreeNode::new("1", "Lazy"),
            TreeNode::with_children("2", "Empty", Vec::new()),
        ]);

        let json = serde_json::to_value(&forest).expect("should serialize");

        assert_eq!(
            json,
            serde_json::json!([
                { "id": "1", "name": "Lazy" },
                { "id": "2", "name": "Empty", "children": [] }
            ])
        );
    }

    #[test]
    fn given_json_forest_when_parsed_then_loading_flag_is_ignored() {
        let forest = Forest::from_json(
            r#"[{ "id": "1", "name": "File", "isLoading": true }]"#,
        )
        .expect("should parse");

        let node = forest.find(&NodeId::from("1")).expect("node exists");
        assert_eq!(node.load_state(), LoadState::Unloaded);
    }

    #[test]
    fn given_loading_snapshot_when_serialized_then_flag_is_written() {
        let forest =
            Forest::from_nodes([TreeNode::new("1", "File").marked_loading()]);

        let json = serde_json::to_value(&forest).expect("should serialize");

        assert_eq!(
            json,
            serde_json::json!([{ "id": "1", "name": "File", "isLoading": true }])
        );
    }

    #[test]
    fn given_nested_loading_node_when_settled_then_siblings_stay_shared() {
        let quiet = Arc::new(TreeNode::new("3", "Quiet"));
        let forest = Forest::from_roots(vec![
            Arc::new(TreeNode::with_children(
                "1",
                "File",
                [TreeNode::new("2", "Busy").marked_loading()],
            )),
            Arc::clone(&quiet),
        ]);

        let settled = forest.settled();

        let busy = settled.find(&NodeId::from("2")).expect("node exists");
        assert_eq!(busy.load_state(), LoadState::Unloaded);
        assert!(Arc::ptr_eq(&settled.roots()[1], &quiet));
    }

    #[test]
    fn given_duplicate_ids_when_validated_then_error_names_the_id() {
        let result = Forest::try_from_nodes([TreeNode::with_children(
            "1",
            "File",
            [TreeNode::new("1", "Copy")],
        )]);

        assert!(matches!(
            result,
            Err(ForestError::DuplicateId(id)) if id.as_str() == "1"
        ));
    }

    #[test]
    fn given_malformed_json_when_parsed_then_json_error_is_returned() {
        let result = Forest::from_json("[{ \"id\": 1 }]");

        assert!(matches!(result, Err(ForestError::Json(_))));
    }
}
