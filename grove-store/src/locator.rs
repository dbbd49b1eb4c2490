//! Depth-first lookups over a forest.

use std::sync::Arc;

use crate::model::{Forest, NodeId, TreeNode};

/// Pre-order iterator: a node is yielded before its children, children in
/// order.
pub struct Walk<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Walk<'a> {
    fn over(nodes: &'a [Arc<TreeNode>]) -> Self {
        Self {
            stack: nodes.iter().rev().map(Arc::as_ref).collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        if let Some(children) = node.children() {
            self.stack.extend(children.iter().rev().map(Arc::as_ref));
        }
        Some(node)
    }
}

/// Walk every node of the forest in pre-order.
pub fn walk(forest: &Forest) -> Walk<'_> {
    Walk::over(forest.roots())
}

/// Walk a subtree, including `node` itself.
pub fn walk_subtree(node: &TreeNode) -> Walk<'_> {
    Walk { stack: vec![node] }
}

pub fn find<'a>(forest: &'a Forest, id: &NodeId) -> Option<&'a TreeNode> {
    walk(forest).find(|node| node.id() == id)
}

pub fn contains(forest: &Forest, id: &NodeId) -> bool {
    find(forest, id).is_some()
}

pub fn count_nodes(forest: &Forest) -> usize {
    walk(forest).count()
}

/// Return whether `candidate_id` lies strictly inside the subtree rooted at
/// `ancestor_id`.
///
/// A node is not its own descendant. Missing ids yield `false`.
pub fn is_descendant(
    forest: &Forest,
    ancestor_id: &NodeId,
    candidate_id: &NodeId,
) -> bool {
    let Some(children) = find(forest, ancestor_id).and_then(TreeNode::children)
    else {
        return false;
    };

    Walk::over(children).any(|node| node.id() == candidate_id)
}

/// Sibling indices leading from the roots to `id`.
pub(crate) fn index_path(
    nodes: &[Arc<TreeNode>],
    id: &NodeId,
) -> Option<Vec<usize>> {
    for (index, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(vec![index]);
        }

        let Some(children) = node.children() else {
            continue;
        };
        if let Some(mut rest) = index_path(children, id) {
            rest.insert(0, index);
            return Some(rest);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forest {
        Forest::from_nodes([
            TreeNode::with_children(
                "a",
                "A",
                [
                    TreeNode::with_children("b", "B", [TreeNode::new("c", "C")]),
                    TreeNode::new("d", "D"),
                ],
            ),
            TreeNode::new("e", "E"),
        ])
    }

    fn ids(forest: &Forest) -> Vec<&str> {
        walk(forest).map(|node| node.id().as_str()).collect()
    }

    #[test]
    fn given_nested_forest_when_walked_then_order_is_pre_order() {
        assert_eq!(ids(&sample()), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn given_nested_id_when_found_then_node_is_returned() {
        let forest = sample();

        let node = find(&forest, &NodeId::from("c")).expect("c exists");

        assert_eq!(node.name(), "C");
    }

    #[test]
    fn given_missing_id_when_found_then_none_is_returned() {
        assert!(find(&sample(), &NodeId::from("zz")).is_none());
    }

    #[test]
    fn given_grandchild_when_checking_descendant_then_true() {
        let forest = sample();

        assert!(is_descendant(&forest, &"a".into(), &"c".into()));
        assert!(is_descendant(&forest, &"b".into(), &"c".into()));
    }

    #[test]
    fn given_same_or_unrelated_ids_when_checking_descendant_then_false() {
        let forest = sample();

        assert!(!is_descendant(&forest, &"a".into(), &"a".into()));
        assert!(!is_descendant(&forest, &"c".into(), &"a".into()));
        assert!(!is_descendant(&forest, &"e".into(), &"c".into()));
        assert!(!is_descendant(&forest, &"d".into(), &"b".into()));
    }

    #[test]
    fn given_missing_ancestor_when_checking_descendant_then_false() {
        assert!(!is_descendant(&sample(), &"zz".into(), &"c".into()));
    }

    #[test]
    fn given_forest_when_counted_then_nested_nodes_are_included() {
        assert_eq!(count_nodes(&sample()), 5);
        assert_eq!(count_nodes(&Forest::new()), 0);
    }

    #[test]
    fn given_nested_id_when_indexing_then_sibling_path_is_returned() {
        let forest = sample();

        assert_eq!(
            index_path(forest.roots(), &"c".into()),
            Some(vec![0, 0, 0])
        );
        assert_eq!(index_path(forest.roots(), &"d".into()), Some(vec![0, 1]));
        assert_eq!(index_path(forest.roots(), &"e".into()), Some(vec![1]));
        assert_eq!(index_path(forest.roots(), &"zz".into()), None);
    }
}
