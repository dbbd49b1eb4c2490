use thiserror::Error;

use crate::edit::{try_add_child, try_detach};
use crate::locator::{find, is_descendant};
use crate::model::{Forest, LoadState, NodeId};

/// Reasons a drag-and-drop move leaves the forest unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejection {
    #[error("node dropped onto itself")]
    SelfDrop,
    #[error("cannot move a node into its own subtree")]
    IntoDescendant,
    #[error("dragged node does not exist")]
    SourceNotFound,
    #[error("drop target does not exist")]
    TargetNotFound,
    #[error("drop target is still loading its children")]
    TargetLoading,
}

/// Move the subtree rooted at `dragged_id` to the end of `target_id`'s
/// children. Rejected moves return the input forest.
pub fn move_node(
    forest: &Forest,
    dragged_id: &NodeId,
    target_id: &NodeId,
) -> Forest {
    try_move_node(forest, dragged_id, target_id)
        .unwrap_or_else(|_| forest.clone())
}

/// Move `dragged_id` under `target_id`, reporting why a move was refused.
///
/// All checks run against `forest` before anything is detached, so a
/// rejected move can never drop the dragged subtree.
pub fn try_move_node(
    forest: &Forest,
    dragged_id: &NodeId,
    target_id: &NodeId,
) -> Result<Forest, MoveRejection> {
    if dragged_id == target_id {
        return Err(MoveRejection::SelfDrop);
    }
    if is_descendant(forest, dragged_id, target_id) {
        return Err(MoveRejection::IntoDescendant);
    }

    let target = find(forest, target_id).ok_or(MoveRejection::TargetNotFound)?;
    if target.load_state() == LoadState::Loading {
        return Err(MoveRejection::TargetLoading);
    }

    let (detached, moved) =
        try_detach(forest, dragged_id).ok_or(MoveRejection::SourceNotFound)?;

    // The target survives the detach: it is neither the dragged node nor
    // inside its subtree.
    try_add_child(&detached, target_id, moved)
        .ok_or(MoveRejection::TargetNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::begin_load;
    use crate::locator::{count_nodes, walk};
    use crate::model::TreeNode;

    fn sample() -> Forest {
        Forest::from_nodes([TreeNode::with_children(
            "1",
            "File",
            [TreeNode::new("2", "Sub File")],
        )])
    }

    fn wide() -> Forest {
        Forest::from_nodes([
            TreeNode::with_children(
                "a",
                "A",
                [
                    TreeNode::with_children("b", "B", [TreeNode::new("c", "C")]),
                    TreeNode::new("d", "D"),
                ],
            ),
            TreeNode::with_children("e", "E", [TreeNode::new("f", "F")]),
        ])
    }

    fn child_ids(forest: &Forest, id: &str) -> Vec<String> {
        forest
            .find(&NodeId::from(id))
            .and_then(TreeNode::children)
            .unwrap_or_default()
            .iter()
            .map(|child| child.id().to_string())
            .collect()
    }

    #[test]
    fn given_sibling_subtree_when_moved_then_it_becomes_last_child() {
        let forest = move_node(&wide(), &"b".into(), &"e".into());

        assert_eq!(child_ids(&forest, "a"), vec!["d"]);
        assert_eq!(child_ids(&forest, "e"), vec!["f", "b"]);
        assert_eq!(child_ids(&forest, "b"), vec!["c"]);
    }

    #[test]
    fn given_accepted_move_when_applied_then_node_count_is_preserved() {
        let original = wide();

        let forest = move_node(&original, &"e".into(), &"c".into());

        assert_eq!(count_nodes(&forest), count_nodes(&original));
        assert_eq!(child_ids(&forest, "c"), vec!["e"]);
        assert_eq!(forest.roots().len(), 1);
    }

    #[test]
    fn given_descendant_target_when_moved_then_move_is_rejected() {
        let original = wide();

        let result = try_move_node(&original, &"a".into(), &"c".into());

        assert_eq!(result, Err(MoveRejection::IntoDescendant));
        assert_eq!(move_node(&original, &"a".into(), &"c".into()), original);
    }

    #[test]
    fn given_self_drop_when_moved_then_move_is_rejected() {
        let result = try_move_node(&wide(), &"b".into(), &"b".into());

        assert_eq!(result, Err(MoveRejection::SelfDrop));
    }

    #[test]
    fn given_missing_ids_when_moved_then_forest_is_unchanged() {
        let original = wide();

        assert_eq!(
            try_move_node(&original, &"zz".into(), &"a".into()),
            Err(MoveRejection::SourceNotFound)
        );
        assert_eq!(
            try_move_node(&original, &"b".into(), &"zz".into()),
            Err(MoveRejection::TargetNotFound)
        );
        assert_eq!(move_node(&original, &"b".into(), &"zz".into()), original);
    }

    #[test]
    fn given_loading_target_when_moved_then_move_is_rejected() {
        let original = begin_load(&wide(), &"d".into());

        let result = try_move_node(&original, &"e".into(), &"d".into());

        assert_eq!(result, Err(MoveRejection::TargetLoading));
    }

    #[test]
    fn given_child_dropped_on_own_parent_when_moved_then_it_is_reappended() {
        let forest = move_node(&wide(), &"b".into(), &"a".into());

        assert_eq!(child_ids(&forest, "a"), vec!["d", "b"]);
    }

    #[test]
    fn given_single_child_dropped_on_parent_when_moved_then_shape_is_kept() {
        let original = sample();

        let forest = move_node(&original, &"2".into(), &"1".into());

        assert_eq!(forest, original);
    }

    #[test]
    fn given_root_dropped_into_other_root_when_moved_then_it_nests() {
        let forest = move_node(&wide(), &"a".into(), &"f".into());

        let order: Vec<&str> =
            walk(&forest).map(|node| node.id().as_str()).collect();
        assert_eq!(order, vec!["e", "f", "a", "b", "c", "d"]);
    }

    #[test]
    fn given_unloaded_target_when_moved_then_target_becomes_loaded() {
        let forest = move_node(&wide(), &"c".into(), &"d".into());

        let target = forest.find(&"d".into()).expect("target exists");
        assert_eq!(target.load_state(), LoadState::Loaded);
        assert_eq!(child_ids(&forest, "d"), vec!["c"]);
        assert!(child_ids(&forest, "b").is_empty());
    }
}
