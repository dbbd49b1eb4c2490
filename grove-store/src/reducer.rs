use std::collections::HashSet;

use crate::command::TreeCommand;
use crate::edit::{try_add_child, try_detach, try_rename};
use crate::event::{Applied, Skip, TreeEffect};
use crate::ids::{IdGenerator, fresh_id};
use crate::load::{try_begin_load, try_resolve_load, try_revert_load};
use crate::locator::{walk, walk_subtree};
use crate::model::{LoadState, NodeId, TreeNode};
use crate::options::{FetchFailurePolicy, StoreOptions};
use crate::reparent::try_move_node;
use crate::state::TreeState;

/// Runtime context for the tree reducer.
pub(crate) struct TreeCtx<'a> {
    pub(crate) options: &'a StoreOptions,
    pub(crate) ids: &'a mut dyn IdGenerator,
}

/// Reduce a tree command into a new snapshot and effects.
pub(crate) fn reduce(
    state: &mut TreeState,
    command: TreeCommand,
    ctx: &mut TreeCtx<'_>,
) -> Applied {
    let applied = match command {
        TreeCommand::AddChild { parent, name } => {
            reduce_add_child(state, parent, &name, ctx)
        },
        TreeCommand::InsertChild { parent, node } => {
            reduce_insert_child(state, parent, node, ctx.options)
        },
        TreeCommand::Rename { id, name } => reduce_rename(state, id, &name),
        TreeCommand::Delete { id } => reduce_delete(state, id),
        TreeCommand::Move { dragged, target } => {
            reduce_move(state, &dragged, target, ctx.options)
        },
        TreeCommand::Toggle { id } => reduce_toggle(state, id),
        TreeCommand::ChildrenLoaded { id, children } => {
            reduce_children_loaded(state, id, children)
        },
        TreeCommand::LoadFailed { id, message } => {
            reduce_load_failed(state, id, message, ctx.options)
        },
    };

    if let Some(reason) = applied.skip() {
        log::debug!("tree command skipped: {reason}");
    }
    applied
}

fn normalize_name(raw: &str) -> Result<String, Skip> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Skip::EmptyName);
    }
    Ok(trimmed.to_owned())
}

fn parent_accepts_children(
    state: &TreeState,
    parent: &NodeId,
) -> Result<(), Skip> {
    let node = state
        .forest()
        .find(parent)
        .ok_or_else(|| Skip::NotFound(parent.clone()))?;
    if node.load_state() == LoadState::Loading {
        return Err(Skip::ParentLoading(parent.clone()));
    }
    Ok(())
}

fn reduce_add_child(
    state: &mut TreeState,
    parent: NodeId,
    name: &str,
    ctx: &mut TreeCtx<'_>,
) -> Applied {
    let name = match normalize_name(name) {
        Ok(name) => name,
        Err(reason) => return Applied::skipped(reason),
    };
    if let Err(reason) = parent_accepts_children(state, &parent) {
        return Applied::skipped(reason);
    }
    let Some(id) = fresh_id(state.forest(), ctx.ids, ctx.options.id_attempts)
    else {
        log::warn!("tree add failed: no unused id after retries");
        return Applied::skipped(Skip::IdsExhausted);
    };

    insert_under(state, parent, TreeNode::new(id, name), ctx.options)
}

fn reduce_insert_child(
    state: &mut TreeState,
    parent: NodeId,
    node: TreeNode,
    options: &StoreOptions,
) -> Applied {
    if let Err(reason) = parent_accepts_children(state, &parent) {
        return Applied::skipped(reason);
    }
    let node = node.settled();
    if let Some(clash) = first_clashing_id(state, &node) {
        return Applied::skipped(Skip::DuplicateId(clash));
    }

    insert_under(state, parent, node, options)
}

fn first_clashing_id(state: &TreeState, node: &TreeNode) -> Option<NodeId> {
    let mut seen = HashSet::new();
    walk_subtree(node)
        .map(TreeNode::id)
        .find(|id| !seen.insert(*id) || state.forest().contains(id))
        .cloned()
}

fn insert_under(
    state: &mut TreeState,
    parent: NodeId,
    node: TreeNode,
    options: &StoreOptions,
) -> Applied {
    let Some(forest) = try_add_child(state.forest(), &parent, node) else {
        return Applied::skipped(Skip::NotFound(parent));
    };

    state.set_forest(forest);
    if options.expand_on_insert {
        state.expand(parent);
    }
    Applied::changed()
}

fn reduce_rename(state: &mut TreeState, id: NodeId, name: &str) -> Applied {
    let name = match normalize_name(name) {
        Ok(name) => name,
        Err(reason) => return Applied::skipped(reason),
    };
    if !state.forest().contains(&id) {
        return Applied::skipped(Skip::NotFound(id));
    }
    let Some(forest) = try_rename(state.forest(), &id, &name) else {
        return Applied::skipped(Skip::SameName);
    };

    state.set_forest(forest);
    Applied::changed()
}

fn reduce_delete(state: &mut TreeState, id: NodeId) -> Applied {
    let Some((forest, removed)) = try_detach(state.forest(), &id) else {
        return Applied::skipped(Skip::NotFound(id));
    };

    state.set_forest(forest);
    state.forget_subtree(&removed);
    Applied::changed()
}

fn reduce_move(
    state: &mut TreeState,
    dragged: &NodeId,
    target: NodeId,
    options: &StoreOptions,
) -> Applied {
    match try_move_node(state.forest(), dragged, &target) {
        Ok(forest) => {
            state.set_forest(forest);
            if options.expand_on_drop {
                state.expand(target);
            }
            Applied::changed()
        },
        Err(rejection) => {
            log::warn!(
                "tree move of `{dragged}` onto `{target}` failed: {rejection}"
            );
            Applied::skipped(Skip::Rejected(rejection))
        },
    }
}

/// Expand or collapse a node; expanding an unloaded node starts its load.
fn reduce_toggle(state: &mut TreeState, id: NodeId) -> Applied {
    if state.collapse(&id) {
        return Applied::changed();
    }
    let Some(node) = state.forest().find(&id) else {
        return Applied::skipped(Skip::NotFound(id));
    };
    if node.load_state() != LoadState::Unloaded {
        state.expand(id);
        return Applied::changed();
    }

    let Some(forest) = try_begin_load(state.forest(), &id) else {
        return Applied::skipped(Skip::NotFound(id));
    };
    state.set_forest(forest);
    state.expand(id.clone());
    Applied::changed().with_effect(TreeEffect::LoadChildrenRequested { id })
}

fn reduce_children_loaded(
    state: &mut TreeState,
    id: NodeId,
    children: Vec<TreeNode>,
) -> Applied {
    let Some(node) = state.forest().find(&id) else {
        log::debug!("dropping children fetched for removed node `{id}`");
        return Applied::skipped(Skip::NotFound(id));
    };
    if node.load_state() != LoadState::Loading {
        return Applied::skipped(Skip::NotLoading(id));
    }

    let children = children.into_iter().map(TreeNode::settled).collect();
    let children = unique_children(state, &id, children);
    let Some(forest) = try_resolve_load(state.forest(), &id, children) else {
        return Applied::skipped(Skip::NotLoading(id));
    };
    state.set_forest(forest);
    Applied::changed()
}

/// Drop fetched subtrees whose ids clash with the forest or each other.
fn unique_children(
    state: &TreeState,
    parent: &NodeId,
    children: Vec<TreeNode>,
) -> Vec<TreeNode> {
    let mut taken: HashSet<NodeId> =
        walk(state.forest()).map(|node| node.id().clone()).collect();

    children
        .into_iter()
        .filter(|child| {
            let ids: Vec<&NodeId> =
                walk_subtree(child).map(TreeNode::id).collect();
            let unique: HashSet<&NodeId> = ids.iter().copied().collect();
            if unique.len() != ids.len()
                || ids.iter().any(|id| taken.contains(*id))
            {
                log::warn!(
                    "dropping fetched child `{}` of `{parent}`: duplicate id",
                    child.id()
                );
                return false;
            }
            taken.extend(ids.into_iter().cloned());
            true
        })
        .collect()
}

fn reduce_load_failed(
    state: &mut TreeState,
    id: NodeId,
    message: String,
    options: &StoreOptions,
) -> Applied {
    log::warn!("tree load of `{id}` failed: {message}");
    let effect = TreeEffect::LoadFailed {
        id: id.clone(),
        message,
    };

    let next = match options.fetch_failure {
        FetchFailurePolicy::ResolveEmpty => {
            try_resolve_load(state.forest(), &id, Vec::new())
        },
        FetchFailurePolicy::RevertToUnloaded => {
            try_revert_load(state.forest(), &id)
        },
    };
    let Some(forest) = next else {
        let reason = if state.forest().contains(&id) {
            Skip::NotLoading(id)
        } else {
            Skip::NotFound(id)
        };
        return Applied::skipped(reason).with_effect(effect);
    };

    state.set_forest(forest);
    if options.fetch_failure == FetchFailurePolicy::RevertToUnloaded {
        state.collapse(&id);
    }
    Applied::changed().with_effect(effect)
}
