use thiserror::Error;

use crate::model::NodeId;
use crate::reparent::MoveRejection;

/// Side effects requested by the store, executed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeEffect {
    /// Fetch the children of a node that just entered the loading state.
    LoadChildrenRequested { id: NodeId },
    /// A fetch failed; show the message somewhere outside the tree.
    LoadFailed { id: NodeId, message: String },
}

/// Why a command left the forest unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Skip {
    #[error("node `{0}` not found")]
    NotFound(NodeId),
    #[error("name must not be empty")]
    EmptyName,
    #[error("node already has this name")]
    SameName,
    #[error("parent `{0}` is still loading")]
    ParentLoading(NodeId),
    #[error("node id `{0}` is already in use")]
    DuplicateId(NodeId),
    #[error("could not draw an unused node id")]
    IdsExhausted,
    #[error("node `{0}` is not loading")]
    NotLoading(NodeId),
    #[error("move rejected: {0}")]
    Rejected(#[from] MoveRejection),
}

/// Whether a command changed the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Unchanged(Skip),
}

/// Result of applying one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    pub outcome: Outcome,
    pub effects: Vec<TreeEffect>,
}

impl Applied {
    pub(crate) fn changed() -> Self {
        Self {
            outcome: Outcome::Changed,
            effects: Vec::new(),
        }
    }

    pub(crate) fn skipped(reason: Skip) -> Self {
        Self {
            outcome: Outcome::Unchanged(reason),
            effects: Vec::new(),
        }
    }

    pub(crate) fn with_effect(mut self, effect: TreeEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn is_changed(&self) -> bool {
        self.outcome == Outcome::Changed
    }

    /// Return the skip reason for an unchanged outcome.
    pub fn skip(&self) -> Option<&Skip> {
        match &self.outcome {
            Outcome::Changed => None,
            Outcome::Unchanged(reason) => Some(reason),
        }
    }
}
