use uuid::Uuid;

use crate::model::{Forest, NodeId};

/// Source of fresh node ids.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> NodeId;
}

/// Random v4 UUID ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> NodeId {
        NodeId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix><n>` ids, counting up from 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId::new(format!("{}{}", self.prefix, self.next));
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Draw ids until one is unused in `forest`, giving up after `attempts`.
pub(crate) fn fresh_id(
    forest: &Forest,
    ids: &mut dyn IdGenerator,
    attempts: usize,
) -> Option<NodeId> {
    (0..attempts.max(1))
        .map(|_| ids.next_id())
        .find(|id| !forest.contains(id))
}
