use std::collections::HashSet;

use crate::command::TreeCommand;
use crate::errors::ForestError;
use crate::event::Applied;
use crate::ids::{IdGenerator, UuidIds};
use crate::model::{Forest, NodeId};
use crate::options::StoreOptions;
use crate::reducer::{TreeCtx, reduce};
use crate::rows::{VisibleRow, visible_rows};
use crate::state::TreeState;

/// Single owner of the current forest snapshot.
///
/// Every change goes through [`TreeStore::apply`], one command at a time.
/// Fetch results are applied later as commands against whatever snapshot
/// is current when they arrive.
pub struct TreeStore {
    state: TreeState,
    options: StoreOptions,
    ids: Box<dyn IdGenerator>,
}

impl TreeStore {
    /// Create a store with default options and random UUID ids.
    pub fn new(forest: Forest) -> Self {
        Self {
            state: TreeState::new(forest),
            options: StoreOptions::default(),
            ids: Box::new(UuidIds),
        }
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_id_generator(
        mut self,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        self.ids = Box::new(ids);
        self
    }

    // --- Read access ---

    /// Return the current snapshot.
    pub fn forest(&self) -> &Forest {
        self.state.forest()
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.state.is_expanded(id)
    }

    pub fn expanded(&self) -> &HashSet<NodeId> {
        self.state.expanded()
    }

    /// Return the rows a presentation layer should draw.
    pub fn rows(&self) -> Vec<VisibleRow<'_>> {
        visible_rows(self.state.forest(), self.state.expanded())
    }

    // --- Write access ---

    /// Replace the snapshot wholesale.
    ///
    /// Loading flags in `forest` are cleared, since no fetch of this store
    /// is running for them, and expansion is kept only for nodes still
    /// present and not unloaded. Id uniqueness is trusted; use
    /// [`TreeStore::try_set_forest`] for data coming from outside.
    pub fn set_forest(&mut self, forest: Forest) {
        self.state.replace_forest(forest.settled());
    }

    /// Validate `forest` and replace the snapshot with it.
    ///
    /// On error the current snapshot is kept.
    pub fn try_set_forest(
        &mut self,
        forest: Forest,
    ) -> Result<(), ForestError> {
        forest.validate()?;
        self.set_forest(forest);
        Ok(())
    }

    /// Apply one command and report what happened.
    pub fn apply(&mut self, command: TreeCommand) -> Applied {
        let mut ctx = TreeCtx {
            options: &self.options,
            ids: self.ids.as_mut(),
        };
        reduce(&mut self.state, command, &mut ctx)
    }

    /// Append a child with a fresh id. The name is trimmed; blank names are
    /// refused with [`crate::Skip::EmptyName`].
    pub fn add_child(&mut self, parent: &NodeId, name: &str) -> Applied {
        self.apply(TreeCommand::AddChild {
            parent: parent.clone(),
            name: name.to_owned(),
        })
    }

    /// Rename a node. As with [`TreeStore::add_child`], the name is trimmed
    /// and blank names are refused.
    pub fn rename(&mut self, id: &NodeId, name: &str) -> Applied {
        self.apply(TreeCommand::Rename {
            id: id.clone(),
            name: name.to_owned(),
        })
    }

    pub fn delete(&mut self, id: &NodeId) -> Applied {
        self.apply(TreeCommand::Delete { id: id.clone() })
    }

    pub fn move_node(&mut self, dragged: &NodeId, target: &NodeId) -> Applied {
        self.apply(TreeCommand::Move {
            dragged: dragged.clone(),
            target: target.clone(),
        })
    }

    pub fn toggle(&mut self, id: &NodeId) -> Applied {
        self.apply(TreeCommand::Toggle { id: id.clone() })
    }
}

impl Default for TreeStore {
    fn default() -> Self {
        Self::new(Forest::new())
    }
}
