//! Hierarchical node store with lazy children and safe reparenting.
//!
//! The crate keeps a forest of named nodes and applies edits to it as
//! immutable snapshots. Unchanged subtrees are shared between snapshots.
//!
//! The building blocks are:
//! - [`locator`] functions for finding nodes and checking ancestry,
//! - [`edit`] functions for adding, renaming, deleting and detaching,
//! - [`load`] functions driving the `Unloaded -> Loading -> Loaded` cycle,
//! - [`move_node`] / [`try_move_node`] for cycle-free reparenting.
//!
//! Most callers use [`TreeStore`] instead: it owns the current snapshot and
//! the expansion state, applies one [`TreeCommand`] at a time, and reports
//! an [`Applied`] outcome with any [`TreeEffect`]s to run. A [`Loader`]
//! runs the requested fetches on tokio and feeds their results back as
//! commands.
//!
//! A typical session:
//! 1. Build a [`Forest`] and wrap it in a [`TreeStore`].
//! 2. Apply commands, passing returned effects to [`Loader::dispatch`].
//! 3. Drain fetch results with [`Loader::settle`] or [`Loader::next`].
//! 4. Draw [`TreeStore::rows`].

pub mod edit;
pub mod load;
pub mod locator;

mod command;
mod errors;
mod event;
mod fetch;
mod ids;
mod loader;
mod model;
mod options;
mod reducer;
mod reparent;
mod rows;
mod state;
mod store;

pub use command::TreeCommand;
pub use errors::{FetchError, ForestError};
pub use event::{Applied, Outcome, Skip, TreeEffect};
pub use fetch::ChildrenFetcher;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use loader::Loader;
pub use model::{Forest, LoadState, NodeId, TreeNode};
pub use options::{FetchFailurePolicy, StoreOptions};
pub use reparent::{MoveRejection, move_node, try_move_node};
pub use rows::{VisibleRow, visible_rows};
pub use store::TreeStore;
