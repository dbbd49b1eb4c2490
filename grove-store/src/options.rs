use std::time::Duration;

use serde::Deserialize;

/// What a failed children fetch does to the loading node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Resolve with no children; the node stays loaded.
    #[default]
    ResolveEmpty,
    /// Return to unloaded and collapse, so the next expand fetches again.
    RevertToUnloaded,
}

/// Configuration knobs for a [`crate::TreeStore`] and its loader.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub fetch_failure: FetchFailurePolicy,
    /// Upper bound for a single fetch, in milliseconds.
    pub fetch_timeout_ms: Option<u64>,
    /// Expand the parent after a child was added.
    pub expand_on_insert: bool,
    /// Expand the drop target after a successful move.
    pub expand_on_drop: bool,
    /// How many ids to draw before giving up on a collision streak.
    pub id_attempts: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            fetch_failure: FetchFailurePolicy::default(),
            fetch_timeout_ms: None,
            expand_on_insert: true,
            expand_on_drop: true,
            id_attempts: 8,
        }
    }
}

impl StoreOptions {
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }
}
