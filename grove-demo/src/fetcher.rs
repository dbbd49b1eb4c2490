use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use grove_store::{ChildrenFetcher, FetchError, NodeId, TreeNode};

/// Pretends to query a slow backend for the children of a node.
pub struct SlowFetcher {
    latency: Duration,
    next: AtomicU64,
}

impl SlowFetcher {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            next: AtomicU64::new(1),
        }
    }

    fn fresh_id(&self) -> String {
        format!("lazy-{}", self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl ChildrenFetcher for SlowFetcher {
    async fn request_children(
        &self,
        id: NodeId,
    ) -> Result<Vec<TreeNode>, FetchError> {
        log::info!("fetching children of `{id}`");
        tokio::time::sleep(self.latency).await;
        Ok(vec![
            TreeNode::new(self.fresh_id(), "Lazy Child 1"),
            TreeNode::new(self.fresh_id(), "Lazy Child 2"),
        ])
    }
}
