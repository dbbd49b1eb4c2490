use std::future::Future;

use crate::errors::FetchError;
use crate::model::{NodeId, TreeNode};

/// Asynchronous source of lazily loaded children.
///
/// Called once per node entering the loading state. Returned nodes must
/// carry ids that are unused in the forest; clashing subtrees are dropped
/// when the result is applied.
pub trait ChildrenFetcher: Send + Sync + 'static {
    fn request_children(
        &self,
        id: NodeId,
    ) -> impl Future<Output = Result<Vec<TreeNode>, FetchError>> + Send;
}

