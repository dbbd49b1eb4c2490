//! Fire-and-forget children fetches.
//!
//! Each load request runs the fetcher on the current tokio runtime. When it
//! finishes, the result is queued as a [`TreeCommand`] for the single owner
//! of the store, which applies it against the snapshot current at that
//! moment. There is no cancellation: a result for a node that is gone is
//! simply skipped by the store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use flume::{Receiver, Sender, TryRecvError};

use crate::command::TreeCommand;
use crate::errors::FetchError;
use crate::event::{Applied, TreeEffect};
use crate::fetch::ChildrenFetcher;
use crate::model::{NodeId, TreeNode};
use crate::options::StoreOptions;
use crate::store::TreeStore;

/// Runs children fetches and queues their results.
pub struct Loader<F> {
    fetcher: Arc<F>,
    timeout: Option<Duration>,
    sender: Sender<TreeCommand>,
    receiver: Receiver<TreeCommand>,
    pending: Arc<AtomicUsize>,
}

/// Decrements the in-flight counter when a fetch task ends, however it ends.
struct InFlight(Arc<AtomicUsize>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<F: ChildrenFetcher> Loader<F> {
    pub fn new(fetcher: F, options: &StoreOptions) -> Self {
        let (sender, receiver) = flume::unbounded();
        Self {
            fetcher: Arc::new(fetcher),
            timeout: options.fetch_timeout(),
            sender,
            receiver,
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Start a fetch for every load request among `effects`.
    pub fn dispatch(&self, effects: &[TreeEffect]) {
        for effect in effects {
            if let TreeEffect::LoadChildrenRequested { id } = effect {
                self.spawn(id.clone());
            }
        }
    }

    /// Fetch the children of `id` in the background.
    ///
    /// Without a tokio runtime the request fails immediately, so the node
    /// never stays loading.
    pub fn spawn(&self, id: NodeId) {
        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                log::error!("cannot fetch children of `{id}`: {err}");
                self.deliver(completion(id, Err(FetchError::NoRuntime)));
                return;
            },
        };

        self.pending.fetch_add(1, Ordering::AcqRel);
        let in_flight = InFlight(Arc::clone(&self.pending));
        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.sender.clone();
        let timeout = self.timeout;

        log::debug!("fetching children of `{id}`");
        handle.spawn(async move {
            let _in_flight = in_flight;
            let fetch = tokio::spawn(fetch_children(fetcher, id.clone(), timeout));
            let result = match fetch.await {
                Ok(result) => result,
                Err(err) => Err(FetchError::Unavailable {
                    message: format!("fetch task failed: {err}"),
                }),
            };
            if sender.send(completion(id, result)).is_err() {
                log::debug!("loader dropped before fetch completed");
            }
        });
    }

    /// Number of fetches that have not delivered their result yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Wait for the next queued result.
    ///
    /// Waits forever when nothing is pending; see [`Loader::settle`].
    pub async fn next(&self) -> Option<TreeCommand> {
        self.receiver.recv_async().await.ok()
    }

    /// Take a queued result without waiting.
    pub fn try_next(&self) -> Option<TreeCommand> {
        self.receiver.try_recv().ok()
    }

    /// Apply queued results to `store` until no fetch is outstanding.
    ///
    /// Loads requested while settling are dispatched and awaited too.
    pub async fn settle(&self, store: &mut TreeStore) -> Vec<Applied> {
        let mut applied = Vec::new();
        loop {
            // Tasks decrement after sending, so an idle loader with an
            // empty queue has nothing left to deliver.
            let idle = self.pending() == 0;
            let command = match self.receiver.try_recv() {
                Ok(command) => command,
                Err(TryRecvError::Empty) if idle => break,
                Err(TryRecvError::Empty) => {
                    match self.receiver.recv_async().await {
                        Ok(command) => command,
                        Err(_) => break,
                    }
                },
                Err(TryRecvError::Disconnected) => break,
            };

            let result = store.apply(command);
            self.dispatch(&result.effects);
            applied.push(result);
        }
        applied
    }

    fn deliver(&self, command: TreeCommand) {
        if self.sender.send(command).is_err() {
            log::debug!("loader queue closed");
        }
    }
}

async fn fetch_children<F: ChildrenFetcher>(
    fetcher: Arc<F>,
    id: NodeId,
    timeout: Option<Duration>,
) -> Result<Vec<TreeNode>, FetchError> {
    let request = fetcher.request_children(id);
    match timeout {
        Some(after) => tokio::time::timeout(after, request)
            .await
            .unwrap_or(Err(FetchError::TimedOut { after })),
        None => request.await,
    }
}

fn completion(
    id: NodeId,
    result: Result<Vec<TreeNode>, FetchError>,
) -> TreeCommand {
    match result {
        Ok(children) => TreeCommand::ChildrenLoaded { id, children },
        Err(err) => TreeCommand::LoadFailed {
            id,
            message: err.to_string(),
        },
    }
}
