//! Deadline-bounded root reads.

use super::{GetOptions, KeyStore, RemoteNode, DEFAULT_REQUEST_TIMEOUT};
use crate::error::StoreError;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Reads one root subtree per call, never waiting longer than `deadline`.
pub struct RootFetcher {
    store: Arc<dyn KeyStore>,
    deadline: Duration,
}

impl RootFetcher {
    pub fn new(store: Arc<dyn KeyStore>) -> Self {
        Self::with_deadline(store, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_deadline(store: Arc<dyn KeyStore>, deadline: Duration) -> Self {
        Self { store, deadline }
    }

    pub fn endpoint(&self) -> &str {
        self.store.endpoint()
    }

    /// Recursively read `root`. No retry; a failure is reported to the caller.
    pub async fn fetch(&self, root: &str) -> Result<RemoteNode, StoreError> {
        let options = GetOptions {
            recursive: true,
            deadline: self.deadline,
        };
        let node = tokio::time::timeout(self.deadline, self.store.get(root, options))
            .await
            .map_err(|_| StoreError::Timeout(self.deadline))??;

        debug!(root, leaves = node.leaf_count(), "Fetched root");
        Ok(node)
    }
}
