//! Hierarchical Store Access
//!
//! Read-only access to the key-value store the snapshots are taken from. The
//! [`KeyStore`] trait is the seam between the extraction pipeline and the
//! wire protocol; [`EtcdClient`] speaks the etcd v2 keys API over HTTP and
//! [`RootFetcher`] bounds every root read with a fixed deadline.

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

pub mod etcd;
pub mod fetcher;
pub mod node;

pub use etcd::EtcdClient;
pub use fetcher::RootFetcher;
pub use node::RemoteNode;

/// Store endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:2379";

/// Per-request deadline for a root read.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Options for a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    pub recursive: bool,
    pub deadline: Duration,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            deadline: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// Store client trait
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Read `key`, and its whole subtree when `options.recursive` is set.
    async fn get(&self, key: &str, options: GetOptions) -> Result<RemoteNode, StoreError>;

    /// Endpoint description for diagnostics.
    fn endpoint(&self) -> &str;
}

// In-memory store for testing
#[cfg(test)]
pub struct MockStore {
    nodes: std::collections::HashMap<String, RemoteNode>,
    delays: std::collections::HashMap<String, Duration>,
    calls: std::sync::Arc<parking_lot::Mutex<Vec<String>>>,
}

#[cfg(test)]
impl MockStore {
    pub fn new() -> Self {
        Self {
            nodes: std::collections::HashMap::new(),
            delays: std::collections::HashMap::new(),
            calls: std::sync::Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_root(mut self, node: RemoteNode) -> Self {
        self.nodes.insert(node.path.clone(), node);
        self
    }

    pub fn with_delay(mut self, key: &str, delay: Duration) -> Self {
        self.delays.insert(key.to_string(), delay);
        self
    }

    pub fn calls(&self) -> std::sync::Arc<parking_lot::Mutex<Vec<String>>> {
        self.calls.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl KeyStore for MockStore {
    async fn get(&self, key: &str, _options: GetOptions) -> Result<RemoteNode, StoreError> {
        self.calls.lock().push(key.to_string());
        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }
        self.nodes.get(key).cloned().ok_or_else(|| StoreError::Api {
            code: 100,
            message: "Key not found".to_string(),
            cause: key.to_string(),
        })
    }

    fn endpoint(&self) -> &str {
        "mock://"
    }
}
