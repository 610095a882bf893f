//! etcd v2 keys API client.

use super::{GetOptions, KeyStore, RemoteNode};
use crate::error::StoreError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const STORE_HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Successful read response.
#[derive(Deserialize)]
struct GetResponse {
    #[allow(dead_code)]
    action: Option<String>,
    node: RemoteNode,
}

/// Error body returned with non-2xx responses.
#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(rename = "errorCode")]
    error_code: u32,
    message: String,
    #[serde(default)]
    cause: String,
}

/// HTTP client for one etcd endpoint, reused across cycles.
pub struct EtcdClient {
    client: Client,
    base: Url,
    endpoint: String,
}

impl EtcdClient {
    /// Build a client for `endpoint` with `request_timeout` as the overall
    /// per-request limit.
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, StoreError> {
        let base = Url::parse(endpoint)
            .map_err(|e| StoreError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(StoreError::InvalidEndpoint(format!(
                "{}: scheme must be http or https",
                endpoint
            )));
        }

        let client = Client::builder()
            .connect_timeout(STORE_HTTP_CONNECT_TIMEOUT.min(request_timeout))
            .timeout(request_timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            endpoint: endpoint.to_string(),
        })
    }

    /// URL of the keys resource for `key`. Keys without a leading slash are
    /// treated as absolute.
    pub fn keys_url(&self, key: &str, recursive: bool) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("/v2/keys/{}", key.trim_start_matches('/')));
        if recursive {
            url.query_pairs_mut().append_pair("recursive", "true");
        }
        url
    }
}

#[async_trait]
impl KeyStore for EtcdClient {
    async fn get(&self, key: &str, options: GetOptions) -> Result<RemoteNode, StoreError> {
        let url = self.keys_url(key, options.recursive);
        debug!(url = %url, "Reading store key");

        let response = self
            .client
            .get(url)
            .timeout(options.deadline)
            .send()
            .await
            .map_err(|e| StoreError::from_http(e, options.deadline))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::from_http(e, options.deadline))?;

        if status.is_success() {
            let parsed: GetResponse =
                serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;
            return Ok(parsed.node);
        }

        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => Err(StoreError::Api {
                code: err.error_code,
                message: err.message,
                cause: err.cause,
            }),
            Err(_) => Err(StoreError::UnexpectedResponse {
                status: status.as_u16(),
                body,
            }),
        }
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
