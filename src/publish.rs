//! Snapshot Publisher
//!
//! Wraps a merged document in a timestamped envelope and emits it. The console
//! sink prints indented JSON; any other destination receives compact JSON via
//! HTTP POST. Delivery failures, console write failures included, are logged
//! and reported as an outcome, never as an error: only a snapshot that cannot
//! be encoded is fatal.

use crate::document::Document;
use crate::error::{ExtractError, PublishError};
use parking_lot::Mutex;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Destination string selecting the console sink.
pub const CONSOLE_SINK: &str = "stdout://";

/// Default limit for one HTTP publish request.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Publication unit: capture time plus the merged document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope {
    pub timestamp: i64,
    pub data: Document,
}

impl Envelope {
    pub fn new(timestamp: i64, data: Document) -> Self {
        Self { timestamp, data }
    }

    /// Stamp `data` with the current unix time.
    pub fn capture(data: Document) -> Self {
        Self::new(chrono::Utc::now().timestamp(), data)
    }
}

/// Where snapshots go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Console,
    Http(Url),
}

impl Destination {
    /// Parse a destination argument: `stdout://` or an http(s) URL.
    pub fn parse(raw: &str) -> Result<Self, ExtractError> {
        if raw == CONSOLE_SINK {
            return Ok(Destination::Console);
        }
        let url = Url::parse(raw)
            .map_err(|e| ExtractError::InvalidDestination(format!("{}: {}", raw, e)))?;
        match url.scheme() {
            "http" | "https" => Ok(Destination::Http(url)),
            other => Err(ExtractError::InvalidDestination(format!(
                "{}: unsupported scheme '{}' (expected {} or an http(s) URL)",
                raw, other, CONSOLE_SINK
            ))),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Console => f.write_str(CONSOLE_SINK),
            Destination::Http(url) => write!(f, "{}", url),
        }
    }
}

/// Result of one publish attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Written to the console.
    Printed,
    /// Accepted by the HTTP endpoint with 200.
    Delivered,
    /// The HTTP endpoint answered with another status.
    Rejected { status: u16 },
    /// The request could not be sent.
    Unreachable,
    /// The console rejected the write.
    ConsoleFailed,
}

/// Emits envelopes to a fixed destination.
pub struct SnapshotPublisher {
    destination: Destination,
    client: Client,
    console: Mutex<Box<dyn Write + Send>>,
}

impl SnapshotPublisher {
    pub fn new(destination: Destination, timeout: Duration) -> Result<Self, PublishError> {
        Self::with_console(destination, timeout, Box::new(std::io::stdout()))
    }

    /// Build a publisher whose console sink writes to `console`.
    pub fn with_console(
        destination: Destination,
        timeout: Duration,
        console: Box<dyn Write + Send>,
    ) -> Result<Self, PublishError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PublishError::Client(e.to_string()))?;
        Ok(Self {
            destination,
            client,
            console: Mutex::new(console),
        })
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub async fn publish(&self, envelope: &Envelope) -> Result<PublishOutcome, PublishError> {
        match &self.destination {
            Destination::Console => self.print(envelope),
            Destination::Http(url) => {
                let body = serde_json::to_vec(envelope)?;
                Ok(self.post(url, body).await)
            }
        }
    }

    fn print(&self, envelope: &Envelope) -> Result<PublishOutcome, PublishError> {
        let rendered = serde_json::to_string_pretty(envelope)?;
        let mut console = self.console.lock();
        let written = writeln!(console, "{}", rendered).and_then(|_| console.flush());
        if let Err(e) = written {
            error!(error = %e, "Cannot write snapshot to console");
            return Ok(PublishOutcome::ConsoleFailed);
        }
        Ok(PublishOutcome::Printed)
    }

    async fn post(&self, url: &Url, body: Vec<u8>) -> PublishOutcome {
        let sent = self
            .client
            .post(url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                error!(destination = %url, error = %e, "Cannot send HTTP request");
                return PublishOutcome::Unreachable;
            }
        };

        let status = response.status();
        if status == StatusCode::OK {
            debug!(destination = %url, "Snapshot delivered");
            return PublishOutcome::Delivered;
        }

        error!(destination = %url, status = %status, "Error received from the HTTP endpoint");
        match response.text().await {
            Ok(text) => error!(destination = %url, body = %text, "Error response"),
            Err(e) => warn!(destination = %url, error = %e, "Cannot read error response body"),
        }
        PublishOutcome::Rejected {
            status: status.as_u16(),
        }
    }
}
