//! Extraction Scheduler
//!
//! Runs fetch, merge and publish cycles back to back with a fixed pause in
//! between. Cycles never overlap. A failing root is skipped for the cycle it
//! failed in; a failing publish, console included, ends the cycle. Only a
//! snapshot that cannot be encoded stops the loop.

use crate::document::Document;
use crate::error::ExtractError;
use crate::merge::merge;
use crate::publish::{Envelope, PublishOutcome, SnapshotPublisher};
use crate::store::RootFetcher;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, info, info_span, Instrument};

/// What happened during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    pub cycle: u64,
    pub merged_roots: Vec<String>,
    pub failed_roots: Vec<String>,
    pub envelope: Envelope,
    pub outcome: PublishOutcome,
}

/// Drives the extraction pipeline on a fixed interval.
pub struct Scheduler {
    roots: Vec<String>,
    interval: Duration,
    fetcher: RootFetcher,
    publisher: SnapshotPublisher,
    cycles: u64,
}

impl Scheduler {
    pub fn new(
        roots: Vec<String>,
        interval: Duration,
        fetcher: RootFetcher,
        publisher: SnapshotPublisher,
    ) -> Self {
        Self {
            roots,
            interval,
            fetcher,
            publisher,
            cycles: 0,
        }
    }

    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch every root in order, merge the successes, publish once.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, ExtractError> {
        self.cycles += 1;
        let cycle = self.cycles;

        let mut doc = Document::new();
        let mut merged_roots = Vec::new();
        let mut failed_roots = Vec::new();

        for root in &self.roots {
            match self.fetcher.fetch(root).await {
                Ok(node) => {
                    merge(&mut doc, &node);
                    merged_roots.push(root.clone());
                }
                Err(e) => {
                    error!(root = %root, error = %e, "Cannot get root");
                    failed_roots.push(root.clone());
                }
            }
        }

        let envelope = Envelope::capture(doc);
        let outcome = self.publisher.publish(&envelope).await?;

        info!(
            cycle,
            merged = merged_roots.len(),
            failed = failed_roots.len(),
            outcome = ?outcome,
            "Cycle complete"
        );

        Ok(CycleReport {
            cycle,
            merged_roots,
            failed_roots,
            envelope,
            outcome,
        })
    }

    /// Run cycles until `shutdown` resolves or a cycle fails fatally.
    ///
    /// `shutdown` is raced against both the running cycle and the pause, so
    /// an in-flight cycle is abandoned as soon as it fires. Returns the value
    /// `shutdown` resolved with.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<F::Output, ExtractError>
    where
        F: Future,
    {
        tokio::pin!(shutdown);
        info!(
            roots = ?self.roots,
            interval_secs = self.interval.as_secs(),
            destination = %self.publisher.destination(),
            endpoint = self.fetcher.endpoint(),
            "Starting extraction loop"
        );

        loop {
            let cycle = self.cycles + 1;
            let step = async {
                self.run_cycle().await?;
                debug!(pause = ?self.interval, "Sleeping until next cycle");
                tokio::time::sleep(self.interval).await;
                Ok::<(), ExtractError>(())
            }
            .instrument(info_span!("cycle", cycle));

            tokio::select! {
                stop = &mut shutdown => {
                    info!("Shutdown requested, stopping extraction loop");
                    return Ok(stop);
                }
                result = step => result?,
            }
        }
    }
}
