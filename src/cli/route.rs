//! CLI route: resolve configuration and wire the extraction pipeline.

use crate::cli::parse::Cli;
use crate::config::{ConfigLoader, ExtractConfig};
use crate::error::ExtractError;
use crate::publish::{Destination, SnapshotPublisher};
use crate::scheduler::Scheduler;
use crate::store::{EtcdClient, RootFetcher};
use std::sync::Arc;
use std::time::Duration;

/// Load layered configuration and apply CLI overrides (highest priority).
pub fn resolve_config(cli: &Cli) -> Result<ExtractConfig, ExtractError> {
    let mut config = ConfigLoader::load(cli.config.as_deref())?;

    if let Some(ref endpoint) = cli.endpoint {
        config.store.endpoint = endpoint.clone();
    }
    if let Some(timeout) = cli.request_timeout {
        config.store.request_timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

/// Everything a run needs, built once at startup.
pub struct RunContext {
    scheduler: Scheduler,
}

impl RunContext {
    /// Build the store client, fetcher, publisher and scheduler. Fails on any
    /// configuration problem so no cycle starts with a broken setup.
    pub fn new(cli: &Cli, config: &ExtractConfig) -> Result<Self, ExtractError> {
        let roots = cli.root_list();
        if roots.is_empty() {
            return Err(ExtractError::ConfigError(
                "DOC_ROOTS must name at least one root".to_string(),
            ));
        }

        let destination = Destination::parse(&cli.url)?;
        let store = EtcdClient::new(&config.store.endpoint, config.store.request_timeout())?;
        let fetcher = RootFetcher::with_deadline(Arc::new(store), config.store.request_timeout());
        let publisher = SnapshotPublisher::new(destination, config.publish.timeout())?;

        Ok(Self {
            scheduler: Scheduler::new(
                roots,
                Duration::from_secs(cli.interval),
                fetcher,
                publisher,
            ),
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn into_scheduler(self) -> Scheduler {
        self.scheduler
    }
}
