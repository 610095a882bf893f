//! Merge rules: defaults, override order, conflict handling.

use crate::publish::DEFAULT_PUBLISH_TIMEOUT;
use crate::store::{DEFAULT_ENDPOINT, DEFAULT_REQUEST_TIMEOUT};
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("store.endpoint", DEFAULT_ENDPOINT)?
        .set_default(
            "store.request_timeout_secs",
            DEFAULT_REQUEST_TIMEOUT.as_secs() as i64,
        )?
        .set_default("publish.timeout_secs", DEFAULT_PUBLISH_TIMEOUT.as_secs() as i64)
}
