//! Environment variable source: ETCDEXTRACT__ prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;
use std::collections::HashMap;

/// Prefix for configuration environment variables.
pub const ENV_PREFIX: &str = "ETCDEXTRACT";

/// Add environment variable overlay to builder.
/// `ETCDEXTRACT__STORE__ENDPOINT` sets `store.endpoint`. When `vars` is
/// given it replaces the process environment.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<HashMap<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(vars),
    )
}
