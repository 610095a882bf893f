//! ConfigLoader facade over the layered sources.

use super::merge_policy;
use super::sources::{environment, global_file};
use super::ExtractConfig;
use config::{ConfigError, File};
use std::collections::HashMap;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the user file, an optional explicit file and
    /// the process environment.
    ///
    /// Precedence: defaults (lowest) -> user file -> explicit file -> environment (highest).
    pub fn load(explicit: Option<&Path>) -> Result<ExtractConfig, ConfigError> {
        let user_file = global_file::user_config_path();
        Self::load_from(user_file.as_deref(), explicit, None)
    }

    /// Load with every source spelled out. `env` replaces the process
    /// environment when given.
    pub fn load_from(
        user_file: Option<&Path>,
        explicit: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<ExtractConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder, user_file);
        let builder = match explicit {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder,
        };
        let builder = environment::add_to_builder(builder, env);

        builder.build()?.try_deserialize()
    }
}
