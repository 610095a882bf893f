//! User config file source: $XDG_CONFIG_HOME/etcdextract/config.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::File;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the user config file, if a home directory can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "etcdextract").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the user config file to the builder when it exists.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: Option<&Path>,
) -> ConfigBuilder<DefaultState> {
    match path {
        Some(path) if path.exists() => {
            debug!(config_path = %path.display(), "Loading user configuration");
            builder.add_source(File::from(path).required(false))
        }
        _ => builder,
    }
}
