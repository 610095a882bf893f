//! CLI domain: argument parsing, config resolution and pipeline wiring.

mod output;
mod parse;
mod route;

pub use output::map_error;
pub use parse::Cli;
pub use route::{resolve_config, RunContext};
