//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ExtractError;

/// Map startup errors to a one-line diagnostic with a hint where one helps.
pub fn map_error(e: &ExtractError) -> String {
    match e {
        ExtractError::InvalidDestination(_) => format!(
            "{}\nhint: URL must be stdout:// or an http(s) URL",
            e
        ),
        ExtractError::Store(_) => format!("{}\nhint: check --endpoint", e),
        _ => e.to_string(),
    }
}
