//! CLI parse: clap types for etcdextract. No behavior beyond argument shaping.

use clap::Parser;
use std::path::PathBuf;

/// Periodically extract etcd subtrees and publish them as one JSON document
#[derive(Parser, Debug)]
#[command(name = "etcdextract", version)]
#[command(about = "Periodically extract etcd subtrees and publish them as one JSON document")]
pub struct Cli {
    /// Comma-separated list of etcd roots to extract
    #[arg(value_name = "DOC_ROOTS")]
    pub roots: String,

    /// Interval in seconds to perform the extraction
    #[arg(value_name = "INTERVAL")]
    pub interval: u64,

    /// URL to post the JSON data to, or stdout:// to print it
    #[arg(value_name = "URL")]
    pub url: String,

    /// Verbose output (debug-level logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// etcd endpoint [default: http://127.0.0.1:2379]
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Configuration file path (layered over the user config file)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Deadline in seconds for each root read [default: 5]
    #[arg(long, value_name = "SECONDS")]
    pub request_timeout: Option<u64>,
}

impl Cli {
    /// Root paths in the order given, empty entries dropped.
    pub fn root_list(&self) -> Vec<String> {
        self.roots
            .split(',')
            .map(str::trim)
            .filter(|root| !root.is_empty())
            .map(str::to_string)
            .collect()
    }
}
