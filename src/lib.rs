//! etcdextract: Periodic etcd Snapshots
//!
//! Reads one or more etcd subtrees on a fixed interval, folds their flat key
//! listings into a single nested document and publishes it as a timestamped
//! JSON envelope, either to the console or to an HTTP endpoint.

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod logging;
pub mod merge;
pub mod publish;
pub mod scheduler;
pub mod shutdown;
pub mod store;
