//! etcdextract CLI Binary
//!
//! Command-line entry point: resolves configuration, initializes logging and
//! runs the extraction loop until a termination signal arrives.

use clap::Parser;
use etcdextract::cli::{map_error, resolve_config, Cli, RunContext};
use etcdextract::config::ExtractConfig;
use etcdextract::logging::{init_logging, LoggingConfig};
use etcdextract::scheduler::Scheduler;
use etcdextract::shutdown::wait_for_signal;
use std::process;
use tracing::instrument::WithSubscriber;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &config);
    let dispatch = match init_logging(&logging_config) {
        Ok(dispatch) => dispatch,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            process::exit(1);
        }
    };

    let context = match RunContext::new(&cli, &config) {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::dispatcher::with_default(&dispatch, || {
                error!(error = %e, "Error initializing extraction pipeline");
            });
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start async runtime: {}", e);
            process::exit(1);
        }
    };

    let code = runtime.block_on(run(context.into_scheduler()).with_subscriber(dispatch));
    process::exit(code);
}

/// Run the loop and map how it ended to a process exit status.
async fn run(mut scheduler: Scheduler) -> i32 {
    info!("etcdextract starting");

    let shutdown = async {
        match wait_for_signal().await {
            Ok(termination) => termination,
            Err(e) => {
                error!(error = %e, "Cannot install signal handlers");
                std::future::pending().await
            }
        }
    };

    match scheduler.run(shutdown).await {
        Ok(termination) => {
            error!(signal = %termination, "Signal received");
            termination.exit_code()
        }
        Err(e) => {
            error!(error = %e, "Extraction stopped");
            eprintln!("{}", map_error(&e));
            1
        }
    }
}

/// Build logging configuration from the config file and CLI flags.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, config: &ExtractConfig) -> LoggingConfig {
    let mut logging = config.logging.clone();

    if cli.verbose {
        logging.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        logging.format = format.clone();
    }

    logging
}
