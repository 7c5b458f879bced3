//! overmind - an agent orchestration controller
//!
//! Discovers candidate agents in the agents directory, validates them
//! against the configured allow-list, runs them concurrently with
//! per-agent fault isolation, aggregates their results, and promotes
//! successfully-run agent sources into the trusted tools area.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

mod agents;
mod cli;
mod config;
mod controller;
mod error;
mod executor;
mod monitor;
mod promote;
mod store;
mod validator;

use cli::Args;
use config::Config;
use controller::Controller;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.debug);

    info!("Starting overmind v{}", env!("CARGO_PKG_VERSION"));

    // An unloadable config falls back to an empty allow-list via the
    // defaults-with-no-names path: nothing is permitted to load.
    let mut config = match Config::load_or_create(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            let mut cfg = Config::default();
            cfg.allowed_agents.clear();
            cfg
        }
    };

    if let Some(store) = args.store {
        config.store.path = store;
    }
    if let Some(timeout) = args.timeout {
        config.execution.timeout_secs = timeout;
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = config.ensure_directories() {
        warn!("Failed to prepare working directories: {}", e);
    }

    let registry = agents::default_registry();

    if args.list {
        for name in registry.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut controller = Controller::new(config, registry);

    let loaded = controller.load_agents();
    info!("Loaded {} agent(s)", loaded);

    let summary = controller.execute_agents().await;
    info!(
        "{} agent(s) completed, {} failed",
        summary.completed, summary.failed
    );

    if let Err(e) = controller.persist() {
        warn!("Failed to persist result store: {}", e);
    }

    monitor::log_snapshot();

    controller.shutdown_all();
    info!("overmind exited");
    Ok(())
}

/// Initialize the logging/tracing subsystem
fn init_logging(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
