//! Plasma - extensible host process.
//!
//! Loads the configuration, sets up logging, starts the host and keeps it
//! running until Ctrl+C.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use plasma_config::PlasmaConfig;
use plasma_server::{Host, HostOptions, config_bridge};
use tracing::{error, info};

mod cli;
mod theme;

use cli::Cli;
use theme::print_banner;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        },
    };

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Startup failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let resolved = PlasmaConfig::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    let config = resolved.config;
    let color = config.logging.color_enabled;

    if cli.init_settings {
        let verb = if resolved.created { "Created" } else { "Updated" };
        println!(
            "{}",
            theme::success(
                &format!("{verb} configuration at {}", resolved.path.display()),
                color
            )
        );
        return Ok(ExitCode::SUCCESS);
    }

    let mut log_config =
        config_bridge::to_log_config(&config).context("invalid logging configuration")?;
    if cli.verbose {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = plasma_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    print_banner(color);
    info!(config = %resolved.path.display(), "Configuration loaded");

    let mut host = match Host::start(HostOptions::new(config)) {
        Ok(host) => host,
        Err(e) if e.is_lock_held() => {
            error!(error = %e, "Data directory is locked");
            eprintln!("{}", theme::error("another instance is already running", color));
            return Ok(ExitCode::FAILURE);
        },
        Err(e) => return Err(e).context("failed to start host"),
    };

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("Shutdown requested");

    host.shutdown().context("host shutdown reported errors")?;
    Ok(ExitCode::SUCCESS)
}
