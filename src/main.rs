mod domain;
mod error;
mod catalog;
mod storage;
mod catalog_service;
mod config;
mod view;
mod shell;
mod cli;

mod app_system;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tracing::{error, info};
use crate::app_system::setup_tracing;
use crate::cli::Cli;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), String> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.load_options()).map_err(|e| e.to_string())?;

    // Setup tracing once for the entire application
    setup_tracing(&config.logging);

    info!(data_dir = %config.storage.data_dir.display(), "Starting product catalog");

    if let Err(e) = cli::run(cli, config).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }

    Ok(())
}
