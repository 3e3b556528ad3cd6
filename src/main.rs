use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::Cli;
use sweepr::config::Config;
use sweepr::engine::TransmissionEngine;

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sweepr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("sweepr.log");

    // Setup env_logger with file output, keeping stdout for progress lines
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration and overlay the flags
    let mut config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    cli.apply_to(&mut config);

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let url = config
        .connection
        .url()
        .context("Invalid connection parameters")?;
    info!("Sweeping daemon at {url}");

    let mut engine = match config.connection.auth() {
        Some((user, password)) => TransmissionEngine::with_auth(url, user, password),
        None => TransmissionEngine::new(url),
    };

    // The sweep itself never fails: fetch problems downgrade to an empty
    // snapshot and remediation failures only show in the counts.
    let summary = sweepr::sweep::run(&config, &mut engine).await;
    info!("Run finished: {summary:?}");

    Ok(())
}
