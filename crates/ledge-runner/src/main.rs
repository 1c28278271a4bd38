//! # Ledge Runner
//!
//! Headless driver for the level generator. Streams a level in front of a
//! player walking right at constant speed and prints a JSON summary.
//!
//! Usage: `ledge [config.toml]` or `ledge --write-config <path>`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod config;
mod simulation;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::RunnerConfig;

/// Main entry point.
fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("ledge=info".parse()?))
        .init();

    info!("Ledge runner starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args_os().skip(1);
    let mut config = match args.next() {
        Some(flag) if flag == "--write-config" => {
            let path = args.next().context("--write-config needs a path")?;
            RunnerConfig::default().save_to(&path)?;
            return Ok(());
        },
        Some(path) => RunnerConfig::load_from(path),
        None => RunnerConfig::default(),
    };
    config.validate();

    let summary = simulation::run(&config).context("level run failed")?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!(
        "Generated {} chunks over {} ticks",
        summary.chunk_count, summary.ticks
    );
    Ok(())
}
