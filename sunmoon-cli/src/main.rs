//! Binary crate for the `sunmoon` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Human-friendly output formatting
//!
//! Logging goes to stderr. `RUST_LOG` takes precedence over the configured
//! `log_level` (default `sunmoon=info`).

use clap::Parser;
use sunmoon_core::Settings;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod output;

const DEFAULT_LOG_FILTER: &str = "sunmoon=info";

fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    let settings = Settings::load()?;

    let fallback = settings.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(civil_zone = %settings.civil_zone, "loaded settings");

    cmd.run(settings)
}
