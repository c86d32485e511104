#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Pellet Rush over stdin and stdout.
//!
//! The referee writes the map once, then one observation block per turn.
//! Every block is answered with a single line of commands joined by `" | "`.
//! Diagnostics go to stderr so they never interleave with the command stream.

mod config;
mod protocol;

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use pellet_rush_engine::TurnEngine;
use protocol::ProtocolReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Fallback directive when neither `--log-filter` nor `RUST_LOG` is set.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "pellet-rush")]
#[command(about = "Turn-based Pellet Rush agent speaking the referee line protocol", long_about = None)]
struct Cli {
    /// TOML file overriding the engine tunables.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Tracing filter directive, takes precedence over `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

/// Entry point for the Pellet Rush command-line agent.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_filter.as_deref())?;

    let config = config::load(cli.config.as_deref())?;
    info!(?config, "engine configured");

    let stdin = io::stdin();
    let mut reader = ProtocolReader::new(stdin.lock());
    let grid = reader.read_grid().context("failed to read the map")?;
    info!(width = grid.width(), height = grid.height(), "map loaded");

    let mut engine = TurnEngine::new(grid, config);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    while let Some(observation) = reader
        .next_turn()
        .context("failed to read a turn observation")?
    {
        let plan = engine.decide(observation);
        writeln!(out, "{}", plan.render()).context("failed to write commands")?;
        out.flush().context("failed to flush commands")?;
    }

    info!("referee closed the stream");
    Ok(())
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter {directive:?}"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
