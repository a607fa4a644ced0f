// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sheetsync - edit SQLite tables through a deferred-edit journal

mod commands;
mod edits;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{apply, copy, show, tables};
use output::OutputFormat;
use sheetsync_adapters::{SqliteDriver, TracedDriver, TracingReporter};
use sheetsync_core::SyncConfig;
use sheetsync_engine::Engine;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "sheetsync",
    version,
    about = "sheetsync - journal edits to SQLite tables and apply them in one transaction"
)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tables and views with row counts
    Tables(tables::TablesArgs),
    /// Print the columns and rows of a table
    Show(show::ShowArgs),
    /// Apply an edit script to a table in one transaction
    Apply(apply::ApplyArgs),
    /// Copy tables from one database into another
    Copy(copy::CopyArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", error::render(&e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => SyncConfig::load(path)?,
        None => SyncConfig::default(),
    };

    match cli.command {
        Commands::Tables(args) => tables::handle(args, config, cli.format).await,
        Commands::Show(args) => show::handle(args, config, cli.format).await,
        Commands::Apply(args) => apply::handle(args, config, cli.format).await,
        Commands::Copy(args) => copy::handle(args, config, cli.format).await,
    }
}

/// Engine over the SQLite database at `path`, reporting through `tracing`
pub(crate) fn open_engine(
    path: &Path,
    config: SyncConfig,
) -> Engine<TracedDriver<SqliteDriver>, TracingReporter> {
    let driver = sqlite(path, &config);
    Engine::new(driver, config, TracingReporter)
}

pub(crate) fn sqlite(path: &Path, config: &SyncConfig) -> TracedDriver<SqliteDriver> {
    TracedDriver::new(SqliteDriver::from_config(path, config))
}

fn setup_logging(verbose: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
