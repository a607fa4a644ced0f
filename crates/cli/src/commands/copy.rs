// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sheetsync copy`

use super::require_database;
use crate::error::explain;
use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use sheetsync_core::SyncConfig;
use sheetsync_engine::TableView;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct CopyArgs {
    /// Source database file
    pub src: PathBuf,
    /// Destination database file (created if missing)
    pub dest: PathBuf,
    /// Table to copy; repeat for several (default: every table)
    #[arg(long = "table")]
    pub tables: Vec<String>,
}

#[derive(Serialize)]
struct CopyOutput {
    dest: String,
    tables: Vec<String>,
    rows: usize,
}

impl fmt::Display for CopyOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Copied {} tables ({} rows) to {}: {}",
            self.tables.len(),
            self.rows,
            self.dest,
            self.tables.join(", ")
        )
    }
}

pub async fn handle(args: CopyArgs, config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    require_database(&args.src)?;
    let dest = crate::sqlite(&args.dest, &config);
    let engine = crate::open_engine(&args.src, config);

    let names = if args.tables.is_empty() {
        engine
            .tables()
            .await
            .map_err(|e| explain(e, &args.src))?
            .into_iter()
            .filter(|entry| entry.kind == "table" && !entry.name.starts_with("sqlite_"))
            .map(|entry| entry.name)
            .collect()
    } else {
        args.tables
    };

    let mut views: Vec<TableView> = Vec::with_capacity(names.len());
    for name in &names {
        let view = engine.open(name).await.map_err(|e| explain(e, &args.src))?;
        views.push(view);
    }

    let refs: Vec<&TableView> = views.iter().collect();
    let report = engine
        .export(dest, &refs)
        .await
        .map_err(|e| explain(e, &args.dest))?;

    output::print(
        &CopyOutput {
            dest: args.dest.display().to_string(),
            tables: views
                .iter()
                .map(|v| sheetsync_storage::clean_to_id(v.name()))
                .collect(),
            rows: report.rows,
        },
        format,
    );
    Ok(())
}
