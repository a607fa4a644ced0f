// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sheetsync tables`

use super::require_database;
use crate::error::explain;
use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use sheetsync_core::SyncConfig;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct TablesArgs {
    /// SQLite database file
    pub db: PathBuf,
}

#[derive(Serialize)]
struct TableInfo {
    name: String,
    kind: String,
    rows: Option<u64>,
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.rows.map_or_else(|| "-".to_string(), |n| n.to_string());
        write!(f, "{:<24} {:<6} {:>8}", self.name, self.kind, rows)
    }
}

pub async fn handle(args: TablesArgs, config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    require_database(&args.db)?;
    let engine = crate::open_engine(&args.db, config);

    let entries = engine.tables().await.map_err(|e| explain(e, &args.db))?;
    let infos: Vec<TableInfo> = entries
        .into_iter()
        .map(|entry| TableInfo {
            name: entry.name,
            kind: entry.kind,
            rows: entry.rows,
        })
        .collect();

    output::print_list(&infos, format, "No tables");
    Ok(())
}
