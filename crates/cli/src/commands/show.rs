// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sheetsync show`

use super::require_database;
use crate::error::explain;
use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use sheetsync_core::{CellValue, ColumnType, Primitive, SyncConfig};
use sheetsync_engine::TableView;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ShowArgs {
    /// SQLite database file
    pub db: PathBuf,
    /// Table name
    pub table: String,
    /// Print at most this many rows
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct ColumnInfo {
    name: String,
    #[serde(rename = "type")]
    declared_type: ColumnType,
    key: bool,
}

#[derive(Serialize)]
struct TableContents {
    table: String,
    columns: Vec<ColumnInfo>,
    rows: Vec<Vec<Primitive>>,
    total: usize,
}

impl TableContents {
    fn from_view(view: &TableView, limit: Option<usize>) -> Self {
        let columns = view
            .shape()
            .columns()
            .iter()
            .map(|c| ColumnInfo {
                name: c.name.clone(),
                declared_type: c.declared_type,
                key: c.is_key,
            })
            .collect();
        let all = view.rows();
        let rows = all
            .iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|(_, row)| row.cells().iter().map(cell_value).collect())
            .collect();
        Self {
            table: view.name().to_string(),
            columns,
            rows,
            total: all.len(),
        }
    }
}

fn cell_value(cell: &CellValue) -> Primitive {
    match cell.as_primitive() {
        Some(value) => value.clone(),
        None => Primitive::Text(cell.to_string()),
    }
}

impl fmt::Display for TableContents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header: Vec<String> = self
            .columns
            .iter()
            .map(|c| {
                if c.key {
                    format!("{}*", c.name)
                } else {
                    c.name.clone()
                }
            })
            .collect();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        writeln!(f, "{}", output::columns(&header, &rows))?;
        write!(f, "({} of {} rows)", self.rows.len(), self.total)
    }
}

pub async fn handle(args: ShowArgs, config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    require_database(&args.db)?;
    let engine = crate::open_engine(&args.db, config);

    let view = engine
        .open(&args.table)
        .await
        .map_err(|e| explain(e, &args.db))?;

    output::print(&TableContents::from_view(&view, args.limit), format);
    Ok(())
}
