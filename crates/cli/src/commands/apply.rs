// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sheetsync apply`

use super::require_database;
use crate::edits::EditScript;
use crate::error::explain;
use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use sheetsync_core::{Primitive, Resolver, SyncConfig};
use sheetsync_storage::{plan, FlushReport, PlannedStatement};
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct ApplyArgs {
    /// SQLite database file
    pub db: PathBuf,
    /// Table name
    pub table: String,
    /// Edit script (JSON)
    pub edits: PathBuf,
    /// Print the statements that would run without touching the database
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct ApplyOutput {
    table: String,
    inserted: usize,
    updated: usize,
    deleted: usize,
    rows_affected: usize,
    unmatched: usize,
}

impl ApplyOutput {
    fn new(table: &str, report: &FlushReport) -> Self {
        Self {
            table: table.to_string(),
            inserted: report.inserted,
            updated: report.updated,
            deleted: report.deleted,
            rows_affected: report.rows_affected,
            unmatched: report.unmatched,
        }
    }
}

impl fmt::Display for ApplyOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Applied to {}: {} inserted, {} updated, {} deleted ({} rows affected)",
            self.table, self.inserted, self.updated, self.deleted, self.rows_affected
        )?;
        if self.unmatched > 0 {
            write!(f, "\nwarning: {} statements matched no row", self.unmatched)?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct PlannedOutput {
    sql: String,
    params: Vec<Primitive>,
}

impl From<PlannedStatement> for PlannedOutput {
    fn from(planned: PlannedStatement) -> Self {
        Self {
            sql: planned.statement.sql,
            params: planned.statement.params,
        }
    }
}

impl fmt::Display for PlannedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(render_param).collect();
        write!(f, "{}; -- [{}]", self.sql, params.join(", "))
    }
}

fn render_param(value: &Primitive) -> String {
    match value {
        Primitive::Null => "NULL".to_string(),
        Primitive::Text(_) | Primitive::RawText(_) => {
            format!("'{}'", value.to_string().replace('\'', "''"))
        }
        other => other.to_string(),
    }
}

pub async fn handle(args: ApplyArgs, config: SyncConfig, format: OutputFormat) -> anyhow::Result<()> {
    require_database(&args.db)?;
    let script = EditScript::load(&args.edits)?;
    let resolver = Resolver::new(&config);
    let engine = crate::open_engine(&args.db, config);

    let mut view = engine
        .open(&args.table)
        .await
        .map_err(|e| explain(e, &args.db))?;
    script.apply(&mut view)?;

    if args.dry_run {
        let statements: Vec<PlannedOutput> = plan(view.shape(), view.journal(), &resolver)?
            .into_iter()
            .map(PlannedOutput::from)
            .collect();
        output::print_list(&statements, format, "Nothing to apply");
        return Ok(());
    }

    let report = engine
        .flush(&mut view)
        .await
        .map_err(|e| explain(e, &args.db))?;
    output::print(&ApplyOutput::new(view.name(), &report), format);
    Ok(())
}
