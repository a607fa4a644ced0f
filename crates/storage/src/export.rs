// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bulk export of in-memory tables into a fresh store

use crate::sql;
use sheetsync_adapters::{Reporter, StoreConnection, StoreDriver, StoreError};
use sheetsync_core::{Column, Resolver, Row, SyncConfig, TableShape};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("table {0} has no visible columns")]
    NoColumns(String),
    #[error("two tables export to the same name {0}")]
    DuplicateTable(String),
    #[error("failed to open store: {0}")]
    Connect(#[source] StoreError),
    #[error("failed to start transaction: {0}")]
    Begin(#[source] StoreError),
    #[error("statement failed: {sql}: {source}")]
    Statement {
        sql: String,
        #[source]
        source: StoreError,
    },
    #[error("commit failed: {0}")]
    Commit(#[source] StoreError),
}

/// A table to export; its rows carry no journal
#[derive(Debug, Clone)]
pub struct ExportTable {
    pub shape: TableShape,
    pub rows: Vec<Row>,
}

impl ExportTable {
    pub fn new(shape: TableShape, rows: Vec<Row>) -> Self {
        Self { shape, rows }
    }

    /// Name the table is written under
    pub fn target_name(&self) -> String {
        clean_to_id(self.shape.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportReport {
    pub tables: usize,
    pub rows: usize,
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} tables, {} rows", self.tables, self.rows)
    }
}

/// Turn an arbitrary name into a plain identifier
pub fn clean_to_id(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "table".to_string()
    } else {
        cleaned
    }
}

/// Create each table if missing and insert all of its rows, in one
/// transaction.
///
/// Only visible columns are exported. Cell values go through the resolver,
/// so unresolved cells are written as the sentinel.
pub fn multisave<D, R>(
    driver: &D,
    tables: &[ExportTable],
    config: &SyncConfig,
    reporter: &R,
) -> Result<ExportReport, ExportError>
where
    D: StoreDriver + ?Sized,
    R: Reporter + ?Sized,
{
    let span = tracing::info_span!("export", location = %driver.location());
    let _guard = span.enter();

    let mut seen = HashSet::new();
    for table in tables {
        if table.shape.visible_columns().is_empty() {
            return Err(ExportError::NoColumns(table.shape.name().to_string()));
        }
        let target = table.target_name();
        if !seen.insert(target.clone()) {
            return Err(ExportError::DuplicateTable(target));
        }
    }

    let resolver = Resolver::new(config);
    let mut conn = driver.connect().map_err(ExportError::Connect)?;
    conn.begin().map_err(ExportError::Begin)?;

    let mut report = ExportReport::default();
    for table in tables {
        if let Err(e) = save_table(&mut conn, table, &resolver, config, reporter) {
            rollback(&mut conn);
            return Err(e);
        }
        report.tables += 1;
        report.rows += table.rows.len();
    }

    if let Err(e) = conn.commit() {
        rollback(&mut conn);
        return Err(ExportError::Commit(e));
    }

    tracing::info!(%report, "export finished");
    reporter.status(&format!("{} save finished", driver.location()));
    Ok(report)
}

fn save_table<C, R>(
    conn: &mut C,
    table: &ExportTable,
    resolver: &Resolver,
    config: &SyncConfig,
    reporter: &R,
) -> Result<(), ExportError>
where
    C: StoreConnection,
    R: Reporter + ?Sized,
{
    let target = table.target_name();
    let columns: Vec<&Column> = table.shape.visible_columns();

    run(conn, &sql::create_table(&target, &columns), config, reporter)?;

    let total = table.rows.len() as u64;
    let every = config.progress_every;
    for (i, row) in table.rows.iter().enumerate() {
        let values = resolver.resolve_many(row, &columns);
        let stmt = sql::insert(&target, &columns, values);
        conn.execute(&stmt.sql, &stmt.params)
            .map_err(|source| ExportError::Statement {
                sql: stmt.sql.clone(),
                source,
            })?;
        let done = i as u64 + 1;
        if every > 0 && done % every == 0 {
            reporter.progress(&target, done, total);
        }
    }
    reporter.progress(&target, total, total);
    tracing::debug!(table = %target, rows = total, "table exported");
    Ok(())
}

fn run<C, R>(
    conn: &mut C,
    stmt: &sql::Statement,
    config: &SyncConfig,
    reporter: &R,
) -> Result<usize, ExportError>
where
    C: StoreConnection,
    R: Reporter + ?Sized,
{
    if config.echo_sql {
        reporter.status(&stmt.sql);
    }
    conn.execute(&stmt.sql, &stmt.params)
        .map_err(|source| ExportError::Statement {
            sql: stmt.sql.clone(),
            source,
        })
}

fn rollback<C: StoreConnection>(conn: &mut C) {
    if let Err(e) = conn.rollback() {
        tracing::warn!(error = %e, "rollback failed");
    }
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
