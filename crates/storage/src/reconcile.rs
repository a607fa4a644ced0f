// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation Engine: drains an Edit Journal into the backing store
//!
//! All statements of one flush run inside a single transaction. Adds go
//! first, then modifications, then deletions. UPDATE and DELETE locate the
//! store row through the saved values of [`TableShape::key_columns`], never
//! through edited values.

use crate::sql::{self, Statement};
use sheetsync_adapters::{Reporter, StoreConnection, StoreDriver, StoreError};
use sheetsync_core::{Column, EditJournal, Primitive, Resolver, Row, RowId, SyncConfig, TableShape};
use std::fmt;
use thiserror::Error;

/// Errors that abort a flush. The transaction is rolled back and the
/// journal is left as it was.
#[derive(Debug, Error)]
pub enum FlushError {
    #[error("table {table} has no columns to identify rows by")]
    NoIdentity { table: String },
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Insert,
    Update,
    Delete,
}

/// A statement generated for one journaled row
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedStatement {
    pub kind: StatementKind,
    pub row: RowId,
    pub statement: Statement,
}

/// Outcome of a committed flush
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
    pub rows_affected: usize,
    /// UPDATE/DELETE statements whose predicate matched no store row
    pub unmatched: usize,
}

impl FlushReport {
    pub fn statements(&self) -> usize {
        self.inserted + self.updated + self.deleted
    }

    fn record(&mut self, kind: StatementKind, affected: usize) {
        match kind {
            StatementKind::Insert => self.inserted += 1,
            StatementKind::Update => self.updated += 1,
            StatementKind::Delete => self.deleted += 1,
        }
        self.rows_affected += affected;
        if affected == 0 && kind != StatementKind::Insert {
            self.unmatched += 1;
        }
    }
}

impl fmt::Display for FlushReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} inserted, {} updated, {} deleted ({} rows affected)",
            self.inserted, self.updated, self.deleted, self.rows_affected
        )?;
        if self.unmatched > 0 {
            write!(f, ", {} unmatched", self.unmatched)?;
        }
        Ok(())
    }
}

/// Generate the statements a flush of `journal` would run, in order
pub fn plan(
    shape: &TableShape,
    journal: &EditJournal,
    resolver: &Resolver,
) -> Result<Vec<PlannedStatement>, FlushError> {
    let table = shape.name();
    let visible = shape.visible_columns();
    let keys = shape.key_columns();

    let needs_identity = !journal.mods().is_empty() || !journal.dels().is_empty();
    if needs_identity && keys.is_empty() {
        return Err(FlushError::NoIdentity {
            table: table.to_string(),
        });
    }

    let mut planned = Vec::with_capacity(journal.len());

    for (id, row) in journal.adds() {
        let values = resolver.resolve_many(row, &visible);
        planned.push(PlannedStatement {
            kind: StatementKind::Insert,
            row: *id,
            statement: sql::insert(table, &visible, values),
        });
    }

    for (id, pending) in journal.mods() {
        let set: Vec<&Column> = pending
            .changes()
            .keys()
            .filter_map(|ordinal| shape.column_at(*ordinal))
            .collect();
        let values = resolver.resolve_many(pending.current(), &set);
        let identity = identity(&keys, pending.saved(), resolver);
        planned.push(PlannedStatement {
            kind: StatementKind::Update,
            row: *id,
            statement: sql::update(table, &set, values, &identity),
        });
    }

    for (id, saved) in journal.dels() {
        let identity = identity(&keys, saved, resolver);
        planned.push(PlannedStatement {
            kind: StatementKind::Delete,
            row: *id,
            statement: sql::delete(table, &identity),
        });
    }

    Ok(planned)
}

/// Apply `journal` to the store in one transaction.
///
/// The connection is opened here and closed on every exit path. Clearing the
/// journal and reloading the view are the caller's job once this returns Ok.
pub fn flush<D, R>(
    shape: &TableShape,
    journal: &EditJournal,
    driver: &D,
    config: &SyncConfig,
    reporter: &R,
) -> Result<FlushReport, FlushError>
where
    D: StoreDriver + ?Sized,
    R: Reporter + ?Sized,
{
    let span = tracing::info_span!("flush", table = shape.name());
    let _guard = span.enter();

    if journal.is_empty() {
        tracing::debug!("journal empty, nothing to flush");
        return Ok(FlushReport::default());
    }

    let resolver = Resolver::new(config);
    let statements = plan(shape, journal, &resolver)?;

    tracing::info!(summary = %journal.summary(), "saving");
    reporter.status(&format!("saving {} ({})", shape.name(), journal.summary()));

    let mut conn = driver.connect().map_err(FlushError::Connect)?;
    conn.begin().map_err(FlushError::Begin)?;

    let mut report = FlushReport::default();
    for planned in &statements {
        let Statement { sql, params } = &planned.statement;
        if config.echo_sql {
            reporter.status(sql);
        }
        match conn.execute(sql, params) {
            Ok(affected) => {
                if affected == 0 && planned.kind != StatementKind::Insert {
                    tracing::warn!(row = %planned.row, sql, "predicate matched no row");
                } else if affected > 1 {
                    tracing::warn!(row = %planned.row, affected, sql, "predicate matched several rows");
                }
                report.record(planned.kind, affected);
            }
            Err(source) => {
                rollback(&mut conn);
                return Err(FlushError::Statement {
                    sql: sql.clone(),
                    source,
                });
            }
        }
    }

    if let Err(e) = conn.commit() {
        rollback(&mut conn);
        return Err(FlushError::Commit(e));
    }

    tracing::info!(%report, "saved");
    reporter.status(&format!("saved {}: {}", shape.name(), report));
    Ok(report)
}

fn identity<'a>(
    keys: &[&'a Column],
    saved: &Row,
    resolver: &Resolver,
) -> Vec<(&'a Column, Primitive)> {
    keys.iter()
        .map(|column| (*column, resolver.resolve_saved(saved, column)))
        .collect()
}

fn rollback<C: StoreConnection>(conn: &mut C) {
    if let Err(e) = conn.rollback() {
        tracing::warn!(error = %e, "rollback failed");
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
