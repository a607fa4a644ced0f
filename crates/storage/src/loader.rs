// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Table loading and catalog listing

use crate::sql;
use sheetsync_adapters::{ProgressSink, StoreConnection, StoreDriver, StoreError};
use sheetsync_core::{ColumnType, Primitive, Row, RowId, RowIdGen, ShapeError, SyncConfig, TableShape};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open store: {0}")]
    Connect(#[source] StoreError),
    #[error("failed to read columns of {table}: {source}")]
    Metadata {
        table: String,
        #[source]
        source: StoreError,
    },
    #[error("no such table: {0}")]
    NoSuchTable(String),
    #[error("invalid table shape: {0}")]
    Shape(#[from] ShapeError),
    #[error("failed to read rows of {table}: {source}")]
    Rows {
        table: String,
        #[source]
        source: StoreError,
    },
}

/// A table read in full, rows in store order
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub shape: TableShape,
    pub rows: Vec<(RowId, Row)>,
}

/// One entry of the store catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    pub name: String,
    /// `table` or `view`
    pub kind: String,
    /// Defining SQL, when the store reports one
    pub sql: Option<String>,
    /// Row count; `None` when counting failed
    pub rows: Option<u64>,
}

/// Build the shape of `table` from store metadata.
///
/// Every column the store flags as part of the primary key becomes a
/// declared key, so composite keys are supported.
pub fn read_shape<C>(conn: &mut C, table: &str) -> Result<TableShape, LoadError>
where
    C: StoreConnection + ?Sized,
{
    let metadata = conn
        .column_metadata(table)
        .map_err(|source| LoadError::Metadata {
            table: table.to_string(),
            source,
        })?;
    if metadata.is_empty() {
        return Err(LoadError::NoSuchTable(table.to_string()));
    }

    let mut shape = TableShape::new(table);
    for meta in &metadata {
        shape.push_column(meta.name.as_str(), ColumnType::from_store_name(&meta.type_name))?;
        if meta.is_key {
            shape.add_key(&meta.name)?;
        }
    }
    Ok(shape)
}

/// Stream every row of `shape`'s table into `on_row`, returning the count.
///
/// Rows shorter than the shape are padded with null.
pub fn stream<C, F>(conn: &mut C, shape: &TableShape, mut on_row: F) -> Result<u64, LoadError>
where
    C: StoreConnection + ?Sized,
    F: FnMut(Row),
{
    let width = shape.len();
    let mut sink = |values: Vec<Primitive>| -> Result<(), StoreError> {
        let mut row = Row::from_primitives(values);
        row.pad_to(width);
        on_row(row);
        Ok(())
    };
    conn.query(&sql::select_all(shape.name()), &[], &mut sink)
        .map_err(|source| LoadError::Rows {
            table: shape.name().to_string(),
            source,
        })
}

/// Read `table` in full, assigning each row a fresh id from `ids`
pub fn load<D, P>(
    driver: &D,
    table: &str,
    ids: &RowIdGen,
    config: &SyncConfig,
    progress: &P,
) -> Result<LoadedTable, LoadError>
where
    D: StoreDriver + ?Sized,
    P: ProgressSink + ?Sized,
{
    let span = tracing::info_span!("load", table);
    let _guard = span.enter();

    let mut conn = driver.connect().map_err(LoadError::Connect)?;
    let shape = read_shape(&mut conn, table)?;

    let total = match conn.row_count(table) {
        Ok(total) => total,
        Err(e) => {
            tracing::warn!(error = %e, "row count unavailable");
            0
        }
    };

    let every = config.progress_every;
    let mut rows = Vec::with_capacity(usize::try_from(total).unwrap_or(0));
    let done = stream(&mut conn, &shape, |row| {
        rows.push((ids.next(), row));
        let done = rows.len() as u64;
        if every > 0 && done % every == 0 {
            progress.progress(table, done, total.max(done));
        }
    })?;
    progress.progress(table, done, total.max(done));

    tracing::info!(
        rows = done,
        columns = shape.len(),
        keys = shape.declared_keys().len(),
        "loaded"
    );
    Ok(LoadedTable { shape, rows })
}

/// List tables and views of the store, skipping indexes
pub fn list_tables<D>(driver: &D) -> Result<Vec<TableEntry>, LoadError>
where
    D: StoreDriver + ?Sized,
{
    let mut conn = driver.connect().map_err(LoadError::Connect)?;

    let mut entries = Vec::new();
    let mut sink = |values: Vec<Primitive>| -> Result<(), StoreError> {
        let mut values = values.into_iter().map(text);
        let kind = values.next().flatten().unwrap_or_default();
        let name = values.next().flatten().unwrap_or_default();
        let sql = values.next().flatten();
        if kind != "index" && !name.is_empty() {
            entries.push(TableEntry {
                name,
                kind,
                sql,
                rows: None,
            });
        }
        Ok(())
    };
    conn.query(
        "SELECT type, name, sql FROM sqlite_master ORDER BY name",
        &[],
        &mut sink,
    )
    .map_err(|source| LoadError::Rows {
        table: "sqlite_master".to_string(),
        source,
    })?;

    for entry in &mut entries {
        match conn.row_count(&entry.name) {
            Ok(count) => entry.rows = Some(count),
            Err(e) => tracing::warn!(table = %entry.name, error = %e, "row count unavailable"),
        }
    }
    Ok(entries)
}

fn text(value: Primitive) -> Option<String> {
    match value {
        Primitive::Null => None,
        Primitive::Text(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
