// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite backing store

use super::{quote_ident, ColumnMeta, RowSink, StoreConnection, StoreDriver, StoreError};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection};
use sheetsync_core::{Primitive, SyncConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Opens SQLite connections to one database file
#[derive(Debug, Clone)]
pub struct SqliteDriver {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteDriver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: SyncConfig::default().busy_timeout,
        }
    }

    pub fn from_config(path: impl Into<PathBuf>, config: &SyncConfig) -> Self {
        Self::new(path).with_busy_timeout(config.busy_timeout)
    }

    pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }
}

impl StoreDriver for SqliteDriver {
    type Connection = SqliteConnection;

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn connect(&self) -> Result<SqliteConnection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(SqliteConnection {
            conn,
            in_transaction: false,
        })
    }
}

/// One open SQLite connection.
///
/// Dropping it with a transaction still open rolls the transaction back.
pub struct SqliteConnection {
    conn: Connection,
    in_transaction: bool,
}

impl StoreConnection for SqliteConnection {
    fn begin(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("BEGIN")?;
        self.in_transaction = true;
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[Primitive]) -> Result<usize, StoreError> {
        let mut stmt = self.conn.prepare_cached(sql)?;
        let affected = stmt.execute(params_from_iter(params.iter().map(Param)))?;
        Ok(affected)
    }

    fn query(
        &mut self,
        sql: &str,
        params: &[Primitive],
        on_row: &mut RowSink<'_>,
    ) -> Result<u64, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let width = stmt.column_count();
        let mut rows = stmt.query(params_from_iter(params.iter().map(Param)))?;

        let mut count = 0;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(from_value_ref(row.get_ref(i)?));
            }
            on_row(values)?;
            count += 1;
        }
        Ok(count)
    }

    fn column_metadata(&mut self, table: &str) -> Result<Vec<ColumnMeta>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, type, pk FROM pragma_table_info(?1) ORDER BY cid")?;
        let columns = stmt
            .query_map([table], |row| {
                let pk: i64 = row.get(2)?;
                Ok(ColumnMeta {
                    name: row.get(0)?,
                    type_name: row.get(1)?,
                    // pk is the 1-based position within the primary key
                    is_key: pk > 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    fn row_count(&mut self, table: &str) -> Result<u64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("COMMIT")?;
        self.in_transaction = false;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        self.in_transaction = false;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl Drop for SqliteConnection {
    fn drop(&mut self) {
        if self.in_transaction {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::warn!(error = %e, "rollback on close failed");
            }
        }
    }
}

/// Binds a primitive without copying it
struct Param<'a>(&'a Primitive);

impl ToSql for Param<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self.0 {
            Primitive::Null => ValueRef::Null,
            Primitive::Integer(i) => ValueRef::Integer(*i),
            Primitive::Real(r) => ValueRef::Real(*r),
            Primitive::Text(s) => ValueRef::Text(s.as_bytes()),
            Primitive::RawText(b) => ValueRef::Text(b),
            Primitive::Blob(b) => ValueRef::Blob(b),
        };
        Ok(ToSqlOutput::Borrowed(value))
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Primitive {
    match value {
        ValueRef::Null => Primitive::Null,
        ValueRef::Integer(i) => Primitive::Integer(i),
        ValueRef::Real(r) => Primitive::Real(r),
        ValueRef::Text(bytes) => match std::str::from_utf8(bytes) {
            Ok(s) => Primitive::Text(s.to_string()),
            Err(_) => Primitive::RawText(bytes.to_vec()),
        },
        ValueRef::Blob(bytes) => Primitive::Blob(bytes.to_vec()),
    }
}

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;
