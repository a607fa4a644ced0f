// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backing store drivers
//!
//! A [`StoreDriver`] opens a fresh [`StoreConnection`] per operation. The
//! connection is closed when dropped, and an uncommitted transaction is
//! rolled back at that point.

mod sqlite;

pub use sqlite::{SqliteConnection, SqliteDriver};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeConnection, FakeDriver, StoreCall};

use sheetsync_core::Primitive;
use thiserror::Error;

/// Errors from the backing store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store error: {0}")]
    Failed(String),
}

/// Column metadata as reported by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMeta {
    pub name: String,
    /// Declared type name, verbatim
    pub type_name: String,
    pub is_key: bool,
}

/// Callback receiving one result row at a time
pub type RowSink<'a> = dyn FnMut(Vec<Primitive>) -> Result<(), StoreError> + 'a;

/// An open connection to the backing store
pub trait StoreConnection {
    fn begin(&mut self) -> Result<(), StoreError>;

    /// Run a statement with positional parameters, returning rows affected
    fn execute(&mut self, sql: &str, params: &[Primitive]) -> Result<usize, StoreError>;

    /// Stream result rows into `on_row`, returning how many were read
    fn query(
        &mut self,
        sql: &str,
        params: &[Primitive],
        on_row: &mut RowSink<'_>,
    ) -> Result<u64, StoreError>;

    /// Columns of `table` in ordinal order; empty when the table is unknown
    fn column_metadata(&mut self, table: &str) -> Result<Vec<ColumnMeta>, StoreError>;

    /// Row count of `table`, used for progress estimation only
    fn row_count(&mut self, table: &str) -> Result<u64, StoreError>;

    fn commit(&mut self) -> Result<(), StoreError>;

    fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Opens connections to one backing store
pub trait StoreDriver: Send + Sync + 'static {
    type Connection: StoreConnection;

    /// Where the store lives; identifies it for single-flight gating
    fn location(&self) -> String;

    fn connect(&self) -> Result<Self::Connection, StoreError>;
}

/// Quote an identifier for use in generated SQL
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
