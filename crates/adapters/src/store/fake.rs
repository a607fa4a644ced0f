// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake backing store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{quote_ident, ColumnMeta, RowSink, StoreConnection, StoreDriver, StoreError};
use sheetsync_core::Primitive;
use std::sync::{Arc, Mutex};

/// Recorded store call
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Connect,
    Begin,
    Execute { sql: String, params: Vec<Primitive> },
    Query { sql: String },
    Commit,
    Rollback,
    Close,
}

#[derive(Debug, Clone)]
struct FakeTable {
    name: String,
    columns: Vec<ColumnMeta>,
    rows: Vec<Vec<Primitive>>,
}

#[derive(Debug, Default)]
struct FakeState {
    calls: Vec<StoreCall>,
    tables: Vec<FakeTable>,
    fail_on: Option<String>,
    affected: Option<usize>,
}

/// Fake driver that records every call.
///
/// Statements never change the scripted tables; queries answer from them.
#[derive(Clone, Default)]
pub struct FakeDriver {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a table: `(name, type, is_key)` columns and its rows
    pub fn with_table(
        self,
        name: &str,
        columns: &[(&str, &str, bool)],
        rows: Vec<Vec<Primitive>>,
    ) -> Self {
        let table = FakeTable {
            name: name.to_string(),
            columns: columns
                .iter()
                .map(|(name, type_name, is_key)| ColumnMeta {
                    name: name.to_string(),
                    type_name: type_name.to_string(),
                    is_key: *is_key,
                })
                .collect(),
            rows,
        };
        self.lock().tables.push(table);
        self
    }

    /// Fail any statement containing `pattern`
    pub fn fail_on(self, pattern: &str) -> Self {
        self.lock().fail_on = Some(pattern.to_string());
        self
    }

    /// Rows-affected count reported for every statement (default 1)
    pub fn with_affected(self, affected: usize) -> Self {
        self.lock().affected = Some(affected);
        self
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    /// SQL text of recorded statements, in order
    pub fn statements(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Execute { sql, .. } => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: StoreCall) {
        self.lock().calls.push(call);
    }
}

impl StoreDriver for FakeDriver {
    type Connection = FakeConnection;

    fn location(&self) -> String {
        "fake".to_string()
    }

    fn connect(&self) -> Result<FakeConnection, StoreError> {
        self.record(StoreCall::Connect);
        Ok(FakeConnection {
            driver: self.clone(),
        })
    }
}

/// Connection handed out by [`FakeDriver`]
pub struct FakeConnection {
    driver: FakeDriver,
}

impl FakeConnection {
    fn table(&self, name: &str) -> Option<FakeTable> {
        self.driver
            .lock()
            .tables
            .iter()
            .find(|t| t.name == name)
            .cloned()
    }
}

impl StoreConnection for FakeConnection {
    fn begin(&mut self) -> Result<(), StoreError> {
        self.driver.record(StoreCall::Begin);
        Ok(())
    }

    fn execute(&mut self, sql: &str, params: &[Primitive]) -> Result<usize, StoreError> {
        self.driver.record(StoreCall::Execute {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        let state = self.driver.lock();
        if let Some(pattern) = &state.fail_on {
            if sql.contains(pattern.as_str()) {
                return Err(StoreError::Failed(format!("rejected: {}", sql)));
            }
        }
        Ok(state.affected.unwrap_or(1))
    }

    fn query(
        &mut self,
        sql: &str,
        _params: &[Primitive],
        on_row: &mut RowSink<'_>,
    ) -> Result<u64, StoreError> {
        self.driver.record(StoreCall::Query {
            sql: sql.to_string(),
        });
        let tables = self.driver.lock().tables.clone();

        let rows: Vec<Vec<Primitive>> = if sql.contains("sqlite_master") {
            tables
                .iter()
                .map(|t| {
                    vec![
                        Primitive::Text("table".to_string()),
                        Primitive::Text(t.name.clone()),
                        Primitive::Null,
                    ]
                })
                .collect()
        } else {
            tables
                .into_iter()
                .find(|t| sql.contains(&quote_ident(&t.name)))
                .map(|t| t.rows)
                .unwrap_or_default()
        };

        let mut count = 0;
        for row in rows {
            on_row(row)?;
            count += 1;
        }
        Ok(count)
    }

    fn column_metadata(&mut self, table: &str) -> Result<Vec<ColumnMeta>, StoreError> {
        Ok(self.table(table).map(|t| t.columns).unwrap_or_default())
    }

    fn row_count(&mut self, table: &str) -> Result<u64, StoreError> {
        Ok(self.table(table).map_or(0, |t| t.rows.len() as u64))
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        self.driver.record(StoreCall::Commit);
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        self.driver.record(StoreCall::Rollback);
        Ok(())
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.driver.record(StoreCall::Close);
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
