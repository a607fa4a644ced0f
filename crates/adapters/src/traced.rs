// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrappers for consistent observability

use crate::store::{ColumnMeta, RowSink, StoreConnection, StoreDriver, StoreError};
use sheetsync_core::Primitive;
use std::time::Instant;

/// Wrapper that adds tracing to any StoreDriver
#[derive(Clone)]
pub struct TracedDriver<D> {
    inner: D,
}

impl<D> TracedDriver<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

impl<D: StoreDriver> StoreDriver for TracedDriver<D> {
    type Connection = TracedConnection<D::Connection>;

    fn location(&self) -> String {
        self.inner.location()
    }

    fn connect(&self) -> Result<Self::Connection, StoreError> {
        let location = self.inner.location();
        let span = tracing::info_span!("store.connect", location = %location);
        let _guard = span.enter();

        match self.inner.connect() {
            Ok(inner) => {
                tracing::debug!("connected");
                Ok(TracedConnection { inner, location })
            }
            Err(e) => {
                tracing::error!(error = %e, "connect failed");
                Err(e)
            }
        }
    }
}

/// Connection wrapper that logs every call with its timing
pub struct TracedConnection<C> {
    inner: C,
    location: String,
}

impl<C: StoreConnection> StoreConnection for TracedConnection<C> {
    fn begin(&mut self) -> Result<(), StoreError> {
        let result = self.inner.begin();
        match &result {
            Ok(()) => tracing::debug!(location = %self.location, "transaction started"),
            Err(e) => tracing::error!(location = %self.location, error = %e, "begin failed"),
        }
        result
    }

    fn execute(&mut self, sql: &str, params: &[Primitive]) -> Result<usize, StoreError> {
        let span = tracing::info_span!("store.execute", location = %self.location);
        let _guard = span.enter();

        tracing::debug!(sql, param_count = params.len(), "executing");

        let start = Instant::now();
        let result = self.inner.execute(sql, params);
        let elapsed = start.elapsed();

        match &result {
            Ok(affected) => tracing::debug!(
                affected,
                elapsed_ms = elapsed.as_millis() as u64,
                "executed"
            ),
            Err(e) => tracing::error!(
                sql,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "statement failed"
            ),
        }

        result
    }

    fn query(
        &mut self,
        sql: &str,
        params: &[Primitive],
        on_row: &mut RowSink<'_>,
    ) -> Result<u64, StoreError> {
        let span = tracing::info_span!("store.query", location = %self.location);
        let _guard = span.enter();

        tracing::debug!(sql, "querying");

        let start = Instant::now();
        let result = self.inner.query(sql, params, on_row);
        let elapsed = start.elapsed();

        match &result {
            Ok(rows) => tracing::debug!(
                rows,
                elapsed_ms = elapsed.as_millis() as u64,
                "query finished"
            ),
            Err(e) => tracing::error!(
                sql,
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "query failed"
            ),
        }

        result
    }

    fn column_metadata(&mut self, table: &str) -> Result<Vec<ColumnMeta>, StoreError> {
        let result = self.inner.column_metadata(table);
        tracing::trace!(
            table,
            columns = ?result.as_ref().map(|c| c.len()).ok(),
            "read column metadata"
        );
        result
    }

    fn row_count(&mut self, table: &str) -> Result<u64, StoreError> {
        let result = self.inner.row_count(table);
        tracing::trace!(table, rows = ?result.as_ref().ok(), "counted rows");
        result
    }

    fn commit(&mut self) -> Result<(), StoreError> {
        let result = self.inner.commit();
        match &result {
            Ok(()) => tracing::info!(location = %self.location, "committed"),
            Err(e) => tracing::error!(location = %self.location, error = %e, "commit failed"),
        }
        result
    }

    fn rollback(&mut self) -> Result<(), StoreError> {
        let result = self.inner.rollback();
        // A failed rollback usually means the transaction was already gone
        match &result {
            Ok(()) => tracing::warn!(location = %self.location, "rolled back"),
            Err(e) => tracing::warn!(location = %self.location, error = %e, "rollback failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
