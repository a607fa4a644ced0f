// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine: runs store work in blocking background tasks
//!
//! Loads and flushes of one table are single-flight: the gate key is held by
//! the blocking task itself, so it stays held until the store work finishes
//! even when the awaiting future is dropped.

use crate::error::EngineError;
use crate::gate::{BusyGate, BusyGuard};
use crate::view::TableView;
use sheetsync_adapters::{Reporter, StoreDriver};
use sheetsync_core::{RowIdGen, SyncConfig};
use sheetsync_storage::{self as storage, ExportReport, FlushReport, LoadedTable, TableEntry};
use std::sync::Arc;
use std::time::Instant;

/// Foreground handle to one backing store
pub struct Engine<D, R> {
    driver: Arc<D>,
    config: Arc<SyncConfig>,
    reporter: Arc<R>,
    ids: RowIdGen,
    gate: BusyGate,
}

impl<D, R> Engine<D, R>
where
    D: StoreDriver,
    R: Reporter + 'static,
{
    pub fn new(driver: D, config: SyncConfig, reporter: R) -> Self {
        Self {
            driver: Arc::new(driver),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            ids: RowIdGen::new(),
            gate: BusyGate::new(),
        }
    }

    /// Whether a flush or reload of `table` is in flight
    pub fn is_busy(&self, table: &str) -> bool {
        self.gate.is_busy(&self.gate_key(table))
    }

    /// List tables and views of the store
    pub async fn tables(&self) -> Result<Vec<TableEntry>, EngineError> {
        let driver = Arc::clone(&self.driver);
        let entries = tokio::task::spawn_blocking(move || storage::list_tables(driver.as_ref()))
            .await??;
        Ok(entries)
    }

    /// Load `table` into a new view
    pub async fn open(&self, table: &str) -> Result<TableView, EngineError> {
        let guard = Arc::new(self.acquire(table)?);
        let loaded = self.load(table, guard).await?;
        Ok(TableView::new(loaded, self.ids.clone()))
    }

    /// Re-read the view's table, discarding pending edits.
    ///
    /// On failure the view keeps its rows and edits.
    pub async fn reload(&self, view: &mut TableView) -> Result<(), EngineError> {
        let guard = Arc::new(self.acquire(view.name())?);
        let loaded = self.load(view.name(), guard).await?;
        if view.has_changes() {
            tracing::info!(table = view.name(), summary = %view.journal().summary(), "discarding edits");
        }
        view.discard_changes();
        view.replace(loaded);
        Ok(())
    }

    /// Apply the view's pending edits to the store, then reload it.
    ///
    /// On flush failure the journal and rows are untouched. If the flush
    /// commits but the reload fails, the journal is already cleared and the
    /// load error is returned.
    pub async fn flush(&self, view: &mut TableView) -> Result<FlushReport, EngineError> {
        let guard = Arc::new(self.acquire(view.name())?);
        let start = Instant::now();

        let shape = view.shape().clone();
        let journal = view.journal().clone();
        let driver = Arc::clone(&self.driver);
        let config = Arc::clone(&self.config);
        let reporter = Arc::clone(&self.reporter);
        let held = Arc::clone(&guard);
        let result = tokio::task::spawn_blocking(move || {
            let _held = held;
            storage::flush(&shape, &journal, driver.as_ref(), &config, reporter.as_ref())
        })
        .await?;

        let report = match result {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(
                    table = view.name(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "flush failed"
                );
                return Err(e.into());
            }
        };
        view.discard_changes();

        let loaded = self.load(view.name(), guard).await?;
        view.replace(loaded);

        tracing::info!(
            table = view.name(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            %report,
            "flushed"
        );
        Ok(report)
    }

    /// Write the current rows of `views` into the store behind `dest`
    pub async fn export<E>(&self, dest: E, views: &[&TableView]) -> Result<ExportReport, EngineError>
    where
        E: StoreDriver,
    {
        let tables: Vec<_> = views.iter().map(|view| view.to_export()).collect();
        let config = Arc::clone(&self.config);
        let reporter = Arc::clone(&self.reporter);
        let report = tokio::task::spawn_blocking(move || {
            storage::multisave(&dest, &tables, &config, reporter.as_ref())
        })
        .await??;
        Ok(report)
    }

    async fn load(&self, table: &str, guard: Arc<BusyGuard>) -> Result<LoadedTable, EngineError> {
        let start = Instant::now();
        let name = table.to_string();
        let driver = Arc::clone(&self.driver);
        let config = Arc::clone(&self.config);
        let reporter = Arc::clone(&self.reporter);
        let ids = self.ids.clone();
        let result = tokio::task::spawn_blocking(move || {
            let _held = guard;
            storage::load(driver.as_ref(), &name, &ids, &config, reporter.as_ref())
        })
        .await?;

        match result {
            Ok(loaded) => {
                tracing::debug!(
                    table,
                    rows = loaded.rows.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "loaded"
                );
                Ok(loaded)
            }
            Err(e) => {
                tracing::error!(
                    table,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "load failed"
                );
                Err(e.into())
            }
        }
    }

    fn acquire(&self, table: &str) -> Result<BusyGuard, EngineError> {
        self.gate
            .try_acquire(&self.gate_key(table))
            .ok_or_else(|| EngineError::Busy {
                table: table.to_string(),
            })
    }

    fn gate_key(&self, table: &str) -> String {
        format!("{}::{}", self.driver.location(), table)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
