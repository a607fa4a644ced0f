// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use sheetsync_core::{JournalError, RowId};
use sheetsync_storage::{ExportError, FlushError, LoadError};
use thiserror::Error;

/// Errors that can occur in the engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{table} is busy with another flush or reload")]
    Busy { table: String },
    #[error("unknown row: {0}")]
    UnknownRow(RowId),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
    #[error("journal error: {0}")]
    Journal(#[from] JournalError),
    #[error("load error: {0}")]
    Load(#[from] LoadError),
    #[error("flush error: {0}")]
    Flush(#[from] FlushError),
    #[error("export error: {0}")]
    Export(#[from] ExportError),
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
