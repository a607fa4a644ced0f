// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Store-side half of deferred-edit reconciliation: loading tables,
//! flushing journals and bulk export

mod export;
mod loader;
mod reconcile;
pub mod sql;

pub use export::{clean_to_id, multisave, ExportError, ExportReport, ExportTable};
pub use loader::{list_tables, load, read_shape, stream, LoadError, LoadedTable, TableEntry};
pub use reconcile::{flush, plan, FlushError, FlushReport, PlannedStatement, StatementKind};
pub use sql::Statement;
