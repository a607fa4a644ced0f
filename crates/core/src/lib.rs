// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sheetsync-core: the in-memory side of deferred-edit reconciliation
//!
//! This crate provides:
//! - Cell values and the store-safe primitives they resolve to
//! - The Column/Key Model describing a table's shape and row identity
//! - Rows, row identifiers and the Edit Journal of pending changes
//! - The Typed Value Resolver and the explicit sync configuration

pub mod column;
pub mod config;
pub mod id;
pub mod journal;
pub mod resolve;
pub mod row;
pub mod value;

pub use column::{Column, ColumnType, ShapeError, TableShape};
pub use config::{ConfigError, SyncConfig};
pub use id::{RowId, RowIdGen};
pub use journal::{Change, EditJournal, JournalError, JournalSummary, PendingMod};
pub use resolve::{coerce, Resolver};
pub use row::Row;
pub use value::{CellValue, Primitive, Unresolved};
