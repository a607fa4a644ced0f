// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external I/O: the backing store and status reporting

pub mod report;
pub mod store;
pub mod traced;

pub use report::{NoOpReporter, ProgressSink, Reporter, StatusSink, TracingReporter};
pub use store::{
    quote_ident, ColumnMeta, SqliteConnection, SqliteDriver, StoreConnection, StoreDriver,
    StoreError,
};
pub use traced::{TracedConnection, TracedDriver};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use report::{FakeReporter, ProgressCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeDriver, StoreCall};
