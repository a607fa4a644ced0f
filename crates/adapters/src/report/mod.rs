// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status and progress reporting sinks

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeReporter, ProgressCall};

/// Receives human-readable operation summaries and generated SQL
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Receives progress of long-running operations
pub trait ProgressSink: Send + Sync {
    fn progress(&self, label: &str, done: u64, total: u64);
}

/// Both sinks in one
pub trait Reporter: StatusSink + ProgressSink {}

impl<T: StatusSink + ProgressSink> Reporter for T {}

/// Reporter that discards everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpReporter;

impl StatusSink for NoOpReporter {
    fn status(&self, _message: &str) {}
}

impl ProgressSink for NoOpReporter {
    fn progress(&self, _label: &str, _done: u64, _total: u64) {}
}

/// Reporter that forwards to `tracing`
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl StatusSink for TracingReporter {
    fn status(&self, message: &str) {
        tracing::info!(target: "sheetsync::status", "{}", message);
    }
}

impl ProgressSink for TracingReporter {
    fn progress(&self, label: &str, done: u64, total: u64) {
        tracing::debug!(target: "sheetsync::progress", label, done, total, "progress");
    }
}
