// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake reporter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ProgressSink, StatusSink};
use std::sync::{Arc, Mutex};

/// Recorded progress report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressCall {
    pub label: String,
    pub done: u64,
    pub total: u64,
}

/// Reporter that records everything it receives
#[derive(Clone, Default)]
pub struct FakeReporter {
    statuses: Arc<Mutex<Vec<String>>>,
    progress: Arc<Mutex<Vec<ProgressCall>>>,
}

impl FakeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded status messages
    pub fn statuses(&self) -> Vec<String> {
        self.statuses.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Get all recorded progress reports
    pub fn progress_calls(&self) -> Vec<ProgressCall> {
        self.progress.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl StatusSink for FakeReporter {
    fn status(&self, message: &str) {
        self.statuses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

impl ProgressSink for FakeReporter {
    fn progress(&self, label: &str, done: u64, total: u64) {
        self.progress
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ProgressCall {
                label: label.to_string(),
                done,
                total,
            });
    }
}
