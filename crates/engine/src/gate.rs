// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight gate for background store work

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of keys with work in flight.
///
/// Clones share the same set.
#[derive(Clone, Debug, Default)]
pub struct BusyGate {
    held: Arc<Mutex<HashSet<String>>>,
}

impl BusyGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`, or `None` when it is already held
    pub fn try_acquire(&self, key: &str) -> Option<BusyGuard> {
        if !self.lock().insert(key.to_string()) {
            return None;
        }
        Some(BusyGuard {
            gate: self.clone(),
            key: key.to_string(),
        })
    }

    pub fn is_busy(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.held.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Holds a key of a [`BusyGate`]; releases it on drop
#[derive(Debug)]
pub struct BusyGuard {
    gate: BusyGate,
    key: String,
}

impl BusyGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.gate.lock().remove(&self.key);
    }
}
