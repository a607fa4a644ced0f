// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Row identifier allocation

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque, stable handle for an in-memory row.
///
/// Not the row's key values: those may change under edit, the id does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub u64);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// Monotonic row id generator.
///
/// Clones share one counter, so ids handed out by the loader and by the
/// journal never collide and sort in allocation order.
#[derive(Debug, Clone)]
pub struct RowIdGen {
    counter: Arc<AtomicU64>,
}

impl RowIdGen {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn next(&self) -> RowId {
        RowId(self.counter.fetch_add(1, Ordering::SeqCst))
    }
}

impl Default for RowIdGen {
    fn default() -> Self {
        Self::new()
    }
}
