// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edit Journal: pending adds, modifications and deletions
//!
//! Invariant: an id held in `adds` never appears in `mods` or `dels`. Edits
//! and deletions of a not-yet-flushed row act on `adds` directly.

use crate::column::Column;
use crate::id::{RowId, RowIdGen};
use crate::row::Row;
use crate::value::CellValue;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors raised when an edit cannot be journaled
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JournalError {
    #[error("{0} is pending deletion")]
    RowDeleted(RowId),
    #[error("column ordinal {ordinal} out of range for {id} ({len} cells)")]
    ColumnOutOfRange { id: RowId, ordinal: usize, len: usize },
}

/// One column-level change
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    /// Saved value before the first edit of this column
    pub old: CellValue,
    pub new: CellValue,
}

/// Pending modifications of one stored row
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMod {
    saved: Row,
    current: Row,
    changes: BTreeMap<usize, Change>,
}

impl PendingMod {
    fn new(saved: Row) -> Self {
        Self {
            current: saved.clone(),
            saved,
            changes: BTreeMap::new(),
        }
    }

    /// Values as last known to match the store
    pub fn saved(&self) -> &Row {
        &self.saved
    }

    /// Saved values with the pending changes applied
    pub fn current(&self) -> &Row {
        &self.current
    }

    /// Changes keyed by column ordinal, in column order
    pub fn changes(&self) -> &BTreeMap<usize, Change> {
        &self.changes
    }
}

/// Counts of pending work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JournalSummary {
    pub adds: usize,
    pub mods: usize,
    pub dels: usize,
}

impl fmt::Display for JournalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} added, {} modified, {} deleted",
            self.adds, self.mods, self.dels
        )
    }
}

/// Ordered record of edits not yet applied to the backing store.
///
/// Adds are keyed by freshly allocated ids; since ids are monotonic, map
/// order is creation order.
#[derive(Debug, Clone)]
pub struct EditJournal {
    ids: RowIdGen,
    adds: BTreeMap<RowId, Row>,
    mods: BTreeMap<RowId, PendingMod>,
    dels: BTreeMap<RowId, Row>,
}

impl EditJournal {
    pub fn new(ids: RowIdGen) -> Self {
        Self {
            ids,
            adds: BTreeMap::new(),
            mods: BTreeMap::new(),
            dels: BTreeMap::new(),
        }
    }

    /// Journal a new row, returning its freshly allocated id
    pub fn record_add(&mut self, row: Row) -> RowId {
        let id = self.ids.next();
        self.adds.insert(id, row);
        id
    }

    /// Journal a change of one column.
    ///
    /// `saved` is the row's last-known store state; it is ignored for rows
    /// that are still pending addition, which are edited in place.
    pub fn record_modification(
        &mut self,
        id: RowId,
        saved: &Row,
        column: &Column,
        new_value: CellValue,
    ) -> Result<(), JournalError> {
        let ordinal = column.ordinal;

        if let Some(row) = self.adds.get_mut(&id) {
            let len = row.len();
            if !row.set(ordinal, new_value) {
                return Err(JournalError::ColumnOutOfRange { id, ordinal, len });
            }
            return Ok(());
        }

        if self.dels.contains_key(&id) {
            return Err(JournalError::RowDeleted(id));
        }

        if ordinal >= saved.len() {
            return Err(JournalError::ColumnOutOfRange {
                id,
                ordinal,
                len: saved.len(),
            });
        }

        let entry = self
            .mods
            .entry(id)
            .or_insert_with(|| PendingMod::new(saved.clone()));
        let Some(old) = entry.saved.get(ordinal).cloned() else {
            return Err(JournalError::ColumnOutOfRange {
                id,
                ordinal,
                len: entry.saved.len(),
            });
        };

        entry.current.set(ordinal, new_value.clone());
        if new_value == old {
            entry.changes.remove(&ordinal);
        } else {
            entry
                .changes
                .insert(ordinal, Change { old, new: new_value });
        }

        if entry.changes.is_empty() {
            self.mods.remove(&id);
        }
        Ok(())
    }

    /// Journal the removal of a row.
    ///
    /// A pending add simply disappears. A stored row moves to `dels` with its
    /// saved values, dropping any pending modifications.
    pub fn record_deletion(&mut self, id: RowId, saved: Row) {
        if self.adds.remove(&id).is_some() {
            return;
        }
        let saved = match self.mods.remove(&id) {
            Some(pending) => pending.saved,
            None => saved,
        };
        self.dels.insert(id, saved);
    }

    pub fn adds(&self) -> &BTreeMap<RowId, Row> {
        &self.adds
    }

    pub fn mods(&self) -> &BTreeMap<RowId, PendingMod> {
        &self.mods
    }

    pub fn dels(&self) -> &BTreeMap<RowId, Row> {
        &self.dels
    }

    /// Current values of a row that is pending addition or modification
    pub fn pending_row(&self, id: RowId) -> Option<&Row> {
        self.adds
            .get(&id)
            .or_else(|| self.mods.get(&id).map(PendingMod::current))
    }

    pub fn is_added(&self, id: RowId) -> bool {
        self.adds.contains_key(&id)
    }

    pub fn is_deleted(&self, id: RowId) -> bool {
        self.dels.contains_key(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.adds.is_empty() && self.mods.is_empty() && self.dels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.adds.len() + self.mods.len() + self.dels.len()
    }

    pub fn summary(&self) -> JournalSummary {
        JournalSummary {
            adds: self.adds.len(),
            mods: self.mods.len(),
            dels: self.dels.len(),
        }
    }

    pub fn clear(&mut self) {
        self.adds.clear();
        self.mods.clear();
        self.dels.clear();
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
