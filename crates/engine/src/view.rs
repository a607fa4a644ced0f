// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Foreground view of one table: loaded rows plus pending edits

use crate::error::EngineError;
use sheetsync_core::{coerce, CellValue, EditJournal, Primitive, Row, RowId, RowIdGen, TableShape};
use sheetsync_storage::{ExportTable, LoadedTable};
use std::collections::HashMap;

/// Rows of one table as last loaded, overlaid with the pending journal.
///
/// Owned by a single foreground task. Edits only touch the journal; the
/// loaded rows change on reload.
#[derive(Debug, Clone)]
pub struct TableView {
    shape: TableShape,
    saved: Vec<(RowId, Row)>,
    index: HashMap<RowId, usize>,
    journal: EditJournal,
    /// Key set chosen by the user, reapplied after reloads
    keys_override: Option<Vec<String>>,
}

impl TableView {
    pub(crate) fn new(loaded: LoadedTable, ids: RowIdGen) -> Self {
        let mut view = Self {
            shape: loaded.shape,
            saved: Vec::new(),
            index: HashMap::new(),
            journal: EditJournal::new(ids),
            keys_override: None,
        };
        view.set_rows(loaded.rows);
        view
    }

    /// Swap in a fresh load, keeping hidden columns and chosen keys
    pub(crate) fn replace(&mut self, loaded: LoadedTable) {
        let previous = std::mem::replace(&mut self.shape, loaded.shape);
        for column in previous.columns().iter().filter(|c| c.hidden) {
            if self.shape.set_hidden(&column.name, true).is_err() {
                tracing::debug!(column = %column.name, "hidden column no longer exists");
            }
        }
        if let Some(keys) = self.keys_override.take() {
            let names: Vec<&str> = keys.iter().map(String::as_str).collect();
            match self.shape.set_keys(&names) {
                Ok(()) => self.keys_override = Some(keys),
                Err(e) => {
                    tracing::warn!(error = %e, "chosen keys no longer apply, using declared keys")
                }
            }
        }
        self.set_rows(loaded.rows);
    }

    fn set_rows(&mut self, rows: Vec<(RowId, Row)>) {
        self.index = rows
            .iter()
            .enumerate()
            .map(|(i, (id, _))| (*id, i))
            .collect();
        self.saved = rows;
    }

    pub fn name(&self) -> &str {
        self.shape.name()
    }

    pub fn shape(&self) -> &TableShape {
        &self.shape
    }

    /// Choose the columns that identify rows, replacing the declared keys
    pub fn set_keys(&mut self, names: &[&str]) -> Result<(), EngineError> {
        self.shape
            .set_keys(names)
            .map_err(|_| self.unknown_column(names))?;
        self.keys_override = Some(names.iter().map(|n| n.to_string()).collect());
        Ok(())
    }

    /// Hide or show a column; hidden columns are neither written nor used
    /// as fallback identity
    pub fn set_hidden(&mut self, name: &str, hidden: bool) -> Result<(), EngineError> {
        self.shape
            .set_hidden(name, hidden)
            .map_err(|_| EngineError::UnknownColumn(name.to_string()))
    }

    /// Current rows: loaded rows in store order with edits applied and
    /// deletions hidden, then added rows in creation order
    pub fn rows(&self) -> Vec<(RowId, &Row)> {
        let loaded = self
            .saved
            .iter()
            .filter(|(id, _)| !self.journal.is_deleted(*id))
            .map(|(id, row)| (*id, self.journal.pending_row(*id).unwrap_or(row)));
        let added = self.journal.adds().iter().map(|(id, row)| (*id, row));
        loaded.chain(added).collect()
    }

    /// Current values of a row; `None` once deleted
    pub fn get(&self, id: RowId) -> Option<&Row> {
        if self.journal.is_deleted(id) {
            return None;
        }
        self.journal
            .pending_row(id)
            .or_else(|| self.saved_row(id))
    }

    pub fn len(&self) -> usize {
        self.saved.len().saturating_sub(self.journal.dels().len()) + self.journal.adds().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add a row; short rows are padded with null
    pub fn add_row(&mut self, mut row: Row) -> RowId {
        row.pad_to(self.shape.len());
        self.journal.record_add(row)
    }

    pub fn set_cell(
        &mut self,
        id: RowId,
        column: &str,
        value: impl Into<CellValue>,
    ) -> Result<(), EngineError> {
        let column = self
            .shape
            .column(column)
            .ok_or_else(|| EngineError::UnknownColumn(column.to_string()))?;

        if self.journal.is_added(id) {
            self.journal
                .record_modification(id, &Row::default(), column, value.into())?;
            return Ok(());
        }

        let saved = self
            .index
            .get(&id)
            .and_then(|i| self.saved.get(*i))
            .map(|(_, row)| row)
            .ok_or(EngineError::UnknownRow(id))?;
        self.journal
            .record_modification(id, saved, column, value.into())?;
        Ok(())
    }

    pub fn delete_row(&mut self, id: RowId) -> Result<(), EngineError> {
        if self.journal.is_added(id) {
            self.journal.record_deletion(id, Row::default());
            return Ok(());
        }
        if self.journal.is_deleted(id) {
            return Ok(());
        }
        let saved = self.saved_row(id).cloned().ok_or(EngineError::UnknownRow(id))?;
        self.journal.record_deletion(id, saved);
        Ok(())
    }

    /// Ids of current rows whose `column` equals `value`.
    ///
    /// `value` is coerced to the column's declared type first, so `2` finds a
    /// stored `2.0` in a REAL column.
    pub fn find(&self, column: &str, value: &Primitive) -> Result<Vec<RowId>, EngineError> {
        let column = self
            .shape
            .column(column)
            .ok_or_else(|| EngineError::UnknownColumn(column.to_string()))?;
        let wanted = CellValue::Value(coerce(value, column.declared_type));
        Ok(self
            .rows()
            .into_iter()
            .filter(|(_, row)| row.get(column.ordinal) == Some(&wanted))
            .map(|(id, _)| id)
            .collect())
    }

    pub fn journal(&self) -> &EditJournal {
        &self.journal
    }

    pub fn has_changes(&self) -> bool {
        !self.journal.is_empty()
    }

    pub fn discard_changes(&mut self) {
        self.journal.clear();
    }

    /// Current rows as a table for bulk export
    pub fn to_export(&self) -> ExportTable {
        let rows = self.rows().into_iter().map(|(_, row)| row.clone()).collect();
        ExportTable::new(self.shape.clone(), rows)
    }

    fn saved_row(&self, id: RowId) -> Option<&Row> {
        self.index
            .get(&id)
            .and_then(|i| self.saved.get(*i))
            .map(|(_, row)| row)
    }

    fn unknown_column(&self, names: &[&str]) -> EngineError {
        let missing = names
            .iter()
            .find(|n| self.shape.column(n).is_none())
            .map_or_else(String::new, |n| n.to_string());
        EngineError::UnknownColumn(missing)
    }
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
