// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory rows

use crate::column::TableShape;
use crate::value::{CellValue, Primitive};

/// Ordered cell values, one per column ordinal
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<CellValue>,
}

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self { cells }
    }

    /// A row of concrete values, as read from the store
    pub fn from_primitives(values: impl IntoIterator<Item = Primitive>) -> Self {
        Self {
            cells: values.into_iter().map(CellValue::Value).collect(),
        }
    }

    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, ordinal: usize) -> Option<&CellValue> {
        self.cells.get(ordinal)
    }

    pub fn by_name(&self, shape: &TableShape, name: &str) -> Option<&CellValue> {
        shape.column(name).and_then(|c| self.get(c.ordinal))
    }

    /// Overwrite one cell. Returns false when the ordinal is out of range.
    pub fn set(&mut self, ordinal: usize, value: CellValue) -> bool {
        match self.cells.get_mut(ordinal) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Extend with nulls up to `width` cells
    pub fn pad_to(&mut self, width: usize) {
        if self.cells.len() < width {
            self.cells.resize(width, CellValue::null());
        }
    }
}

impl From<Vec<CellValue>> for Row {
    fn from(cells: Vec<CellValue>) -> Self {
        Self::new(cells)
    }
}
