// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Column/Key Model
//!
//! A [`TableShape`] is the ordered column list of one table plus the flags
//! that decide row identity. Identity predicates for UPDATE and DELETE are
//! always built from [`TableShape::key_columns`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building or editing a table shape
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),
    #[error("unknown column: {0}")]
    UnknownColumn(String),
}

/// Declared type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Real,
    Text,
    Blob,
    Dynamic,
}

impl ColumnType {
    /// Map a store type name (case-insensitive) to a declared type
    pub fn from_store_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "INTEGER" => ColumnType::Integer,
            "REAL" => ColumnType::Real,
            "TEXT" => ColumnType::Text,
            "BLOB" => ColumnType::Blob,
            _ => ColumnType::Dynamic,
        }
    }

    /// Store type used when creating a table for this column
    pub fn store_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
            ColumnType::Text | ColumnType::Blob | ColumnType::Dynamic => "TEXT",
        }
    }
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Position in the row; stable for the lifetime of the view
    pub ordinal: usize,
    pub declared_type: ColumnType,
    pub is_key: bool,
    pub hidden: bool,
}

impl Column {
    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}

/// Name and ordered columns of a backing table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableShape {
    name: String,
    columns: Vec<Column>,
}

impl TableShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Build a shape from `(name, type)` pairs in ordinal order
    pub fn from_columns<'a>(
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (&'a str, ColumnType)>,
    ) -> Result<Self, ShapeError> {
        let mut shape = Self::new(name);
        for (column, ty) in columns {
            shape.push_column(column, ty)?;
        }
        Ok(shape)
    }

    /// Append a column, returning its ordinal
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        declared_type: ColumnType,
    ) -> Result<usize, ShapeError> {
        let name = name.into();
        if self.column(&name).is_some() {
            return Err(ShapeError::DuplicateColumn(name));
        }
        let ordinal = self.columns.len();
        self.columns.push(Column {
            name,
            ordinal,
            declared_type,
            is_key: false,
            hidden: false,
        });
        Ok(ordinal)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_at(&self, ordinal: usize) -> Option<&Column> {
        self.columns.get(ordinal)
    }

    /// Replace the declared key set with the named columns
    pub fn set_keys(&mut self, names: &[&str]) -> Result<(), ShapeError> {
        if let Some(missing) = names.iter().find(|n| self.column(n).is_none()) {
            return Err(ShapeError::UnknownColumn((*missing).to_string()));
        }
        for column in &mut self.columns {
            column.is_key = names.contains(&column.name.as_str());
        }
        Ok(())
    }

    /// Flag one more column as part of the declared key
    pub fn add_key(&mut self, name: &str) -> Result<(), ShapeError> {
        let column = self.column_mut(name)?;
        column.is_key = true;
        Ok(())
    }

    pub fn set_hidden(&mut self, name: &str, hidden: bool) -> Result<(), ShapeError> {
        let column = self.column_mut(name)?;
        column.hidden = hidden;
        Ok(())
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_visible()).collect()
    }

    pub fn declared_keys(&self) -> Vec<&Column> {
        self.columns.iter().filter(|c| c.is_key).collect()
    }

    /// Columns that identify a row in the store.
    ///
    /// Declared keys when there are any, otherwise every visible column. In
    /// the fallback case rows with identical visible values are
    /// indistinguishable: a predicate may match several store rows, or none.
    pub fn key_columns(&self) -> Vec<&Column> {
        let declared = self.declared_keys();
        if declared.is_empty() {
            self.visible_columns()
        } else {
            declared
        }
    }

    fn column_mut(&mut self, name: &str) -> Result<&mut Column, ShapeError> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| ShapeError::UnknownColumn(name.to_string()))
    }
}

#[cfg(test)]
#[path = "column_tests.rs"]
mod tests;
