// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed Value Resolver
//!
//! Turns cell values into primitives the store accepts. An unresolved cell
//! becomes the configured sentinel instead of failing the write.

use crate::column::{Column, ColumnType};
use crate::config::SyncConfig;
use crate::row::Row;
use crate::value::{CellValue, Primitive, Unresolved};

static MISSING: CellValue = CellValue::Unresolved(Unresolved::Missing);

/// Resolves cells to store primitives, substituting a sentinel for
/// unresolved values
#[derive(Debug, Clone, PartialEq)]
pub struct Resolver {
    sentinel: Primitive,
}

impl Resolver {
    pub fn new(config: &SyncConfig) -> Self {
        Self::with_sentinel(Primitive::Text(config.safe_error.clone()))
    }

    pub fn with_sentinel(sentinel: Primitive) -> Self {
        Self { sentinel }
    }

    pub fn sentinel(&self) -> &Primitive {
        &self.sentinel
    }

    /// Value of `column` in `row`, coerced to the column's declared type
    pub fn resolve(&self, row: &Row, column: &Column) -> Primitive {
        let cell = row.get(column.ordinal).unwrap_or(&MISSING);
        match cell {
            CellValue::Value(value) => coerce(value, column.declared_type),
            CellValue::Unresolved(reason) => {
                tracing::warn!(
                    column = %column.name,
                    %reason,
                    "unresolved value, writing sentinel"
                );
                self.sentinel.clone()
            }
        }
    }

    /// Resolve several columns, preserving column order
    pub fn resolve_many(&self, row: &Row, columns: &[&Column]) -> Vec<Primitive> {
        columns.iter().map(|c| self.resolve(row, c)).collect()
    }

    /// A saved value as-is, for identity predicates.
    ///
    /// Saved values come from the store, so they are not coerced; only an
    /// unresolved one is replaced by the sentinel.
    pub fn resolve_saved(&self, row: &Row, column: &Column) -> Primitive {
        match row.get(column.ordinal).unwrap_or(&MISSING) {
            CellValue::Value(value) => value.clone(),
            CellValue::Unresolved(_) => self.sentinel.clone(),
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(&SyncConfig::default())
    }
}

/// Coerce a primitive to a declared column type.
///
/// Values that do not convert cleanly pass through unchanged and are left to
/// the store's own type affinity.
pub fn coerce(value: &Primitive, declared_type: ColumnType) -> Primitive {
    match (declared_type, value) {
        (ColumnType::Integer, Primitive::Real(r)) if is_integral(*r) => {
            Primitive::Integer(*r as i64)
        }
        (ColumnType::Integer, Primitive::Text(s)) => match s.trim().parse::<i64>() {
            Ok(i) => Primitive::Integer(i),
            Err(_) => value.clone(),
        },
        (ColumnType::Real, Primitive::Integer(i)) => Primitive::Real(*i as f64),
        (ColumnType::Real, Primitive::Text(s)) => match s.trim().parse::<f64>() {
            Ok(r) if r.is_finite() => Primitive::Real(r),
            _ => value.clone(),
        },
        (ColumnType::Text, Primitive::Integer(i)) => Primitive::Text(i.to_string()),
        (ColumnType::Text, Primitive::Real(r)) => Primitive::Text(real_text(*r)),
        _ => value.clone(),
    }
}

/// Render a real the way SQLite's text affinity does: integral values keep `.0`
fn real_text(r: f64) -> String {
    if r.fract() == 0.0 && r.abs() < 1e15 {
        format!("{:.1}", r)
    } else {
        r.to_string()
    }
}

fn is_integral(r: f64) -> bool {
    r.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&r)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
