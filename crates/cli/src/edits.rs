// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Edit scripts for `sheetsync apply`
//!
//! ```json
//! {
//!   "add": [{"id": 7, "name": "gus"}],
//!   "set": [{"where": {"id": 5}, "values": {"name": "y"}}],
//!   "delete": [{"where": {"id": 6}}]
//! }
//! ```
//!
//! Every `where` is matched against the rows as loaded, before any edit of
//! the script is applied, and must single out exactly one row.

use crate::error::CliError;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use sheetsync_core::{Primitive, Row, RowId};
use sheetsync_engine::TableView;
use std::collections::BTreeSet;
use std::path::Path;

type Fields = Map<String, Value>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditScript {
    #[serde(default)]
    pub add: Vec<Fields>,
    #[serde(default)]
    pub set: Vec<SetEdit>,
    #[serde(default)]
    pub delete: Vec<DeleteEdit>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetEdit {
    #[serde(rename = "where")]
    pub filter: Fields,
    pub values: Fields,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeleteEdit {
    #[serde(rename = "where")]
    pub filter: Fields,
}

impl EditScript {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read edit script {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid edit script {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Journal the script's edits on `view`.
    ///
    /// Nothing is journaled unless every `where` resolves and every column
    /// exists.
    pub fn apply(&self, view: &mut TableView) -> Result<()> {
        let targets = self
            .set
            .iter()
            .map(|edit| locate(view, &edit.filter))
            .collect::<Result<Vec<_>>>()?;
        let doomed = self
            .delete
            .iter()
            .map(|edit| locate(view, &edit.filter))
            .collect::<Result<Vec<_>>>()?;

        let unique: BTreeSet<RowId> = doomed.iter().copied().collect();
        if unique.len() != doomed.len() {
            bail!("two delete clauses match the same row");
        }

        let mut rows = Vec::with_capacity(self.add.len());
        for fields in &self.add {
            rows.push(build_row(view, fields)?);
        }
        for edit in &self.set {
            for name in edit.values.keys() {
                column_ordinal(view, name)?;
            }
        }

        let mut staged = view.clone();
        for row in rows {
            staged.add_row(row);
        }
        for (edit, id) in self.set.iter().zip(&targets) {
            for (name, value) in &edit.values {
                staged.set_cell(*id, name, to_primitive(name, value)?)?;
            }
        }
        for id in doomed {
            staged.delete_row(id)?;
        }

        *view = staged;
        Ok(())
    }
}

/// The single row whose columns equal every field of `filter`
fn locate(view: &TableView, filter: &Fields) -> Result<RowId> {
    if filter.is_empty() {
        bail!("empty where clause");
    }

    let mut matches: Option<BTreeSet<RowId>> = None;
    for (name, value) in filter {
        let found: BTreeSet<RowId> = view
            .find(name, &to_primitive(name, value)?)?
            .into_iter()
            .collect();
        matches = Some(match matches {
            None => found,
            Some(prev) => prev.intersection(&found).copied().collect(),
        });
    }

    let matches = matches.unwrap_or_default();
    match matches.iter().next() {
        Some(id) if matches.len() == 1 => Ok(*id),
        _ => Err(CliError::no_match(view.name(), &Value::Object(filter.clone()).to_string(), matches.len()).into()),
    }
}

fn build_row(view: &TableView, fields: &Fields) -> Result<Row> {
    let mut values = vec![Primitive::Null; view.shape().len()];
    for (name, value) in fields {
        let ordinal = column_ordinal(view, name)?;
        values[ordinal] = to_primitive(name, value)?;
    }
    Ok(Row::from_primitives(values))
}

fn column_ordinal(view: &TableView, name: &str) -> Result<usize> {
    match view.shape().column(name) {
        Some(column) => Ok(column.ordinal),
        None => bail!("unknown column '{}' in table '{}'", name, view.name()),
    }
}

/// JSON scalar to store primitive; booleans become 0/1
pub fn to_primitive(name: &str, value: &Value) -> Result<Primitive> {
    Ok(match value {
        Value::Null => Primitive::Null,
        Value::Bool(b) => Primitive::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Primitive::Integer(i),
            None => match n.as_f64() {
                Some(f) => Primitive::Real(f),
                None => bail!("number out of range for column '{}'", name),
            },
        },
        Value::String(s) => Primitive::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => {
            bail!("column '{}' needs a scalar value", name)
        }
    })
}

#[cfg(test)]
#[path = "edits_tests.rs"]
mod tests;
