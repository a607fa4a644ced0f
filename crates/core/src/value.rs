// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cell values and store primitives

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A value the backing store accepts as a statement parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    /// Text cell whose bytes are not valid UTF-8, kept verbatim so it can be
    /// bound back and compared byte for byte
    #[serde(serialize_with = "lossy_text", skip_deserializing)]
    RawText(Vec<u8>),
}

fn lossy_text<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(bytes))
}

impl Primitive {
    pub fn is_null(&self) -> bool {
        matches!(self, Primitive::Null)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Null => Ok(()),
            Primitive::Integer(i) => write!(f, "{}", i),
            Primitive::Real(r) => write!(f, "{}", r),
            Primitive::Text(s) => f.write_str(s),
            Primitive::RawText(b) => f.write_str(&String::from_utf8_lossy(b)),
            Primitive::Blob(b) => write!(f, "<blob {} bytes>", b.len()),
        }
    }
}

impl From<i64> for Primitive {
    fn from(value: i64) -> Self {
        Primitive::Integer(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Primitive::Real(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::Text(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::Text(value)
    }
}

impl From<Vec<u8>> for Primitive {
    fn from(value: Vec<u8>) -> Self {
        Primitive::Blob(value)
    }
}

impl<T: Into<Primitive>> From<Option<T>> for Primitive {
    fn from(value: Option<T>) -> Self {
        value.map_or(Primitive::Null, Into::into)
    }
}

/// Why a cell has no concrete value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unresolved {
    #[error("computation failed: {0}")]
    Failed(String),
    #[error("value missing")]
    Missing,
}

/// The logical value of one cell: concrete, or unresolved with a reason
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Value(Primitive),
    Unresolved(Unresolved),
}

impl CellValue {
    /// A cell whose computation failed
    pub fn failed(reason: impl Into<String>) -> Self {
        CellValue::Unresolved(Unresolved::Failed(reason.into()))
    }

    pub fn null() -> Self {
        CellValue::Value(Primitive::Null)
    }

    /// The concrete value, if there is one
    pub fn as_primitive(&self) -> Option<&Primitive> {
        match self {
            CellValue::Value(v) => Some(v),
            CellValue::Unresolved(_) => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, CellValue::Unresolved(_))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Value(v) => v.fmt(f),
            CellValue::Unresolved(reason) => write!(f, "<{}>", reason),
        }
    }
}

impl From<Primitive> for CellValue {
    fn from(value: Primitive) -> Self {
        CellValue::Value(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Value(Primitive::Integer(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Value(Primitive::Real(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Value(Primitive::Text(value.to_string()))
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Value(Primitive::Text(value))
    }
}

impl From<Unresolved> for CellValue {
    fn from(reason: Unresolved) -> Self {
        CellValue::Unresolved(reason)
    }
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
