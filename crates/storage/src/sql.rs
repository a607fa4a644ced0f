// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SQL statement construction
//!
//! Every value travels as a positional parameter; only identifiers are
//! spliced into the text, and always quoted.

use sheetsync_adapters::quote_ident;
use sheetsync_core::{Column, Primitive};
use std::fmt;

/// Statement text plus its positional parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Primitive>,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// `INSERT INTO "t" ("a","b") VALUES (?,?)`
pub fn insert(table: &str, columns: &[&Column], values: Vec<Primitive>) -> Statement {
    if columns.is_empty() {
        return Statement {
            sql: format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table)),
            params: Vec::new(),
        };
    }
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    let marks = vec!["?"; columns.len()].join(",");
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table),
            names.join(","),
            marks
        ),
        params: values,
    }
}

/// `UPDATE "t" SET "a"=?, "b"=? WHERE <identity>`
pub fn update(
    table: &str,
    set: &[&Column],
    values: Vec<Primitive>,
    identity: &[(&Column, Primitive)],
) -> Statement {
    let assignments: Vec<String> = set
        .iter()
        .map(|c| format!("{}=?", quote_ident(&c.name)))
        .collect();
    let mut params = values;
    let predicate = predicate(identity, &mut params);
    Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {}",
            quote_ident(table),
            assignments.join(", "),
            predicate
        ),
        params,
    }
}

/// `DELETE FROM "t" WHERE <identity>`
pub fn delete(table: &str, identity: &[(&Column, Primitive)]) -> Statement {
    let mut params = Vec::new();
    let predicate = predicate(identity, &mut params);
    Statement {
        sql: format!("DELETE FROM {} WHERE {}", quote_ident(table), predicate),
        params,
    }
}

/// `CREATE TABLE IF NOT EXISTS "t" ("a" INTEGER, "b" TEXT)`
pub fn create_table(table: &str, columns: &[&Column]) -> Statement {
    let definitions: Vec<String> = columns
        .iter()
        .map(|c| {
            format!(
                "{} {}",
                quote_ident(&c.name),
                c.declared_type.store_name()
            )
        })
        .collect();
    Statement {
        sql: format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(table),
            definitions.join(", ")
        ),
        params: Vec::new(),
    }
}

/// `SELECT * FROM "t"`
pub fn select_all(table: &str) -> String {
    format!("SELECT * FROM {}", quote_ident(table))
}

/// `"k"=? AND ...`; a null value becomes `"k" IS NULL` since `=` never
/// matches null
fn predicate(identity: &[(&Column, Primitive)], params: &mut Vec<Primitive>) -> String {
    identity
        .iter()
        .map(|(column, value)| {
            if value.is_null() {
                format!("{} IS NULL", quote_ident(&column.name))
            } else {
                params.push(value.clone());
                format!("{}=?", quote_ident(&column.name))
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
#[path = "sql_tests.rs"]
mod tests;
