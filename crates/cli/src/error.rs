// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors with context and suggestions

use sheetsync_engine::EngineError;
use sheetsync_storage::{FlushError, LoadError};
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for display
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn database_missing(path: &Path) -> Self {
        CliError::new(format!("database '{}' not found", path.display()))
            .with_suggestion("Check the path; sheetsync does not create databases it reads from")
    }

    pub fn no_such_table(db: &Path, table: &str) -> Self {
        CliError::new(format!("table '{}' not found", table))
            .with_context(format!("database: {}", db.display()))
            .with_suggestion(format!("List tables: sheetsync tables {}", db.display()))
    }

    pub fn no_match(table: &str, clause: &str, matched: usize) -> Self {
        CliError::new(format!(
            "where {} matched {} rows of '{}', expected exactly one",
            clause, matched, table
        ))
        .with_suggestion("Add key columns to the where clause to single out one row")
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {}

/// Attach store context to an engine error
pub fn explain(err: EngineError, db: &Path) -> anyhow::Error {
    match err {
        EngineError::Load(LoadError::NoSuchTable(table)) => CliError::no_such_table(db, &table).into(),
        EngineError::Flush(FlushError::Statement { sql, source }) => {
            CliError::new(format!("statement failed: {}", source))
                .with_context(sql)
                .with_context("the transaction was rolled back; nothing was written")
                .into()
        }
        EngineError::Busy { table } => CliError::new(format!("table '{}' is busy", table))
            .with_context("another flush or reload of this table is in flight")
            .with_suggestion("Retry once it finishes")
            .into(),
        other => anyhow::Error::new(other).context(format!("database: {}", db.display())),
    }
}

/// Render any error for stderr
pub fn render(err: &anyhow::Error) -> String {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.to_string().trim_end().to_string();
    }
    let mut out = format!("error: {}", err);
    for cause in err.chain().skip(1) {
        out.push_str(&format!("\n  -> {}", cause));
    }
    out
}
