//! Shared helpers for CLI specs

#![allow(dead_code)]

use assert_cmd::Command;
use similar_asserts::assert_eq;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

/// People table with a declared integer key
pub const PEOPLE: &str = "
CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL);
INSERT INTO people VALUES (5, 'x', 1.5), (6, 'w', NULL), (7, 'v', 3.0);
";

/// Table without a primary key
pub const TAGS: &str = "
CREATE TABLE tags (label TEXT, weight INTEGER);
INSERT INTO tags VALUES ('a', 1), ('b', 2);
";

/// Scratch directory holding databases and edit scripts
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Create a database `name` initialised with `sql`
    pub fn db(&self, name: &str, sql: &str) -> PathBuf {
        let path = self.path(name);
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch(sql)
            .unwrap();
        path
    }

    pub fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Rows of `sql` against `db`, every value rendered as text
    pub fn query(&self, db: &Path, sql: &str) -> Vec<Vec<String>> {
        let conn = rusqlite::Connection::open(db).unwrap();
        let mut stmt = conn.prepare(sql).unwrap();
        let width = stmt.column_count();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|i| -> rusqlite::Result<String> {
                        let value: rusqlite::types::Value = row.get(i)?;
                        Ok(match value {
                            rusqlite::types::Value::Null => "NULL".to_string(),
                            rusqlite::types::Value::Integer(i) => i.to_string(),
                            rusqlite::types::Value::Real(r) => r.to_string(),
                            rusqlite::types::Value::Text(s) => s,
                            rusqlite::types::Value::Blob(b) => format!("<{} bytes>", b.len()),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        rows
    }

    pub fn sheetsync(&self) -> Cli {
        let mut cmd = Command::cargo_bin("sheetsync").unwrap();
        cmd.current_dir(self.dir.path()).env_remove("RUST_LOG");
        Cli { cmd }
    }
}

/// Pending CLI invocation
pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args<S: AsRef<std::ffi::OsStr>>(mut self, args: &[S]) -> Self {
        self.cmd.args(args);
        self
    }

    /// Run and require a zero exit status
    pub fn passes(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(
            run.output.status.success(),
            "expected success\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }

    /// Run and require a non-zero exit status
    pub fn fails(mut self) -> Run {
        let output = self.cmd.output().unwrap();
        let run = Run { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout:\n{}",
            run.stdout()
        );
        run
    }
}

/// Finished CLI invocation
pub struct Run {
    output: Output,
}

impl Run {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain {:?}:\n{}",
            expected,
            stdout
        );
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout unexpectedly contains {:?}:\n{}",
            unexpected,
            stdout
        );
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain {:?}:\n{}",
            expected,
            stderr
        );
        self
    }

    pub fn stderr_lacks(self, unexpected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            !stderr.contains(unexpected),
            "stderr unexpectedly contains {:?}:\n{}",
            unexpected,
            stderr
        );
        self
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        assert_eq!(self.stdout().trim_end(), expected.trim_end());
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).unwrap()
    }
}

/// Strings from string literals, for comparing query results
pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}
