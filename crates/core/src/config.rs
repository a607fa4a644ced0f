// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sync configuration
//!
//! Passed explicitly to the loader, the reconciliation engine and the
//! resolver. Read from TOML; every field has a default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Written in place of a cell whose value could not be computed
    pub safe_error: String,
    /// How long a connection waits on a locked database
    #[serde(with = "humantime_serde")]
    pub busy_timeout: Duration,
    /// Send each generated statement to the status sink
    pub echo_sql: bool,
    /// Loader progress granularity, in rows
    pub progress_every: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            safe_error: "#ERR".to_string(),
            busy_timeout: Duration::from_secs(5),
            echo_sql: true,
            progress_every: 1000,
        }
    }
}

impl SyncConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
