// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod apply;
pub mod copy;
pub mod show;
pub mod tables;

use crate::error::CliError;
use std::path::Path;

/// Databases are only created by `copy`; reading a missing file is an error
pub(crate) fn require_database(path: &Path) -> Result<(), CliError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(CliError::database_missing(path))
    }
}
