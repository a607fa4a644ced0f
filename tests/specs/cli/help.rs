//! Help and version specs

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    Workspace::empty()
        .sheetsync()
        .args(&["--help"])
        .passes()
        .stdout_has("journal edits to SQLite tables")
        .stdout_has("tables")
        .stdout_has("show")
        .stdout_has("apply")
        .stdout_has("copy");
}

#[test]
fn version_names_the_binary() {
    Workspace::empty()
        .sheetsync()
        .args(&["--version"])
        .passes()
        .stdout_has("sheetsync");
}

#[test]
fn apply_help_mentions_dry_run() {
    Workspace::empty()
        .sheetsync()
        .args(&["apply", "--help"])
        .passes()
        .stdout_has("--dry-run");
}
