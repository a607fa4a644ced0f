//! Error reporting specs
//!
//! Failures print a readable message to stderr and exit non-zero.

use crate::prelude::*;

#[test]
fn missing_database_is_not_created() {
    let ws = Workspace::empty();

    ws.sheetsync()
        .args(&["tables", "nope.db"])
        .fails()
        .stderr_has("database 'nope.db' not found");

    assert!(!ws.path("nope.db").exists());
}

#[test]
fn missing_table_suggests_listing_tables() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);

    ws.sheetsync()
        .args(&["show", "shop.db", "ghost"])
        .fails()
        .stderr_has("table 'ghost' not found")
        .stderr_has("sheetsync tables shop.db");
}

#[test]
fn malformed_edit_script_is_rejected() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file("edits.json", r#"{"add": "#);

    ws.sheetsync()
        .args(&["apply", "shop.db", "people", "edits.json"])
        .fails()
        .stderr_has("invalid edit script");
}

#[test]
fn unreadable_config_is_reported() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file("sheetsync.toml", "echo_sql = \"maybe\"");

    ws.sheetsync()
        .args(&["--config", "sheetsync.toml", "tables", "shop.db"])
        .fails()
        .stderr_has("error:");
}
