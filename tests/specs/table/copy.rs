//! `sheetsync copy` specs

use crate::prelude::*;
use similar_asserts::assert_eq;

#[test]
fn copy_exports_every_table() {
    let ws = Workspace::empty();
    ws.db("shop.db", &format!("{PEOPLE}{TAGS}"));

    ws.sheetsync()
        .args(&["copy", "shop.db", "backup.db"])
        .passes()
        .stdout_has("Copied 2 tables (5 rows)");

    let backup = ws.path("backup.db");
    assert_eq!(
        ws.query(&backup, "SELECT name FROM sqlite_master ORDER BY name"),
        vec![row(&["people"]), row(&["tags"])]
    );
    assert_eq!(
        ws.query(&backup, "SELECT id, name FROM people ORDER BY id"),
        vec![row(&["5", "x"]), row(&["6", "w"]), row(&["7", "v"])]
    );
}

#[test]
fn copy_selected_tables_only() {
    let ws = Workspace::empty();
    ws.db("shop.db", &format!("{PEOPLE}{TAGS}"));

    ws.sheetsync()
        .args(&["copy", "shop.db", "backup.db", "--table", "tags"])
        .passes()
        .stdout_has(": tags");

    assert_eq!(
        ws.query(&ws.path("backup.db"), "SELECT name FROM sqlite_master"),
        vec![row(&["tags"])]
    );
}

#[test]
fn copy_cleans_table_names() {
    let ws = Workspace::empty();
    ws.db(
        "shop.db",
        r#"CREATE TABLE "high scores" (player TEXT, points INTEGER);
           INSERT INTO "high scores" VALUES ('ann', 10);"#,
    );

    ws.sheetsync()
        .args(&["copy", "shop.db", "backup.db"])
        .passes()
        .stdout_has("high_scores");

    assert_eq!(
        ws.query(&ws.path("backup.db"), "SELECT player, points FROM high_scores"),
        vec![row(&["ann", "10"])]
    );
}
