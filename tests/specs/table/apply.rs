//! `sheetsync apply` specs
//!
//! Edits are journaled against the loaded rows and flushed in one
//! transaction.

use crate::prelude::*;
use similar_asserts::assert_eq;

const MIXED: &str = r#"{
    "add": [{"id": 8, "name": "u"}],
    "set": [{"where": {"id": 5}, "values": {"name": "y"}}],
    "delete": [{"where": {"id": 6}}]
}"#;

fn people(ws: &Workspace) -> Vec<Vec<String>> {
    ws.query(&ws.path("shop.db"), "SELECT id, name, score FROM people ORDER BY id")
}

#[test]
fn apply_writes_adds_sets_and_deletes() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file("edits.json", MIXED);

    ws.sheetsync()
        .args(&["apply", "shop.db", "people", "edits.json"])
        .passes()
        .stdout_has("Applied to people: 1 inserted, 1 updated, 1 deleted (3 rows affected)");

    assert_eq!(
        people(&ws),
        vec![
            row(&["5", "y", "1.5"]),
            row(&["7", "v", "3"]),
            row(&["8", "u", "NULL"]),
        ]
    );
}

#[test]
fn editing_the_key_updates_the_original_row() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file(
        "edits.json",
        r#"{"set": [{"where": {"id": 5}, "values": {"id": 50, "name": "moved"}}]}"#,
    );

    ws.sheetsync()
        .args(&["apply", "shop.db", "people", "edits.json"])
        .passes();

    assert_eq!(
        people(&ws),
        vec![
            row(&["6", "w", "NULL"]),
            row(&["7", "v", "3"]),
            row(&["50", "moved", "1.5"]),
        ]
    );
}

#[test]
fn dry_run_prints_statements_and_writes_nothing() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file("edits.json", MIXED);

    ws.sheetsync()
        .args(&["apply", "--dry-run", "shop.db", "people", "edits.json"])
        .passes()
        .stdout_eq(
            r#"INSERT INTO "people" ("id","name","score") VALUES (?,?,?); -- [8, 'u', NULL]
UPDATE "people" SET "name"=? WHERE "id"=?; -- ['y', 5]
DELETE FROM "people" WHERE "id"=?; -- [6]"#,
        );

    assert_eq!(people(&ws).len(), 3);
}

#[test]
fn failed_statement_rolls_back_the_whole_flush() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file(
        "edits.json",
        r#"{"add": [{"id": 9}], "delete": [{"where": {"id": 7}}]}"#,
    );

    ws.sheetsync()
        .args(&["apply", "shop.db", "people", "edits.json"])
        .fails()
        .stderr_has("NOT NULL")
        .stderr_has("rolled back");

    assert_eq!(people(&ws).len(), 3);
}

#[test]
fn where_must_match_exactly_one_row() {
    let ws = Workspace::empty();
    ws.db("shop.db", &format!("{PEOPLE}UPDATE people SET score = 1.5;"));
    ws.file(
        "edits.json",
        r#"{"delete": [{"where": {"score": 1.5}}]}"#,
    );

    ws.sheetsync()
        .args(&["apply", "shop.db", "people", "edits.json"])
        .fails()
        .stderr_has("matched 3 rows");

    assert_eq!(people(&ws).len(), 3);
}

#[test]
fn keyless_table_is_matched_on_visible_columns() {
    let ws = Workspace::empty();
    ws.db("shop.db", TAGS);
    ws.file(
        "edits.json",
        r#"{"set": [{"where": {"label": "a"}, "values": {"weight": 9}}]}"#,
    );

    ws.sheetsync()
        .args(&["apply", "shop.db", "tags", "edits.json"])
        .passes()
        .stdout_has("1 updated");

    assert_eq!(
        ws.query(&ws.path("shop.db"), "SELECT label, weight FROM tags ORDER BY label"),
        vec![row(&["a", "9"]), row(&["b", "2"])]
    );
}

#[test]
fn generated_sql_is_echoed_unless_disabled() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file("edits.json", r#"{"add": [{"id": 8, "name": "u"}]}"#);
    ws.file("quiet.toml", "echo_sql = false\n");

    ws.sheetsync()
        .args(&["apply", "shop.db", "people", "edits.json"])
        .passes()
        .stderr_has(r#"INSERT INTO "people""#);

    ws.file("edits.json", r#"{"add": [{"id": 9, "name": "t"}]}"#);
    ws.sheetsync()
        .args(&["--config", "quiet.toml", "apply", "shop.db", "people", "edits.json"])
        .passes()
        .stderr_lacks(r#"INSERT INTO "people""#);
}

#[test]
fn apply_report_as_json() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);
    ws.file("edits.json", MIXED);

    let json = ws
        .sheetsync()
        .args(&["--format", "json", "apply", "shop.db", "people", "edits.json"])
        .passes()
        .json();

    assert_eq!(json["inserted"], serde_json::json!(1));
    assert_eq!(json["updated"], serde_json::json!(1));
    assert_eq!(json["deleted"], serde_json::json!(1));
    assert_eq!(json["rows_affected"], serde_json::json!(3));
}
