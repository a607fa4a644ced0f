//! `sheetsync tables` specs

use crate::prelude::*;

#[test]
fn tables_lists_tables_and_views_with_counts() {
    let ws = Workspace::empty();
    ws.db(
        "shop.db",
        &format!("{PEOPLE}{TAGS}CREATE INDEX people_name ON people (name); CREATE VIEW named AS SELECT name FROM people;"),
    );

    let run = ws.sheetsync().args(&["tables", "shop.db"]).passes();

    let lines: Vec<String> = run
        .stdout()
        .lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();
    assert_eq!(lines, vec!["named view 3", "people table 3", "tags table 2"]);
}

#[test]
fn empty_database_says_so() {
    let ws = Workspace::empty();
    ws.db("empty.db", "PRAGMA user_version = 1;");

    ws.sheetsync()
        .args(&["tables", "empty.db"])
        .passes()
        .stdout_eq("No tables");
}

#[test]
fn tables_as_json() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);

    let json = ws
        .sheetsync()
        .args(&["--format", "json", "tables", "shop.db"])
        .passes()
        .json();

    assert_eq!(json[0]["name"], "people");
    assert_eq!(json[0]["kind"], "table");
    assert_eq!(json[0]["rows"], 3);
}
