//! `sheetsync show` specs

use crate::prelude::*;

#[test]
fn show_marks_key_columns_and_prints_rows() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);

    ws.sheetsync()
        .args(&["show", "shop.db", "people"])
        .passes()
        .stdout_eq(
            "id*  name  score
5    x     1.5
6    w
7    v     3
(3 of 3 rows)",
        );
}

#[test]
fn show_limit_truncates_rows() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);

    ws.sheetsync()
        .args(&["show", "shop.db", "people", "--limit", "1"])
        .passes()
        .stdout_has("(1 of 3 rows)")
        .stdout_lacks("7    v");
}

#[test]
fn show_without_primary_key_marks_nothing() {
    let ws = Workspace::empty();
    ws.db("shop.db", TAGS);

    ws.sheetsync()
        .args(&["show", "shop.db", "tags"])
        .passes()
        .stdout_has("label  weight")
        .stdout_lacks("*");
}

#[test]
fn show_as_json() {
    let ws = Workspace::empty();
    ws.db("shop.db", PEOPLE);

    let json = ws
        .sheetsync()
        .args(&["--format", "json", "show", "shop.db", "people"])
        .passes()
        .json();

    assert_eq!(json["table"], "people");
    assert_eq!(json["columns"][0]["key"], true);
    assert_eq!(json["columns"][1]["type"], "text");
    assert_eq!(json["rows"][0][1], "x");
    assert!(json["rows"][1][2].is_null());
    assert_eq!(json["total"], 3);
}
