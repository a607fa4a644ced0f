// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::load;
use sheetsync_adapters::{FakeDriver, FakeReporter, NoOpReporter, SqliteDriver, StoreCall};
use sheetsync_core::{CellValue, ColumnType, RowIdGen};
use tempfile::TempDir;

fn people() -> TableShape {
    let mut shape = TableShape::from_columns(
        "people",
        [("id", ColumnType::Integer), ("name", ColumnType::Text)],
    )
    .unwrap();
    shape.set_keys(&["id"]).unwrap();
    shape
}

fn row(id: i64, name: &str) -> Row {
    Row::from_primitives([Primitive::Integer(id), Primitive::from(name)])
}

fn quiet() -> SyncConfig {
    SyncConfig {
        echo_sql: false,
        ..SyncConfig::default()
    }
}

fn sqlite(dir: &TempDir, setup: &str) -> SqliteDriver {
    let path = dir.path().join("test.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(setup).unwrap();
    SqliteDriver::new(path)
}

fn dump(driver: &SqliteDriver, sql: &str) -> Vec<Vec<Primitive>> {
    let mut conn = driver.connect().unwrap();
    let mut rows = Vec::new();
    conn.query(sql, &[], &mut |r: Vec<Primitive>| -> Result<(), StoreError> {
        rows.push(r);
        Ok(())
    })
    .unwrap();
    rows
}

// plan

#[test]
fn plan_orders_adds_then_mods_then_dels() {
    let shape = people();
    let name = shape.column("name").unwrap().clone();
    let mut journal = EditJournal::new(RowIdGen::new());

    journal.record_deletion(RowId(100), row(3, "gone"));
    journal
        .record_modification(RowId(101), &row(2, "old"), &name, "new".into())
        .unwrap();
    journal.record_add(row(9, "fresh"));

    let planned = plan(&shape, &journal, &Resolver::default()).unwrap();
    let kinds: Vec<StatementKind> = planned.iter().map(|p| p.kind).collect();

    assert_eq!(
        kinds,
        vec![StatementKind::Insert, StatementKind::Update, StatementKind::Delete]
    );
}

#[test]
fn plan_sets_only_changed_columns_and_matches_on_saved_key() {
    let shape = people();
    let id = shape.column("id").unwrap().clone();
    let mut journal = EditJournal::new(RowIdGen::new());

    journal
        .record_modification(RowId(7), &row(5, "x"), &id, 6_i64.into())
        .unwrap();

    let planned = plan(&shape, &journal, &Resolver::default()).unwrap();

    assert_eq!(planned.len(), 1);
    let stmt = &planned[0].statement;
    assert_eq!(stmt.sql, r#"UPDATE "people" SET "id"=? WHERE "id"=?"#);
    assert_eq!(stmt.params, vec![Primitive::Integer(6), Primitive::Integer(5)]);
}

#[test]
fn plan_substitutes_sentinel_for_failed_cells() {
    let shape = people();
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(Row::new(vec![
        CellValue::from(1_i64),
        CellValue::failed("division by zero"),
    ]));

    let planned = plan(&shape, &journal, &Resolver::default()).unwrap();

    assert_eq!(
        planned[0].statement.params,
        vec![Primitive::Integer(1), Primitive::from("#ERR")]
    );
}

#[test]
fn plan_without_identity_columns_fails() {
    let mut shape = people();
    shape.set_keys(&[]).unwrap();
    shape.set_hidden("id", true).unwrap();
    shape.set_hidden("name", true).unwrap();
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_deletion(RowId(1), row(1, "a"));

    let err = plan(&shape, &journal, &Resolver::default()).unwrap_err();
    assert!(matches!(err, FlushError::NoIdentity { ref table } if table == "people"));
}

// flush against the fake store

#[test]
fn empty_journal_does_not_connect() {
    let driver = FakeDriver::new();
    let journal = EditJournal::new(RowIdGen::new());

    let report = flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!(report, FlushReport::default());
    assert!(driver.calls().is_empty());
}

#[test]
fn add_then_delete_issues_no_statement() {
    let driver = FakeDriver::new();
    let mut journal = EditJournal::new(RowIdGen::new());
    let id = journal.record_add(row(1, "a"));
    journal.record_deletion(id, row(1, "a"));

    flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert!(driver.statements().is_empty());
}

#[test]
fn flush_runs_in_one_transaction() {
    let driver = FakeDriver::new();
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(row(1, "a"));
    journal.record_deletion(RowId(50), row(2, "b"));

    let report = flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!(
        driver.calls(),
        vec![
            StoreCall::Connect,
            StoreCall::Begin,
            StoreCall::Execute {
                sql: r#"INSERT INTO "people" ("id","name") VALUES (?,?)"#.to_string(),
                params: vec![Primitive::Integer(1), Primitive::from("a")],
            },
            StoreCall::Execute {
                sql: r#"DELETE FROM "people" WHERE "id"=?"#.to_string(),
                params: vec![Primitive::Integer(2)],
            },
            StoreCall::Commit,
            StoreCall::Close,
        ]
    );
    assert_eq!(report.inserted, 1);
    assert_eq!(report.deleted, 1);
    assert_eq!(report.rows_affected, 2);
}

#[test]
fn failed_statement_rolls_back() {
    let driver = FakeDriver::new().fail_on("DELETE");
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(row(1, "a"));
    journal.record_deletion(RowId(50), row(2, "b"));

    let err = flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap_err();

    assert!(matches!(err, FlushError::Statement { ref sql, .. } if sql.starts_with("DELETE")));
    let calls = driver.calls();
    assert!(calls.contains(&StoreCall::Rollback));
    assert!(!calls.contains(&StoreCall::Commit));
    assert_eq!(calls.last(), Some(&StoreCall::Close));
    assert_eq!(journal.len(), 2);
}

#[test]
fn unmatched_predicates_are_counted() {
    let driver = FakeDriver::new().with_affected(0);
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_deletion(RowId(50), row(2, "b"));

    let report = flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!(report.deleted, 1);
    assert_eq!(report.unmatched, 1);
    assert!(report.to_string().contains("1 unmatched"));
}

#[test]
fn flush_reports_saving_sql_and_saved() {
    let driver = FakeDriver::new();
    let reporter = FakeReporter::new();
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(row(1, "a"));

    flush(&people(), &journal, &driver, &SyncConfig::default(), &reporter).unwrap();

    let statuses = reporter.statuses();
    assert_eq!(statuses.len(), 3);
    assert!(statuses[0].starts_with("saving people"));
    assert!(statuses[1].starts_with("INSERT INTO"));
    assert!(statuses[2].starts_with("saved people"));
}

#[test]
fn echo_can_be_disabled() {
    let driver = FakeDriver::new();
    let reporter = FakeReporter::new();
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(row(1, "a"));

    flush(&people(), &journal, &driver, &quiet(), &reporter).unwrap();

    assert!(reporter.statuses().iter().all(|s| !s.starts_with("INSERT")));
}

// flush against SQLite

#[test]
fn added_rows_reach_the_store() {
    let dir = TempDir::new().unwrap();
    let driver = sqlite(&dir, "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT);");
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(row(1, "a"));
    journal.record_add(row(2, "b"));

    flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!(
        dump(&driver, "SELECT id, name FROM people ORDER BY id"),
        vec![
            vec![Primitive::Integer(1), Primitive::from("a")],
            vec![Primitive::Integer(2), Primitive::from("b")],
        ]
    );
}

#[test]
fn edited_key_is_located_by_its_saved_value() {
    let dir = TempDir::new().unwrap();
    let driver = sqlite(
        &dir,
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT);
         INSERT INTO people VALUES (5, 'x'), (8, 'y');",
    );
    let ids = RowIdGen::new();
    let loaded = load(&driver, "people", &ids, &quiet(), &NoOpReporter).unwrap();
    let (row_id, saved) = loaded.rows[0].clone();
    let id = loaded.shape.column("id").unwrap().clone();
    let name = loaded.shape.column("name").unwrap().clone();

    let mut journal = EditJournal::new(ids);
    journal
        .record_modification(row_id, &saved, &id, 6_i64.into())
        .unwrap();
    journal
        .record_modification(row_id, &saved, &name, "z".into())
        .unwrap();

    let report = flush(&loaded.shape, &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!(report.rows_affected, 1);
    assert_eq!(
        dump(&driver, "SELECT id, name FROM people ORDER BY id"),
        vec![
            vec![Primitive::Integer(6), Primitive::from("z")],
            vec![Primitive::Integer(8), Primitive::from("y")],
        ]
    );
}

#[test]
fn sentinel_is_written_for_failed_cells() {
    let dir = TempDir::new().unwrap();
    let driver = sqlite(&dir, "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT);");
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(Row::new(vec![
        CellValue::from(1_i64),
        CellValue::failed("bad formula"),
    ]));

    flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!(
        dump(&driver, "SELECT name FROM people"),
        vec![vec![Primitive::from("#ERR")]]
    );
}

#[test]
fn constraint_failure_leaves_store_unchanged() {
    let dir = TempDir::new().unwrap();
    let driver = sqlite(
        &dir,
        "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL);
         INSERT INTO people VALUES (1, 'keep');",
    );
    let mut journal = EditJournal::new(RowIdGen::new());
    journal.record_add(row(2, "ok"));
    journal.record_add(Row::from_primitives([Primitive::Integer(3), Primitive::Null]));
    journal.record_deletion(RowId(90), row(1, "keep"));

    let err = flush(&people(), &journal, &driver, &quiet(), &NoOpReporter).unwrap_err();

    assert!(matches!(err, FlushError::Statement { .. }));
    assert_eq!(
        dump(&driver, "SELECT id, name FROM people"),
        vec![vec![Primitive::Integer(1), Primitive::from("keep")]]
    );
}

#[test]
fn keyless_table_matches_on_all_visible_columns() {
    let dir = TempDir::new().unwrap();
    let driver = sqlite(
        &dir,
        "CREATE TABLE tags (label TEXT, weight INTEGER);
         INSERT INTO tags VALUES ('a', 1), ('a', 1), ('b', 2);",
    );
    let ids = RowIdGen::new();
    let loaded = load(&driver, "tags", &ids, &quiet(), &NoOpReporter).unwrap();
    let weight = loaded.shape.column("weight").unwrap().clone();
    let (row_id, saved) = loaded.rows[0].clone();

    let mut journal = EditJournal::new(ids);
    journal
        .record_modification(row_id, &saved, &weight, 9_i64.into())
        .unwrap();

    flush(&loaded.shape, &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    let rows = dump(&driver, "SELECT label, weight FROM tags WHERE weight = 9");
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r[0] == Primitive::from("a")));
    assert_eq!(
        dump(&driver, "SELECT label FROM tags WHERE weight = 2"),
        vec![vec![Primitive::from("b")]]
    );
}

#[test]
fn text_that_is_not_utf8_is_matched_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let driver = sqlite(
        &dir,
        "CREATE TABLE tags (label TEXT, weight INTEGER);
         INSERT INTO tags VALUES (CAST(X'61FF62' AS TEXT), 1);",
    );
    let ids = RowIdGen::new();
    let loaded = load(&driver, "tags", &ids, &quiet(), &NoOpReporter).unwrap();
    let weight = loaded.shape.column("weight").unwrap().clone();
    let (row_id, saved) = loaded.rows[0].clone();
    assert_eq!(
        saved.get(0),
        Some(&CellValue::Value(Primitive::RawText(vec![b'a', 0xff, b'b'])))
    );

    let mut journal = EditJournal::new(ids);
    journal
        .record_modification(row_id, &saved, &weight, 9_i64.into())
        .unwrap();

    let report = flush(&loaded.shape, &journal, &driver, &quiet(), &NoOpReporter).unwrap();

    assert_eq!((report.rows_affected, report.unmatched), (1, 0));
    assert_eq!(
        dump(&driver, "SELECT hex(label), weight FROM tags"),
        vec![vec![Primitive::from("61FF62"), Primitive::Integer(9)]]
    );
}
