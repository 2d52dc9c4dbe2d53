//   Copyright (c) 2024-2026 Anton Kundenko <singaraiona@gmail.com>
//   All rights reserved.
//
//   Permission is hereby granted, free of charge, to any person obtaining a copy
//   of this software and associated documentation files (the "Software"), to deal
//   in the Software without restriction, including without limitation the rights
//   to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
//   copies of the Software, and to permit persons to whom the Software is
//   furnished to do so, subject to the following conditions:
//
//   The above copyright notice and this permission notice shall be included in all
//   copies or substantial portions of the Software.
//
//   THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
//   IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//   FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
//   AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
//   LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
//   OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
//   SOFTWARE.

//! End-to-end tests for the interactive session.
//!
//! Every test drives a `Session` writing into a `Vec<u8>`, feeding it lines
//! exactly as the terminal loop would, and checks the captured output.

use std::fs;

use query_terminal::database::lock_database;
use query_terminal::{Flow, HistoryFile, Session};
use tempfile::tempdir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn memory() -> Session<Vec<u8>> {
    Session::open(":memory:", Vec::new()).unwrap()
}

/// Take everything written so far.
fn drain(session: &mut Session<Vec<u8>>) -> String {
    String::from_utf8(std::mem::take(session.output_mut())).unwrap()
}

fn run(session: &mut Session<Vec<u8>>, lines: &[&str]) -> String {
    for line in lines {
        assert_eq!(session.handle_line(line), Flow::Continue, "{line}");
    }
    drain(session)
}

fn count(session: &Session<Vec<u8>>, table: &str) -> i64 {
    let db = session.database();
    let db = lock_database(&db);
    db.connection()
        .query_row(&format!("SELECT count(*) FROM {table}"), [], |r| r.get(0))
        .unwrap()
}

fn users(session: &mut Session<Vec<u8>>) {
    run(
        session,
        &[
            "CREATE TABLE users(id INTEGER, name TEXT);",
            "INSERT INTO users VALUES (1, 'Alice'), (2, 'Bob');",
        ],
    );
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[test]
fn statements_without_columns_print_ok() {
    let mut s = memory();
    let out = run(
        &mut s,
        &[
            "CREATE TABLE users(id INTEGER, name TEXT);",
            "INSERT INTO users VALUES (1, 'Alice'), (2, 'Bob');",
        ],
    );
    assert_eq!(out, "OK\nOK\n");
}

#[test]
fn select_renders_a_table_without_ok() {
    let mut s = memory();
    users(&mut s);
    let out = run(&mut s, &["SELECT * FROM users;"]);
    assert_eq!(out, "id | name \n---+------\n1  | Alice\n2  | Bob  \n");
    assert!(!out.contains("OK"));
}

#[test]
fn sql_error_rolls_back_and_continues() {
    let mut s = memory();
    run(
        &mut s,
        &[
            "CREATE TABLE items(id INTEGER UNIQUE);",
            "INSERT INTO items VALUES (1);",
        ],
    );
    let out = run(&mut s, &["INSER INTO items VALUES (2);"]);
    assert!(out.starts_with("SQL error: "), "{out}");
    assert!(out.contains("INSER"));
    assert_eq!(count(&s, "items"), 1);

    let out = run(&mut s, &["INSERT INTO items VALUES (1);"]);
    assert!(out.starts_with("SQL error: "), "{out}");
    assert_eq!(count(&s, "items"), 1);
}

#[test]
fn failed_statement_inside_transaction_is_rolled_back() {
    let mut s = memory();
    run(
        &mut s,
        &[
            "CREATE TABLE items(id INTEGER UNIQUE);",
            "BEGIN;",
            "INSERT INTO items VALUES (1);",
        ],
    );
    let out = run(&mut s, &["INSERT INTO items VALUES (1);"]);
    assert!(out.starts_with("SQL error: "));
    assert_eq!(count(&s, "items"), 0);
    // No transaction left open.
    assert_eq!(run(&mut s, &["BEGIN;"]), "OK\n");
}

#[test]
fn timer_reports_after_success_and_failure() {
    let mut s = memory();
    assert_eq!(run(&mut s, &[".timer on"]), "Timer: on\n");
    assert!(s.timer());

    let out = run(&mut s, &["CREATE TABLE test(id INTEGER);"]);
    assert!(out.starts_with("OK\n(Time: "), "{out}");
    assert!(out.ends_with(" ms)\n"));

    let out = run(&mut s, &["SELECT nope FROM test;"]);
    assert!(out.starts_with("SQL error: "));
    assert!(out.contains("(Time: "));

    run(&mut s, &[".timer off"]);
    assert!(!run(&mut s, &["SELECT 1;"]).contains("(Time:"));
}

#[test]
fn timer_requires_on_or_off() {
    let mut s = memory();
    assert_eq!(run(&mut s, &[".timer"]), "Usage: .timer on|off\n");
    assert_eq!(run(&mut s, &[".timer maybe"]), "Usage: .timer on|off\n");
    assert!(!s.timer());
}

#[test]
fn empty_result_keeps_headers() {
    let mut s = memory();
    run(&mut s, &["CREATE TABLE data(x TEXT);"]);
    let out = run(&mut s, &["SELECT * FROM data;"]);
    assert_eq!(out, "x\n-\n(empty)\n");
}

#[test]
fn null_renders_blank_and_reals_keep_precision() {
    let mut s = memory();
    run(
        &mut s,
        &[
            "CREATE TABLE vals(id INTEGER, val REAL, txt TEXT);",
            "INSERT INTO vals VALUES (1, 3.14, 'pi');",
            "INSERT INTO vals VALUES (2, NULL, NULL);",
        ],
    );
    let out = run(&mut s, &["SELECT * FROM vals ORDER BY id;"]);
    assert_eq!(
        out,
        "id | val  | txt\n---+------+----\n1  | 3.14 | pi \n2  |      |    \n"
    );
}

#[test]
fn one_statement_per_submission() {
    let mut s = memory();
    run(&mut s, &["CREATE TABLE t(x);"]);
    let out = run(&mut s, &["INSERT INTO t VALUES (1); INSERT INTO t VALUES (2);"]);
    assert_eq!(out, "SQL error: You can only execute one statement at a time.\n");
    assert_eq!(count(&s, "t"), 0);

    // A trailing comment is not a second statement.
    assert_eq!(run(&mut s, &["INSERT INTO t VALUES (3); /* third */;"]), "OK\n");
    assert_eq!(count(&s, "t"), 1);
}

#[test]
fn comment_only_statement_is_ok() {
    let mut s = memory();
    assert_eq!(run(&mut s, &["-- just a note;"]), "OK\n");
    assert_eq!(run(&mut s, &["/* a note */;"]), "OK\n");
}

#[test]
fn bare_terminator_is_ok() {
    let mut s = memory();
    assert_eq!(run(&mut s, &[";"]), "OK\n");
}

// ---------------------------------------------------------------------------
// Buffering
// ---------------------------------------------------------------------------

#[test]
fn statements_span_lines_until_terminator() {
    let mut s = memory();
    assert_eq!(s.prompt(), ":memory:$ ");

    assert_eq!(s.handle_line("SELECT"), Flow::Continue);
    assert_eq!(s.prompt(), "... ");
    assert_eq!(s.handle_line(""), Flow::Continue);
    // A dot while continuing is SQL text.
    assert_eq!(s.handle_line(".5 + 1 AS x;"), Flow::Continue);
    assert_eq!(s.prompt(), ":memory:$ ");

    let out = drain(&mut s);
    assert_eq!(out, "x  \n---\n1.5\n");
}

#[test]
fn blank_lines_do_nothing() {
    let mut s = memory();
    assert_eq!(run(&mut s, &["", "   "]), "");
}

// ---------------------------------------------------------------------------
// Meta-commands
// ---------------------------------------------------------------------------

#[test]
fn unknown_command_points_at_help() {
    let mut s = memory();
    assert_eq!(run(&mut s, &[".nope"]), "Unknown command. Type .help\n");
    assert_eq!(run(&mut s, &[".TABLES"]), "Unknown command. Type .help\n");
}

#[test]
fn help_lists_commands() {
    let mut s = memory();
    let out = run(&mut s, &[".help"]);
    for name in [".open", ".tables", ".schema", ".dump", ".import", ".exit"] {
        assert!(out.contains(name), "{name} missing");
    }
}

#[test]
fn tables_lists_and_prints_relations() {
    let mut s = memory();
    assert_eq!(run(&mut s, &[".tables"]), "(no tables)\n");

    users(&mut s);
    run(&mut s, &["CREATE VIEW named AS SELECT name FROM users;"]);
    assert_eq!(run(&mut s, &[".tables"]), "named users\n");

    assert_eq!(
        run(&mut s, &[".tables named"]),
        "name \n-----\nAlice\nBob  \n"
    );
    assert_eq!(
        run(&mut s, &[".tables missing"]),
        "(no such table or view: missing)\n"
    );
}

#[test]
fn schema_prints_definitions() {
    let mut s = memory();
    assert_eq!(run(&mut s, &[".schema"]), "(empty schema)\n");

    run(
        &mut s,
        &[
            "CREATE TABLE users(id INTEGER, name TEXT);",
            "CREATE INDEX users_name ON users(name);",
        ],
    );
    assert_eq!(
        run(&mut s, &[".schema"]),
        "-- users_name\nCREATE INDEX users_name ON users(name);\n\n\
         -- users\nCREATE TABLE users(id INTEGER, name TEXT);\n\n"
    );
    assert_eq!(
        run(&mut s, &[".schema users"]),
        "CREATE TABLE users(id INTEGER, name TEXT);\n"
    );
    assert_eq!(run(&mut s, &[".schema nope"]), "(no such object: nope)\n");
}

#[test]
fn open_switches_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("app.db");
    let path = path.to_str().unwrap();

    let mut s = memory();
    users(&mut s);

    assert_eq!(run(&mut s, &[".open"]), "Usage: .open <path>\n");
    assert_eq!(run(&mut s, &[".open a b"]), "Usage: .open <path>\n");

    assert_eq!(run(&mut s, &[format!(".open {path}").as_str()]), format!("Opened {path}\n"));
    assert_eq!(s.prompt(), "app.db$ ");
    assert_eq!(run(&mut s, &[".tables"]), "(no tables)\n");
    run(&mut s, &["CREATE TABLE kept(x);"]);

    // A fresh session sees what the first one wrote.
    let mut again = Session::open(path, Vec::new()).unwrap();
    assert_eq!(run(&mut again, &[".tables"]), "kept\n");
}

#[test]
fn open_failure_keeps_current_database() {
    let dir = tempdir().unwrap();
    let mut s = memory();
    users(&mut s);

    // A directory cannot be opened as a database file.
    let out = run(&mut s, &[format!(".open {}", dir.path().display()).as_str()]);
    assert!(out.starts_with("Error: "), "{out}");
    assert_eq!(s.prompt(), ":memory:$ ");
    assert_eq!(count(&s, "users"), 2);
}

#[test]
fn import_creates_text_table() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("people.csv");
    fs::write(&csv, "a,b\n1,2\n3,4\n").unwrap();

    let mut s = memory();
    let out = run(&mut s, &[format!(".import {} t", csv.display()).as_str()]);
    assert_eq!(out, "Imported 2 rows into t\n");
    assert_eq!(count(&s, "t"), 2);

    let out = run(&mut s, &["SELECT typeof(a), b FROM t ORDER BY b;"]);
    assert_eq!(out, "typeof(a) | b\n----------+--\ntext      | 2\ntext      | 4\n");
}

#[test]
fn import_reports_bad_arguments_and_files() {
    let dir = tempdir().unwrap();
    let mut s = memory();

    assert_eq!(
        run(&mut s, &[".import only-one"]),
        "Usage: .import <csv> <table>\n"
    );

    let missing = dir.path().join("missing.csv");
    let out = run(&mut s, &[format!(".import {} t", missing.display()).as_str()]);
    assert!(
        out.starts_with(&format!("Error: cannot read {}: ", missing.display())),
        "{out}"
    );

    let ragged = dir.path().join("ragged.csv");
    fs::write(&ragged, "a,b\n1,2,3\n").unwrap();
    let out = run(&mut s, &[format!(".import {} t", ragged.display()).as_str()]);
    assert!(out.starts_with("Import failed: "), "{out}");
    assert_eq!(run(&mut s, &[".tables"]), "(no tables)\n");
}

#[test]
fn dump_rebuilds_the_database() {
    let mut s = memory();
    users(&mut s);
    run(
        &mut s,
        &[
            "CREATE TABLE notes(id INTEGER PRIMARY KEY AUTOINCREMENT, body TEXT);",
            "INSERT INTO notes(body) VALUES ('it''s'), (NULL);",
            "CREATE VIEW names AS SELECT name FROM users;",
        ],
    );
    let dumped = run(&mut s, &[".dump"]);
    assert!(dumped.starts_with("BEGIN TRANSACTION;\n"));
    assert!(dumped.ends_with("COMMIT;\n"));
    assert!(dumped.contains("INSERT INTO \"users\" VALUES(1,'Alice');"));

    let mut copy = memory();
    {
        let db = copy.database();
        let db = lock_database(&db);
        db.connection().execute_batch(&dumped).unwrap();
    }
    assert_eq!(run(&mut copy, &[".dump"]), dumped);
    assert_eq!(count(&copy, "notes"), 2);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn exit_saves_history_and_says_bye() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history");

    let mut s = memory().with_history(HistoryFile::load(&path, 100));
    run(&mut s, &[".tables", "SELECT 1", "AS one;"]);

    assert_eq!(s.handle_line(".exit"), Flow::Exit);
    assert_eq!(drain(&mut s), "Bye.\n");

    let saved = fs::read_to_string(&path).unwrap();
    assert_eq!(saved, ".tables\nSELECT 1 AS one;\n");
}

#[test]
fn quit_is_exit() {
    let mut s = memory();
    assert_eq!(s.handle_line(".quit"), Flow::Exit);
    assert_eq!(drain(&mut s), "Bye.\n");
}

#[test]
fn history_is_written_as_the_session_goes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("history");

    let mut s = memory().with_history(HistoryFile::load(&path, 2));
    run(&mut s, &["SELECT 1;", "SELECT 2;", "SELECT 3;"]);

    let reloaded = HistoryFile::load(&path, 10);
    assert_eq!(reloaded.entries(), &["SELECT 2;", "SELECT 3;"]);
}

#[test]
fn unwritable_history_does_not_disturb_the_session() {
    let dir = tempdir().unwrap();
    let mut s = memory().with_history(HistoryFile::load(dir.path(), 10));
    assert_eq!(run(&mut s, &["SELECT 1 AS n;"]), "n\n-\n1\n");
    s.shutdown();
    assert_eq!(drain(&mut s), "Bye.\n");
}
