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

//! Completion against a live catalog.
//!
//! `begin` is always the byte offset of the fragment inside `line`, the way
//! the line editor adapter computes it.

use query_terminal::completion::{complete, complete_all, word_start};
use query_terminal::Database;

fn catalog() -> Database {
    let db = Database::in_memory().unwrap();
    db.connection()
        .execute_batch(
            "CREATE TABLE users(id INTEGER, name TEXT, email TEXT);
             CREATE TABLE orders(id INTEGER, user_id INTEGER, total REAL);
             CREATE TABLE usage(day TEXT, hits INTEGER);
             CREATE VIEW user_totals AS SELECT user_id, sum(total) AS spent FROM orders GROUP BY 1;",
        )
        .unwrap();
    db
}

/// Complete the word at the end of `line`.
fn at_end(db: &Database, line: &str) -> Vec<String> {
    let begin = word_start(line);
    complete_all(db, line, begin, &line[begin..])
}

#[test]
fn commands_complete_from_the_registry() {
    let db = catalog();
    assert_eq!(at_end(&db, ".t"), vec![".tables", ".timer"]);
    assert_eq!(at_end(&db, ".e"), vec![".exit"]);
    assert_eq!(
        at_end(&db, "."),
        vec![".dump", ".exit", ".help", ".import", ".open", ".quit", ".schema", ".tables", ".timer"]
    );
    assert!(at_end(&db, ".x").is_empty());
}

#[test]
fn relation_commands_complete_relation_names() {
    let db = catalog();
    assert_eq!(at_end(&db, ".tables us"), vec!["usage", "user_totals", "users"]);
    assert_eq!(at_end(&db, ".schema o"), vec!["orders"]);
    assert!(at_end(&db, ".open us").is_empty());
    assert!(at_end(&db, ".import data.csv us").is_empty());
}

#[test]
fn relation_keywords_offer_relations() {
    let db = catalog();
    assert_eq!(at_end(&db, "SELECT * FROM u"), vec!["usage", "user_totals", "users"]);
    assert_eq!(at_end(&db, "SELECT * FROM users JOIN o"), vec!["orders"]);
    assert_eq!(at_end(&db, "INSERT INTO users"), vec!["users"]);
    assert_eq!(at_end(&db, "update "), vec!["orders", "usage", "user_totals", "users"]);
}

#[test]
fn column_keywords_offer_every_column_once() {
    let db = catalog();
    assert_eq!(
        at_end(&db, "SELECT "),
        vec!["day", "email", "hits", "id", "name", "spent", "total", "user_id"]
    );
    assert_eq!(at_end(&db, "SELECT * FROM users WHERE na"), vec!["name"]);
    assert_eq!(at_end(&db, "SELECT * FROM orders ORDER BY t"), vec!["total"]);
    assert_eq!(at_end(&db, "UPDATE users SET e"), vec!["email"]);
}

#[test]
fn qualified_names_offer_that_relations_columns() {
    let db = catalog();
    assert_eq!(
        at_end(&db, "SELECT * FROM users JOIN orders ON users."),
        vec!["email", "id", "name"]
    );
    assert_eq!(at_end(&db, "SELECT orders.u"), vec!["user_id"]);
    assert!(at_end(&db, "SELECT missing.").is_empty());
}

#[test]
fn general_context_mixes_keywords_and_relations() {
    let db = catalog();
    assert_eq!(at_end(&db, "u"), vec!["UPDATE", "usage", "user_totals", "users"]);
    assert_eq!(at_end(&db, "sel"), vec!["SELECT"]);
    assert_eq!(at_end(&db, "EXPLAIN o"), vec!["ORDER", "OUTER", "orders"]);
}

#[test]
fn relation_matching_is_case_sensitive() {
    let db = catalog();
    assert!(at_end(&db, "SELECT * FROM U").is_empty());
    assert!(at_end(&db, "SELECT NA").is_empty());
}

#[test]
fn enumerates_by_index_until_exhausted() {
    let db = catalog();
    let line = "SELECT * FROM u";
    let begin = word_start(line);
    let fragment = &line[begin..];

    let mut seen = Vec::new();
    let mut index = 0;
    while let Some(candidate) = complete(&db, fragment, index, line, begin) {
        seen.push(candidate);
        index += 1;
    }
    assert_eq!(seen, vec!["usage", "user_totals", "users"]);
    assert_eq!(complete(&db, fragment, 99, line, begin), None);
}

#[test]
fn catalog_changes_show_up_immediately() {
    let db = catalog();
    assert!(at_end(&db, "SELECT * FROM inv").is_empty());
    db.connection()
        .execute_batch("CREATE TABLE inventory(sku TEXT);")
        .unwrap();
    assert_eq!(at_end(&db, "SELECT * FROM inv"), vec!["inventory"]);
    assert_eq!(at_end(&db, "SELECT inventory.s"), vec!["sku"]);
}

#[test]
fn odd_input_never_fails() {
    let db = catalog();
    assert_eq!(at_end(&db, "SELECT 'żółw' FROM ").len(), 4);
    assert_eq!(complete(&db, "x", 0, "", 0), None);
    // An offset past the end reads the whole line as context.
    assert_eq!(complete_all(&db, "SELECT * FROM", 100, "use").len(), 3);
    assert!(complete_all(&db, ".tables", 7, "").is_empty());
}

#[test]
fn broken_relation_keeps_the_healthy_columns() {
    let db = catalog();
    // A view over a dropped table makes PRAGMA table_info fail.
    db.connection()
        .execute_batch("CREATE TABLE gone(x); CREATE VIEW ghost AS SELECT x FROM gone; DROP TABLE gone;")
        .unwrap();
    assert_eq!(at_end(&db, "SELECT na"), vec!["name"]);
    assert_eq!(at_end(&db, "SELECT * FROM orders WHERE t"), vec!["total"]);
    // Only the broken relation itself has nothing to offer.
    assert!(at_end(&db, "SELECT ghost.").is_empty());
    assert!(at_end(&db, "SELECT * FROM gh").contains(&"ghost".to_string()));
}
