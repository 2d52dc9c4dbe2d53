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

// Embedded SQLite connection and the catalog queries the session needs.
//
// Nothing about the schema is cached: every call goes back to sqlite_master,
// so completion and meta-commands always see the live catalog.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::types::Value;
use rusqlite::{Batch, Connection, OptionalExtension};
use tracing::debug;

use crate::config::MEMORY;
use crate::{Error, Result};

/// Outcome of a single statement.
#[derive(Debug)]
pub enum Outcome {
    /// The statement produced no columns (DDL, DML without RETURNING).
    Done,
    /// The statement produced a result set, possibly with zero rows.
    Rows(ResultSet),
}

#[derive(Debug, Default)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

pub struct Database {
    conn: Connection,
    ident: String,
}

/// Handle shared between the session loop and the line editor's completer.
/// Both run on the same thread, so the lock is never contended.
pub type SharedDatabase = Arc<Mutex<Database>>;

pub fn share(db: Database) -> SharedDatabase {
    Arc::new(Mutex::new(db))
}

pub fn lock_database(db: &SharedDatabase) -> MutexGuard<'_, Database> {
    match db.lock() {
        Ok(guard) => guard,
        // A panic while holding the lock leaves the connection itself intact.
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Database {
    /// Open (or create) the database named by `ident`. File-backed stores get
    /// their parent directory created first.
    pub fn open(ident: &str) -> Result<Self> {
        if ident != MEMORY {
            if let Some(parent) = Path::new(ident).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
        }
        let conn = Connection::open(ident)?;
        debug!(database = ident, "opened database");
        Ok(Database {
            conn,
            ident: ident.to_string(),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(MEMORY)
    }

    /// Identifier the database was opened with.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Short display name: the final path component.
    pub fn name(&self) -> String {
        Path::new(&self.ident)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.ident.clone())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Run one statement, fetching every row eagerly. Text holding only
    /// comments and whitespace is a no-op; a second statement is refused
    /// before anything runs.
    pub fn execute(&self, sql: &str) -> Result<Outcome> {
        let mut batch = Batch::new(&self.conn, sql);
        let Some(mut stmt) = batch.next()? else {
            return Ok(Outcome::Done);
        };
        // The rest may fail to prepare (it can depend on the first
        // statement); either way there is more than one.
        if !matches!(batch.next(), Ok(None)) {
            return Err(Error::MultipleStatements);
        }

        let ncols = stmt.column_count();
        if ncols == 0 {
            stmt.execute([])?;
            return Ok(Outcome::Done);
        }

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = Vec::new();
        let mut cursor = stmt.query([])?;
        while let Some(row) = cursor.next()? {
            let mut values = Vec::with_capacity(ncols);
            for i in 0..ncols {
                values.push(row.get::<_, Value>(i)?);
            }
            rows.push(values);
        }
        Ok(Outcome::Rows(ResultSet { columns, rows }))
    }

    /// Roll back an open transaction, if any. Failures are logged and dropped.
    pub fn rollback(&self) {
        if self.conn.is_autocommit() {
            return;
        }
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            debug!(error = %e, "rollback failed");
        }
    }

    /// User tables and views, sorted by name.
    pub fn relations(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type IN ('table','view') AND name NOT LIKE 'sqlite_%' ORDER BY 1",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    pub fn relation_exists(&self, name: &str) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type IN ('table','view') AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Column names of `relation` in declaration order. Unknown relations
    /// have no columns.
    pub fn columns(&self, relation: &str) -> Result<Vec<String>> {
        let sql = format!("PRAGMA table_info({})", quote_ident(relation));
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map([], |row| row.get(1))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Every column of every relation, deduplicated in first-seen order.
    /// Relations whose columns cannot be read are skipped.
    pub fn all_columns(&self) -> Result<Vec<String>> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for relation in self.relations()? {
            // A broken view must not hide the healthy relations.
            let columns = match self.columns(&relation) {
                Ok(columns) => columns,
                Err(e) => {
                    debug!(relation = %relation, error = %e, "columns unavailable");
                    continue;
                }
            };
            for column in columns {
                if seen.insert(column.clone()) {
                    out.push(column);
                }
            }
        }
        Ok(out)
    }

    /// `SELECT *` over a relation.
    pub fn select_all(&self, relation: &str) -> Result<ResultSet> {
        match self.execute(&format!("SELECT * FROM {}", quote_ident(relation)))? {
            Outcome::Rows(rs) => Ok(rs),
            Outcome::Done => Ok(ResultSet::default()),
        }
    }

    /// (name, definition) of every user table, view, index and trigger,
    /// ordered by type then name.
    pub fn schema(&self) -> Result<Vec<(String, Option<String>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, sql FROM sqlite_master \
             WHERE type IN ('table','view','index','trigger') \
             AND name NOT LIKE 'sqlite_%' ORDER BY type, name",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Definitions of the objects named exactly `name`.
    pub fn schema_of(&self, name: &str) -> Result<Vec<Option<String>>> {
        let mut stmt = self.conn.prepare(
            "SELECT sql FROM sqlite_master \
             WHERE name = ?1 AND type IN ('table','view','index','trigger')",
        )?;
        let rows = stmt
            .query_map([name], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<Option<String>>>>()?;
        Ok(rows)
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        debug!(database = %self.ident, "closing database");
    }
}

/// Quote an identifier for SQL text: `a"b` becomes `"a""b"`.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a string literal for SQL text: `it's` becomes `'it''s'`.
pub fn quote_literal(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
