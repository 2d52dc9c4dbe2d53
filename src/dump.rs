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

// Reconstruct a database as SQL text.
//
// Output order: tables (by name) each followed by its rows, then indexes,
// triggers and views in creation order, then sqlite_sequence state. The
// whole dump is wrapped in one transaction.

use rusqlite::Connection;

use crate::database::{quote_ident, quote_literal, Database};
use crate::Result;

impl Database {
    /// Statements that rebuild this database, in execution order.
    pub fn dump(&self) -> Result<Vec<String>> {
        dump(self.connection())
    }
}

pub fn dump(conn: &Connection) -> Result<Vec<String>> {
    let mut out = vec!["BEGIN TRANSACTION;".to_string()];
    let mut sequence = Vec::new();
    let mut writable_schema = false;

    let tables: Vec<(String, String)> = {
        let mut stmt = conn.prepare(
            "SELECT name, sql FROM sqlite_master \
             WHERE sql NOT NULL AND type = 'table' ORDER BY name",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows
    };

    for (name, sql) in &tables {
        if name == "sqlite_sequence" {
            sequence.push("DELETE FROM \"sqlite_sequence\";".to_string());
            sequence.extend(select_lines(
                conn,
                "SELECT 'INSERT INTO \"sqlite_sequence\" VALUES(' || quote(name) || ',' || quote(seq) || ');' \
                 FROM sqlite_sequence",
            )?);
            continue;
        } else if name == "sqlite_stat1" {
            out.push("ANALYZE \"sqlite_master\";".to_string());
        } else if name.starts_with("sqlite_") {
            continue;
        } else if sql.starts_with("CREATE VIRTUAL TABLE") {
            if !writable_schema {
                out.push("PRAGMA writable_schema=ON;".to_string());
                writable_schema = true;
            }
            out.push(format!(
                "INSERT INTO sqlite_master(type,name,tbl_name,rootpage,sql) VALUES('table',{0},{0},0,{1});",
                quote_literal(name),
                quote_literal(sql)
            ));
            continue;
        } else {
            out.push(format!("{sql};"));
        }
        out.extend(insert_statements(conn, name)?);
    }

    out.extend(select_lines(
        conn,
        "SELECT sql || ';' FROM sqlite_master \
         WHERE sql NOT NULL AND type IN ('index','trigger','view')",
    )?);

    out.extend(sequence);
    if writable_schema {
        out.push("PRAGMA writable_schema=OFF;".to_string());
    }
    out.push("COMMIT;".to_string());
    Ok(out)
}

/// One `INSERT` per row of `table`, values rendered by SQLite's quote().
fn insert_statements(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let ident = quote_ident(table);
    let columns: Vec<String> = {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({ident})"))?;
        let names = stmt
            .query_map([], |row| row.get(1))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        names
    };
    if columns.is_empty() {
        return Ok(Vec::new());
    }

    let values = columns
        .iter()
        .map(|c| format!("quote({})", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(" || ',' || ");
    let prefix = quote_literal(&format!("INSERT INTO {ident} VALUES("));
    let query = format!("SELECT {prefix} || {values} || ');' FROM {ident}");
    select_lines(conn, &query)
}

fn select_lines(conn: &Connection, sql: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let lines = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(lines)
}
