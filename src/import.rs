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

// CSV import into a text-typed table.
//
// The first record names the columns. Values are bound verbatim as TEXT;
// there is no type inference. Table creation and every insert share one
// savepoint, so a failure anywhere leaves the database as it was.

use std::io::Read;

use rusqlite::{params_from_iter, Connection};
use tracing::info;

use crate::database::quote_ident;
use crate::{Error, Result};

const BOM: char = '\u{feff}';

/// Import CSV text from `source` into `table`, creating it if needed.
/// Returns the number of inserted rows.
pub fn import_csv<R: Read>(conn: &mut Connection, source: R, table: &str) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record?,
        None => return Err(Error::Usage("no header row".to_string())),
    };
    let columns = sanitize_headers(header.iter());
    let ident = quote_ident(table);

    let sp = conn.savepoint()?;
    let defs = columns
        .iter()
        .map(|c| format!("{} TEXT", quote_ident(c)))
        .collect::<Vec<_>>()
        .join(", ");
    sp.execute_batch(&format!("CREATE TABLE IF NOT EXISTS {ident} ({defs})"))?;

    let mut count = 0;
    {
        let placeholders = vec!["?"; columns.len()].join(", ");
        let mut insert = sp.prepare(&format!("INSERT INTO {ident} VALUES ({placeholders})"))?;
        for record in records {
            let record = record?;
            if record.len() > columns.len() {
                let line = record.position().map_or(0, |p| p.line());
                return Err(Error::Usage(format!(
                    "line {line}: expected {} fields, found {}",
                    columns.len(),
                    record.len()
                )));
            }
            let values = (0..columns.len()).map(|i| record.get(i));
            insert.execute(params_from_iter(values))?;
            count += 1;
        }
    }
    sp.commit()?;

    info!(table, rows = count, "imported csv");
    Ok(count)
}

/// Turn header text into column names: trimmed, spaces as underscores,
/// blanks named after their position.
pub fn sanitize_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    headers
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches(BOM) } else { h };
            let name = h.trim().replace(' ', "_");
            if name.is_empty() {
                format!("column{}", i + 1)
            } else {
                name
            }
        })
        .collect()
}
