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

// Aligned text tables for result sets.
//
//   id | name
//   ---+------
//   1  | Alice
//   2  | Bob
//
// Widths are computed over every row before anything is written, so a column
// is never narrower than its widest cell.

use std::fmt::Write;

use rusqlite::types::Value;

pub const NO_COLUMNS: &str = "(no columns)";
pub const EMPTY: &str = "(empty)";

const CELL_SEP: &str = " | ";
const RULE_SEP: &str = "-+-";

/// Render `headers` and `rows` as a table. Rows shorter than the header are
/// padded with blanks; extra cells are ignored.
pub fn render(headers: &[String], rows: &[Vec<Value>]) -> String {
    if headers.is_empty() {
        return NO_COLUMNS.to_string();
    }
    let ncols = headers.len();

    let head: Vec<String> = headers.iter().map(|h| escape_newlines(h)).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            (0..ncols)
                .map(|c| row.get(c).map(cell_text).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = head.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (c, cell) in row.iter().enumerate() {
            widths[c] = widths[c].max(cell.chars().count());
        }
    }

    let mut out = String::with_capacity(64 * (cells.len() + 2));
    push_row(&mut out, &head, &widths);
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&rule.join(RULE_SEP));
    for row in &cells {
        out.push('\n');
        push_row(&mut out, row, &widths);
    }
    if cells.is_empty() {
        out.push('\n');
        out.push_str(EMPTY);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    for (c, cell) in cells.iter().enumerate() {
        if c > 0 {
            out.push_str(CELL_SEP);
        }
        let _ = write!(out, "{:<width$}", cell, width = widths[c]);
    }
}

/// Display text of one scalar. NULL is the empty string.
pub fn cell_text(value: &Value) -> String {
    let text = match value {
        Value::Null => return String::new(),
        Value::Integer(v) => v.to_string(),
        Value::Real(v) => format_real(*v),
        Value::Text(s) => s.clone(),
        Value::Blob(bytes) => {
            let mut hex = String::with_capacity(bytes.len() * 2 + 3);
            hex.push_str("X'");
            for b in bytes {
                let _ = write!(hex, "{b:02X}");
            }
            hex.push('\'');
            hex
        }
    };
    escape_newlines(&text)
}

fn format_real(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn escape_newlines(s: &str) -> String {
    if s.contains('\n') {
        s.replace('\n', "\\n")
    } else {
        s.to_string()
    }
}
