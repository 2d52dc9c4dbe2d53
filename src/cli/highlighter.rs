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

use nu_ansi_term::{Color, Style};
use query_terminal::buffer::COMMAND_PREFIX;
use query_terminal::completion::SQL_KEYWORDS;
use reedline::{Highlighter, StyledText};

/// Highlighted beyond the completion keywords.
const EXTRA_KEYWORDS: &[&str] = &[
    "AS", "ON", "DISTINCT", "UNION", "ALL", "DROP", "ALTER", "CASE", "WHEN", "THEN", "ELSE", "END",
    "IN", "BETWEEN", "LIKE", "IS", "NULL", "EXISTS", "ASC", "DESC", "OFFSET", "WITH", "BEGIN",
    "COMMIT", "ROLLBACK", "TRANSACTION", "PRIMARY", "KEY", "UNIQUE", "DEFAULT", "REFERENCES",
    "INTEGER", "TEXT", "REAL", "BLOB", "IF", "PRAGMA", "EXPLAIN", "RETURNING", "TRIGGER",
];

const OPERATORS: &[&str] = &["AND", "OR", "NOT"];

fn keyword_style() -> Style {
    Style::new().bold().fg(Color::Blue)
}
fn string_style() -> Style {
    Style::new().fg(Color::Yellow)
}
fn number_style() -> Style {
    Style::new().fg(Color::Magenta)
}
fn operator_style() -> Style {
    Style::new().bold().fg(Color::Blue)
}
fn comment_style() -> Style {
    Style::new().fg(Color::DarkGray)
}
fn dot_cmd_style() -> Style {
    Style::new().fg(Color::Cyan)
}

fn is_keyword(upper: &str) -> bool {
    SQL_KEYWORDS.contains(&upper) || EXTRA_KEYWORDS.contains(&upper)
}

pub struct SqlHighlighter;

impl Highlighter for SqlHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut styled = StyledText::new();

        if line.trim_start().starts_with(COMMAND_PREFIX) {
            styled.push((dot_cmd_style(), line.to_string()));
            return styled;
        }

        let bytes = line.as_bytes();
        let len = bytes.len();
        let mut i = 0;

        while i < len {
            let b = bytes[i];

            // Line comment runs to the end
            if b == b'-' && bytes.get(i + 1) == Some(&b'-') {
                styled.push((comment_style(), line[i..].to_string()));
                break;
            }

            // String literal or quoted identifier
            if b == b'\'' || b == b'"' {
                let start = i;
                i += 1;
                while i < len && bytes[i] != b {
                    i += 1;
                }
                if i < len {
                    i += 1;
                }
                let style = if b == b'\'' {
                    string_style()
                } else {
                    Style::default()
                };
                styled.push((style, line[start..i].to_string()));
                continue;
            }

            if b.is_ascii_digit() {
                let start = i;
                while i < len && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // Digits glued to letters belong to an identifier.
                let style = if i < len && (bytes[i].is_ascii_alphabetic() || bytes[i] == b'_') {
                    Style::default()
                } else {
                    number_style()
                };
                styled.push((style, line[start..i].to_string()));
                continue;
            }

            if b.is_ascii_alphabetic() || b == b'_' {
                let start = i;
                while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                let word = &line[start..i];
                let upper = word.to_ascii_uppercase();
                let style = if OPERATORS.contains(&upper.as_str()) {
                    operator_style()
                } else if is_keyword(&upper) {
                    keyword_style()
                } else {
                    Style::default()
                };
                styled.push((style, word.to_string()));
                continue;
            }

            if matches!(b, b'=' | b'<' | b'>' | b'!') {
                let start = i;
                i += 1;
                if i < len && matches!(bytes[i], b'=' | b'>') {
                    i += 1;
                }
                styled.push((operator_style(), line[start..i].to_string()));
                continue;
            }

            // Anything else, one whole character at a time.
            let ch = line[i..].chars().next().unwrap_or(' ');
            styled.push((Style::default(), ch.to_string()));
            i += ch.len_utf8().max(1);
        }

        styled
    }
}
