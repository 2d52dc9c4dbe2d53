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

// Context-sensitive completion.
//
// Given the line, the byte offset where the fragment being completed starts,
// and the fragment itself, decide what kind of name the user is typing and
// list the matching candidates from the live catalog. Candidates come back
// deduplicated and sorted so the n-th request is deterministic.
//
// Completion must never disturb the session: every failure while building
// candidates is swallowed here and reported as "no candidates".

use std::collections::BTreeSet;

use tracing::debug;

use crate::buffer::COMMAND_PREFIX;
use crate::commands::{self, MetaCommand};
use crate::database::Database;
use crate::Result;

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

/// Keywords after which a relation name is expected.
const RELATION_KEYWORDS: &[&str] = &["FROM", "JOIN", "UPDATE", "INTO", "TABLE"];

/// Keywords after which a column name is expected.
const COLUMN_KEYWORDS: &[&str] = &["SELECT", "WHERE", "ON", "GROUP", "ORDER", "HAVING", "SET"];

/// Offered when nothing more specific applies.
pub const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "GROUP", "BY", "ORDER",
    "HAVING", "LIMIT", "INSERT", "INTO", "VALUES", "UPDATE", "SET", "DELETE", "CREATE", "TABLE",
    "VIEW", "INDEX",
];

const COMPARISON_OPERATORS: &[&str] = &["<=", ">=", "<>", "!=", "="];

// ---------------------------------------------------------------------------
// Context detection
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
pub enum CompletionContext {
    /// First token of a meta-command line.
    Command,
    /// A table or view name.
    Relation,
    /// Any column of any relation.
    Column,
    /// Columns of the named relation (`users.<TAB>`).
    ColumnOf(String),
    /// Keywords and relation names.
    General,
    /// Nothing sensible to offer.
    Nothing,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Token<'a> {
    Ident(&'a str),
    Punct(&'a str),
}

/// Split SQL text into identifiers, `. , ( ) *` and comparison operators.
/// Statement terminators and anything else are dropped.
pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    let bytes = sql.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b.is_ascii_alphabetic() || b == b'_' {
            let start = i;
            while i < len && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token::Ident(&sql[start..i]));
            continue;
        }

        if let Some(op) = COMPARISON_OPERATORS
            .iter()
            .find(|op| bytes[i..].starts_with(op.as_bytes()))
        {
            tokens.push(Token::Punct(&sql[i..i + op.len()]));
            i += op.len();
            continue;
        }

        if matches!(b, b'.' | b',' | b'(' | b')' | b'*') {
            tokens.push(Token::Punct(&sql[i..i + 1]));
        }
        // Terminators, digits, whitespace and non-ASCII bytes carry no signal.
        // Slicing only ever happens at ASCII bytes, which are char boundaries.
        i += 1;
    }
    tokens
}

/// `name.` at the very end of `before`, if present.
fn trailing_qualifier(before: &str) -> Option<&str> {
    let head = before.strip_suffix('.')?;
    let start = head
        .rfind(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .map_or(0, |i| i + 1);
    // An identifier cannot start with a digit; the name begins at the first
    // letter or underscore of the run.
    let run = &head[start..];
    let name = run.trim_start_matches(|c: char| c.is_ascii_digit());
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Decide what is being completed. `before` is the text preceding the
/// fragment.
pub fn detect_context(before: &str, fragment: &str) -> CompletionContext {
    let trimmed = before.trim();

    if trimmed.starts_with(COMMAND_PREFIX) {
        if !before.ends_with(char::is_whitespace) {
            return CompletionContext::Nothing;
        }
        let command = trimmed.split_whitespace().next().and_then(MetaCommand::lookup);
        return match command {
            Some(cmd) if cmd.takes_relation() => CompletionContext::Relation,
            _ => CompletionContext::Nothing,
        };
    }
    if trimmed.is_empty() && fragment.starts_with(COMMAND_PREFIX) {
        return CompletionContext::Command;
    }

    if let Some(relation) = trailing_qualifier(before) {
        return CompletionContext::ColumnOf(relation.to_string());
    }

    for token in tokenize(before).iter().rev() {
        let Token::Ident(word) = token else { continue };
        let upper = word.to_ascii_uppercase();
        if RELATION_KEYWORDS.contains(&upper.as_str()) {
            return CompletionContext::Relation;
        }
        if COLUMN_KEYWORDS.contains(&upper.as_str()) {
            return CompletionContext::Column;
        }
    }
    CompletionContext::General
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

fn candidates(db: &Database, line: &str, begin: usize, fragment: &str) -> Result<Vec<String>> {
    let before = line.get(..begin).unwrap_or(line);
    let matching = |names: Vec<String>| -> Vec<String> {
        names
            .into_iter()
            .filter(|n| n.starts_with(fragment))
            .collect()
    };

    let found: Vec<String> = match detect_context(before, fragment) {
        CompletionContext::Command => commands::names()
            .filter(|n| n.starts_with(fragment))
            .map(str::to_string)
            .collect(),
        CompletionContext::Relation => matching(db.relations()?),
        CompletionContext::Column => matching(db.all_columns()?),
        CompletionContext::ColumnOf(relation) => matching(db.columns(&relation)?),
        CompletionContext::General => {
            let upper = fragment.to_uppercase();
            let mut found: Vec<String> = SQL_KEYWORDS
                .iter()
                .filter(|k| k.starts_with(&upper))
                .map(|k| k.to_string())
                .collect();
            found.extend(matching(db.relations()?));
            found
        }
        CompletionContext::Nothing => Vec::new(),
    };

    let sorted: BTreeSet<String> = found.into_iter().collect();
    Ok(sorted.into_iter().collect())
}

/// Every candidate for the fragment starting at byte `begin` of `line`,
/// sorted and deduplicated. Never fails: errors produce an empty list.
pub fn complete_all(db: &Database, line: &str, begin: usize, fragment: &str) -> Vec<String> {
    match candidates(db, line, begin, fragment) {
        Ok(found) => found,
        Err(e) => {
            debug!(error = %e, "completion failed");
            Vec::new()
        }
    }
}

/// The `index`-th candidate, or `None` once the candidates run out.
pub fn complete(
    db: &Database,
    fragment: &str,
    index: usize,
    line: &str,
    begin: usize,
) -> Option<String> {
    complete_all(db, line, begin, fragment).into_iter().nth(index)
}

/// Byte offset where the word ending at the end of `before` starts. A
/// meta-command being typed is one word including its leading '.'.
pub fn word_start(before: &str) -> usize {
    let lead = before.len() - before.trim_start().len();
    let rest = &before[lead..];
    if rest.starts_with(COMMAND_PREFIX) && !rest.contains(char::is_whitespace) {
        return lead;
    }
    before
        .rfind(|c: char| {
            c.is_whitespace()
                || matches!(c, ',' | '(' | ')' | '.' | ';' | '=' | '<' | '>' | '!' | '*' | '\'' | '"')
        })
        .map_or(0, |i| i + 1)
}
