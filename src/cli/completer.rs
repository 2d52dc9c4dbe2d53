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

use query_terminal::commands::COMMANDS;
use query_terminal::completion::{complete_all, word_start};
use query_terminal::database::{lock_database, SharedDatabase};
use reedline::{Completer, Span, Suggestion};

/// Reedline adapter over the completion engine. Reads the live catalog
/// through the session's shared database handle.
pub struct SqlCompleter {
    db: SharedDatabase,
}

impl SqlCompleter {
    pub fn new(db: SharedDatabase) -> Self {
        SqlCompleter { db }
    }
}

impl Completer for SqlCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let Some(before) = line.get(..pos) else {
            return Vec::new();
        };
        let begin = word_start(before);
        let fragment = &before[begin..];
        let span = Span::new(begin, pos);

        let found = {
            let db = lock_database(&self.db);
            complete_all(&db, line, begin, fragment)
        };

        found
            .into_iter()
            .map(|value| {
                let description = describe(&value);
                let matched = (0..fragment.chars().count()).collect();
                Suggestion {
                    value,
                    description,
                    style: None,
                    extra: None,
                    span,
                    append_whitespace: false,
                    match_indices: Some(matched),
                }
            })
            .collect()
    }
}

/// Meta-commands carry their help summary in the menu.
fn describe(value: &str) -> Option<String> {
    COMMANDS
        .iter()
        .find(|spec| spec.name == value)
        .map(|spec| spec.summary.to_string())
}
