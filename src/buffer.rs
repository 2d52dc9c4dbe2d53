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

// Multi-line statement accumulator.
//
// Idle (empty) lines starting with '.' dispatch as meta-commands. Everything
// else accumulates until a line ends with ';', at which point the pending
// lines are joined into one statement and the buffer resets.

pub const COMMAND_PREFIX: char = '.';
pub const TERMINATOR: char = ';';
pub const CONTINUATION_PROMPT: &str = "... ";

/// What the session should do with a line it just read.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Blank line, nothing to do.
    Ignore,
    /// A meta-command line, to be handled right away.
    Meta(String),
    /// The line was buffered; more input is expected.
    Pending,
    /// A complete statement, ready for execution.
    Statement(String),
}

#[derive(Debug, Default)]
pub struct StatementBuffer {
    lines: Vec<String>,
}

impl StatementBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.lines.is_empty()
    }

    /// Feed one raw input line.
    pub fn push(&mut self, line: &str) -> Dispatch {
        let line = line.trim();
        if line.is_empty() {
            return Dispatch::Ignore;
        }
        if self.is_idle() && line.starts_with(COMMAND_PREFIX) {
            return Dispatch::Meta(line.to_string());
        }
        self.lines.push(line.to_string());
        if line.ends_with(TERMINATOR) {
            let sql = self.lines.join("\n").trim().to_string();
            self.lines.clear();
            Dispatch::Statement(sql)
        } else {
            Dispatch::Pending
        }
    }

    /// Drop any partially typed statement.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Prompt for the current state: `<name>$ ` when idle, `... ` otherwise.
    pub fn prompt(&self, database_name: &str) -> String {
        if self.is_idle() {
            format!("{database_name}$ ")
        } else {
            CONTINUATION_PROMPT.to_string()
        }
    }
}
