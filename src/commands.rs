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

// Meta-command registry.
//
// The set of commands is fixed at compile time. Lookup is an exact,
// case-sensitive match on the first token of the line.

use std::fmt::Write;

use crate::theme::{self, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Help,
    Exit,
    Open,
    Tables,
    Schema,
    Dump,
    Import,
    Timer,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
    pub command: MetaCommand,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: ".help",
        usage: ".help",
        summary: "Show this help",
        command: MetaCommand::Help,
    },
    CommandSpec {
        name: ".exit",
        usage: ".exit",
        summary: "Exit",
        command: MetaCommand::Exit,
    },
    CommandSpec {
        name: ".quit",
        usage: ".quit",
        summary: "Exit",
        command: MetaCommand::Exit,
    },
    CommandSpec {
        name: ".open",
        usage: ".open <path>",
        summary: "Open/create SQLite database file",
        command: MetaCommand::Open,
    },
    CommandSpec {
        name: ".tables",
        usage: ".tables [name]",
        summary: "List tables/views; if <name> given, print that table/view",
        command: MetaCommand::Tables,
    },
    CommandSpec {
        name: ".schema",
        usage: ".schema [name]",
        summary: "Print schema: all objects or the specified one",
        command: MetaCommand::Schema,
    },
    CommandSpec {
        name: ".dump",
        usage: ".dump",
        summary: "Dump the whole database as SQL",
        command: MetaCommand::Dump,
    },
    CommandSpec {
        name: ".import",
        usage: ".import <csv> <table>",
        summary: "Load a CSV file into a table (columns as TEXT)",
        command: MetaCommand::Import,
    },
    CommandSpec {
        name: ".timer",
        usage: ".timer on|off",
        summary: "Show query execution time",
        command: MetaCommand::Timer,
    },
];

impl MetaCommand {
    pub fn lookup(token: &str) -> Option<MetaCommand> {
        COMMANDS
            .iter()
            .find(|spec| spec.name == token)
            .map(|spec| spec.command)
    }

    /// Commands whose first argument is a relation name.
    pub fn takes_relation(self) -> bool {
        matches!(self, MetaCommand::Tables | MetaCommand::Schema)
    }

    pub fn usage(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|spec| spec.command == self)
            .map_or("", |spec| spec.usage)
    }
}

/// Every registered command name, including aliases.
pub fn names() -> impl Iterator<Item = &'static str> {
    COMMANDS.iter().map(|spec| spec.name)
}

pub fn banner(theme: &Theme) -> String {
    format!(
        "{} {}",
        theme.paint(
            theme::BAN_TITLE,
            &format!("Query Terminal (SQLite) v{}.", env!("CARGO_PKG_VERSION"))
        ),
        theme.paint(theme::BAN_HELP, "Type .help")
    )
}

pub fn help_text(theme: &Theme) -> String {
    let width = COMMANDS.iter().map(|s| s.usage.len()).max().unwrap_or(0);
    let mut out = String::new();
    let _ = writeln!(out, "{}", theme.paint(theme::BOLD, "Meta-commands:"));
    for spec in COMMANDS {
        let usage = format!("{:<width$}", spec.usage);
        let _ = writeln!(out, "  {}  {}", theme.paint(theme::CMD, &usage), spec.summary);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", theme.paint(theme::BOLD, "SQL:"));
    let _ = write!(out, "  - Multiline input is supported; finish statements with ';'");
    out
}
