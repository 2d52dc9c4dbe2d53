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

// Interactive session: one database, one statement buffer, one output.
//
// The loop feeds raw lines to `handle_line`. Meta-commands and statements
// report every failure inline; the only way out is `Flow::Exit`, which is
// returned after the orderly shutdown (history saved, farewell printed).

use std::fs::File;
use std::io::{BufReader, Write};
use std::time::Instant;

use tracing::debug;

use crate::buffer::{Dispatch, StatementBuffer, TERMINATOR};
use crate::commands::{self, MetaCommand};
use crate::database::{lock_database, share, Database, Outcome, SharedDatabase};
use crate::history::HistoryFile;
use crate::import::import_csv;
use crate::render::render;
use crate::theme::{self, Theme};
use crate::{Error, Result};

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session<W: Write> {
    db: SharedDatabase,
    buffer: StatementBuffer,
    timer: bool,
    history: Option<HistoryFile>,
    theme: Theme,
    out: W,
}

impl<W: Write> Session<W> {
    /// Open the database named by `ident` and write all output to `out`.
    pub fn open(ident: &str, out: W) -> Result<Self> {
        let db = Database::open(ident)?;
        Ok(Session {
            db: share(db),
            buffer: StatementBuffer::new(),
            timer: false,
            history: None,
            theme: Theme::plain(),
            out,
        })
    }

    pub fn with_history(mut self, history: HistoryFile) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Handle to the live database, for the line editor's completer.
    pub fn database(&self) -> SharedDatabase {
        SharedDatabase::clone(&self.db)
    }

    pub fn history(&self) -> Option<&HistoryFile> {
        self.history.as_ref()
    }

    pub fn timer(&self) -> bool {
        self.timer
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// `<name>$ ` when idle, `... ` while a statement is pending.
    pub fn prompt(&self) -> String {
        let name = lock_database(&self.db).name();
        self.buffer.prompt(&name)
    }

    /// Feed one line of input.
    pub fn handle_line(&mut self, line: &str) -> Flow {
        match self.buffer.push(line) {
            Dispatch::Ignore | Dispatch::Pending => Flow::Continue,
            Dispatch::Meta(command) => {
                let flow = self.dispatch_meta(&command);
                if flow == Flow::Continue {
                    self.remember(&command);
                }
                flow
            }
            Dispatch::Statement(sql) => {
                self.execute_sql(&sql);
                self.remember(&sql);
                Flow::Continue
            }
        }
    }

    /// Persist history and say goodbye. Dropping the session (and the
    /// editor's completer) closes the database.
    pub fn shutdown(&mut self) {
        self.buffer.clear();
        if let Some(history) = &self.history {
            match history.persist() {
                Ok(()) => debug!(path = %history.path().display(), "history saved"),
                Err(e) => debug!(error = %e, "history not saved"),
            }
        }
        self.emit("Bye.");
    }

    fn remember(&mut self, entry: &str) {
        let Some(history) = self.history.as_mut() else {
            return;
        };
        history.append(entry);
        if let Err(e) = history.persist() {
            debug!(error = %e, "history not saved");
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    fn emit(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }

    fn say(&mut self, style: &str, text: &str) {
        let painted = self.theme.paint(style, text);
        self.emit(&painted);
    }

    fn report(&mut self, err: &Error) {
        match err {
            Error::Usage(msg) => self.say(theme::NOTE, msg),
            other => self.say(theme::ERROR, &format!("Error: {other}")),
        }
    }

    // -----------------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------------

    /// Run one complete statement and print its outcome.
    pub fn execute_sql(&mut self, sql: &str) {
        let start = Instant::now();
        let outcome = if is_blank_statement(sql) {
            Ok(Outcome::Done)
        } else {
            let db = lock_database(&self.db);
            let outcome = db.execute(sql);
            if outcome.is_err() {
                db.rollback();
            }
            outcome
        };

        match outcome {
            Ok(Outcome::Done) => self.say(theme::SUCCESS, "OK"),
            Ok(Outcome::Rows(rs)) => self.emit(&render(&rs.columns, &rs.rows)),
            Err(e) => self.say(theme::ERROR, &format!("SQL error: {e}")),
        }

        if self.timer {
            let ms = start.elapsed().as_secs_f64() * 1000.0;
            self.say(theme::TIMER, &format!("(Time: {ms:.2} ms)"));
        }
    }

    // -----------------------------------------------------------------------
    // Meta-commands
    // -----------------------------------------------------------------------

    /// Run a meta-command line such as `.tables users`.
    pub fn dispatch_meta(&mut self, line: &str) -> Flow {
        let mut parts = line.split_whitespace();
        let Some(token) = parts.next() else {
            return Flow::Continue;
        };
        let args: Vec<&str> = parts.collect();

        let Some(command) = MetaCommand::lookup(token) else {
            self.say(theme::ERROR, "Unknown command. Type .help");
            return Flow::Continue;
        };

        let result = match command {
            MetaCommand::Help => self.cmd_help(),
            MetaCommand::Exit => self.cmd_exit(),
            MetaCommand::Open => self.cmd_open(&args),
            MetaCommand::Tables => self.cmd_tables(&args),
            MetaCommand::Schema => self.cmd_schema(&args),
            MetaCommand::Dump => self.cmd_dump(),
            MetaCommand::Import => self.cmd_import(&args),
            MetaCommand::Timer => self.cmd_timer(&args),
        };
        match result {
            Ok(flow) => flow,
            Err(e) => {
                self.report(&e);
                Flow::Continue
            }
        }
    }

    fn cmd_help(&mut self) -> Result<Flow> {
        let help = commands::help_text(&self.theme);
        self.emit(&help);
        Ok(Flow::Continue)
    }

    fn cmd_exit(&mut self) -> Result<Flow> {
        self.shutdown();
        Ok(Flow::Exit)
    }

    fn cmd_open(&mut self, args: &[&str]) -> Result<Flow> {
        let [path] = args else {
            return Err(usage(MetaCommand::Open));
        };
        let db = Database::open(path)?;
        let ident = db.ident().to_string();
        // Replacing the handle drops, and so closes, the previous connection.
        *lock_database(&self.db) = db;
        self.emit(&format!("Opened {ident}"));
        Ok(Flow::Continue)
    }

    fn cmd_tables(&mut self, args: &[&str]) -> Result<Flow> {
        let text = {
            let db = lock_database(&self.db);
            match args.first() {
                None => {
                    let names = db.relations()?;
                    if names.is_empty() {
                        "(no tables)".to_string()
                    } else {
                        names.join(" ")
                    }
                }
                Some(name) => {
                    if !db.relation_exists(name)? {
                        format!("(no such table or view: {name})")
                    } else {
                        let rs = db.select_all(name)?;
                        render(&rs.columns, &rs.rows)
                    }
                }
            }
        };
        self.emit(&text);
        Ok(Flow::Continue)
    }

    fn cmd_schema(&mut self, args: &[&str]) -> Result<Flow> {
        let lines: Vec<String> = {
            let db = lock_database(&self.db);
            match args.first() {
                None => {
                    let objects = db.schema()?;
                    if objects.is_empty() {
                        vec!["(empty schema)".to_string()]
                    } else {
                        let mut lines = Vec::with_capacity(objects.len() * 3);
                        for (name, sql) in objects {
                            lines.push(format!("-- {name}"));
                            lines.push(definition(sql));
                            lines.push(String::new());
                        }
                        lines
                    }
                }
                Some(name) => {
                    let defs = db.schema_of(name)?;
                    if defs.is_empty() {
                        vec![format!("(no such object: {name})")]
                    } else {
                        defs.into_iter().map(definition).collect()
                    }
                }
            }
        };
        for line in &lines {
            self.emit(line);
        }
        Ok(Flow::Continue)
    }

    fn cmd_dump(&mut self) -> Result<Flow> {
        let lines = lock_database(&self.db).dump()?;
        for line in &lines {
            self.emit(line);
        }
        Ok(Flow::Continue)
    }

    fn cmd_import(&mut self, args: &[&str]) -> Result<Flow> {
        let [path, table] = args else {
            return Err(usage(MetaCommand::Import));
        };
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                self.say(theme::ERROR, &format!("Error: cannot read {path}: {e}"));
                return Ok(Flow::Continue);
            }
        };

        let result = {
            let mut db = lock_database(&self.db);
            import_csv(db.connection_mut(), BufReader::new(file), table)
        };
        match result {
            Ok(rows) => self.say(
                theme::SUCCESS,
                &format!("Imported {rows} rows into {table}"),
            ),
            Err(e) => self.say(theme::ERROR, &format!("Import failed: {e}")),
        }
        Ok(Flow::Continue)
    }

    fn cmd_timer(&mut self, args: &[&str]) -> Result<Flow> {
        match args {
            ["on"] => self.timer = true,
            ["off"] => self.timer = false,
            _ => return Err(usage(MetaCommand::Timer)),
        }
        let state = if self.timer { "on" } else { "off" };
        self.say(theme::SUCCESS, &format!("Timer: {state}"));
        Ok(Flow::Continue)
    }
}

fn usage(command: MetaCommand) -> Error {
    Error::Usage(format!("Usage: {}", command.usage()))
}

fn definition(sql: Option<String>) -> String {
    let sql = sql.as_deref().unwrap_or("(no schema)").trim();
    format!("{sql}{TERMINATOR}")
}

/// A statement with nothing but terminators and whitespace.
fn is_blank_statement(sql: &str) -> bool {
    sql.chars().all(|c| c == TERMINATOR || c.is_whitespace())
}
