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

//! Interactive SQLite console.
//!
//! The library holds everything except the terminal: the statement buffer,
//! meta-commands, completion, execution and result rendering. The `qt`
//! binary wires a [`Session`] to a line editor.

pub mod buffer;
pub mod commands;
pub mod completion;
pub mod config;
pub mod database;
pub mod dump;
pub mod error;
pub mod history;
pub mod import;
pub mod render;
pub mod session;
pub mod theme;

pub use config::Config;
pub use database::{Database, SharedDatabase};
pub use error::{Error, Result};
pub use history::HistoryFile;
pub use session::{Flow, Session};
pub use theme::Theme;
