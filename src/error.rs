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

/// Errors produced by the session engine.
///
/// Nothing here reaches the process boundary: the session turns every
/// variant into an inline message and keeps reading input.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine failure (malformed SQL, constraint violation, missing relation).
    #[error("{0}")]
    Sql(#[from] rusqlite::Error),
    /// File system failure (CSV source, database directory, history file).
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Malformed CSV input.
    #[error("{0}")]
    Csv(#[from] csv::Error),
    /// More than one statement in a single submission.
    #[error("You can only execute one statement at a time.")]
    MultipleStatements,
    /// Bad or missing meta-command arguments. The message is shown verbatim.
    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
