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

// Session configuration.
//
// The command line only carries the database identifier; everything else
// comes from the environment with fixed defaults.

use std::path::PathBuf;

/// Identifier that selects a private in-memory database.
pub const MEMORY: &str = ":memory:";

pub const HISTORY_FILE: &str = ".qt_history";
pub const HISTORY_LEN: usize = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where history entries are persisted.
    pub history_path: PathBuf,
    /// Maximum number of retained history entries.
    pub history_len: usize,
    /// Whether status lines carry ANSI colors.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            history_path: home_dir().join(HISTORY_FILE),
            history_len: HISTORY_LEN,
            color: true,
        }
    }
}

impl Config {
    /// Defaults overridden by `QT_HISTORY`, `QT_HISTORY_SIZE` and `NO_COLOR`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();
        if let Some(path) = lookup("QT_HISTORY").filter(|p| !p.is_empty()) {
            config.history_path = PathBuf::from(path);
        }
        if let Some(len) = lookup("QT_HISTORY_SIZE").and_then(|s| s.trim().parse().ok()) {
            config.history_len = len;
        }
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }
        config
    }
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
