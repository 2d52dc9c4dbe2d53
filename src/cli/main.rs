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

mod completer;
mod highlighter;
mod prompt;

use std::io::Stdout;
use std::process::ExitCode;

use clap::Parser;
use reedline::{
    default_emacs_keybindings, DescriptionMode, Emacs, HistoryItem, IdeMenu, KeyCode,
    KeyModifiers, MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};
use tracing::{debug, warn};

use query_terminal::commands::banner;
use query_terminal::config::MEMORY;
use query_terminal::theme::{self, Theme};
use query_terminal::{Config, Flow, HistoryFile, Session};

use completer::SqlCompleter;
use highlighter::SqlHighlighter;
use prompt::SessionPrompt;

#[derive(Parser)]
#[command(name = "qt", version, about = "Interactive SQLite console")]
struct Args {
    /// Database file to open, or :memory: for a private in-memory database
    #[arg(default_value = MEMORY)]
    database: String,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("QT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let config = Config::from_env();
    let theme = Theme::new(config.color);
    let history = HistoryFile::load(&config.history_path, config.history_len);

    let session = match Session::open(&args.database, std::io::stdout()) {
        Ok(session) => session.with_history(history).with_theme(theme),
        Err(e) => {
            eprintln!(
                "{}",
                theme.paint(theme::ERROR, &format!("Error: cannot open {}: {e}", args.database))
            );
            return ExitCode::FAILURE;
        }
    };

    println!("{}", banner(&theme));
    run_repl(session);
    ExitCode::SUCCESS
}

fn build_editor(session: &Session<Stdout>) -> Reedline {
    let completer = SqlCompleter::new(session.database());

    let hinter = reedline::DefaultHinter::default()
        .with_style(nu_ansi_term::Style::new().fg(nu_ansi_term::Color::DarkGray));

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(20)
        .with_max_completion_width(60)
        .with_max_completion_height(10)
        .with_padding(1)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(20)
        .with_max_description_width(40)
        .with_default_border();

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::SHIFT,
        KeyCode::BackTab,
        ReedlineEvent::MenuPrevious,
    );

    let mut editor = Reedline::create()
        .with_completer(Box::new(completer))
        .with_highlighter(Box::new(SqlHighlighter))
        .with_hinter(Box::new(hinter))
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    // Up-arrow recall of earlier sessions; the session owns the file.
    if let Some(history) = session.history() {
        for entry in history.entries() {
            if let Err(e) = editor
                .history_mut()
                .save(HistoryItem::from_command_line(entry.as_str()))
            {
                debug!(error = %e, "history entry not recalled");
                break;
            }
        }
    }
    editor
}

fn run_repl(mut session: Session<Stdout>) {
    let mut editor = build_editor(&session);

    loop {
        let prompt = SessionPrompt::new(session.prompt());
        match editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                if session.handle_line(&line) == Flow::Exit {
                    break;
                }
            }
            Ok(Signal::CtrlD) | Ok(Signal::CtrlC) => {
                session.shutdown();
                break;
            }
            Err(e) => {
                warn!(error = %e, "line editor failed");
                session.shutdown();
                break;
            }
        }
    }
}
