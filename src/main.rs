// SPDX-License-Identifier: MIT
//
// n-shell — a small interactive shell with a byte-level line editor.
//
// This is the binary that wires the two crates together:
//
//   n-term → raw mode, byte source, key decoding, line rendering
//   n-line → line buffer, history, command execution, editor loop
//
// Each keypress flows through:
//
//   stdin → ReadBytes → KeyDecoder → EditorLoop → LineRenderer → stdout
//                                        └─ on Enter → SystemExecutor
//
// The terminal is in raw mode for the whole session and restored however
// it ends. Logging goes to a file, and only when `--log-file` is given:
// the terminal itself is busy being edited.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use n_line::editor::{EditorLoop, SessionEnd};
use n_line::executor::SystemExecutor;
use n_line::options::{EditorOptions, EofPolicy};
use n_line::prompt::HostPrompt;
use n_term::reader::ReadBytes;
use n_term::render::LineRenderer;
use n_term::terminal::{self, Terminal};

// ─── Command line ───────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Keep at most N history entries (oldest are dropped first).
    #[arg(long = "history-size", value_name = "N")]
    history_size: Option<usize>,

    /// Refuse keypresses once the line holds this many bytes.
    #[arg(long = "max-line", value_name = "BYTES")]
    max_line: Option<usize>,

    /// Only let Ctrl-D end the shell when the line is empty.
    #[arg(long = "eof-when-empty")]
    eof_when_empty: bool,

    /// Write logs to this file. No logging without it.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Maximum log level: error, warn, info, debug, or trace.
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: Level,
}

impl Cli {
    fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            history_capacity: self.history_size,
            line_capacity: self.max_line,
            eof_policy: if self.eof_when_empty {
                EofPolicy::WhenEmpty
            } else {
                EofPolicy::Always
            },
        }
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Install a file-backed subscriber. The returned guard flushes the log
/// when dropped, so it must live until the end of `main`.
fn init_logging(path: &Path, level: Level) -> Option<WorkerGuard> {
    let Some(file_name) = path.file_name() else {
        eprintln!("n-shell: log file {} has no file name", path.display());
        return None;
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = match RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy())
        .build(dir)
    {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("n-shell: cannot open log file {}: {e}", path.display());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;
    Some(guard)
}

// ─── Entry ──────────────────────────────────────────────────────────────────

/// Map an `exit` argument onto a process status, the way POSIX shells do.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code.rem_euclid(256)).unwrap_or(u8::MAX)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = cli
        .log_file
        .as_deref()
        .and_then(|path| init_logging(path, cli.log_level));

    let options = cli.editor_options();
    tracing::info!(?options, tty = terminal::is_tty(), "n-shell starting");

    let mut term = Terminal::new();
    let mut editor = EditorLoop::new(
        ReadBytes::stdin(),
        LineRenderer::stdio(),
        SystemExecutor::new(),
        HostPrompt,
        options,
    );

    match editor.run_with_mode(&mut term) {
        Ok(SessionEnd::Exit(code)) => {
            tracing::info!(code, "exit");
            ExitCode::from(exit_status(code))
        }
        Ok(end) => {
            tracing::info!(?end, "session ended");
            // Leave the host shell's prompt on a fresh row.
            println!();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(%e, "session failed");
            eprintln!("n-shell: {e}");
            ExitCode::FAILURE
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
