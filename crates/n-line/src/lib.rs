//! # n-line — Line editor core for n-shell
//!
//! Everything above the terminal: what the user is typing, what they typed
//! before, and what happens when they press Enter.
//!
//! - **[`buffer`]** — `LineBuffer`, the bytes being edited and a cursor
//! - **[`history`]** — `HistoryStore`, submitted lines with Up/Down browsing
//! - **[`executor`]** — `Executor` trait, `cd`/`exit` built-ins, external programs
//! - **[`prompt`]** — `PromptSource` trait and the host-name prompt
//! - **[`options`]** — `EditorOptions`: history and line limits, Ctrl-D policy
//! - **[`error`]** — `ExecError` and `SessionError`
//! - **[`editor`]** — `EditorLoop`, which drives a session end to end
//!
//! Terminal concerns (raw mode, key decoding, drawing) live in `n-term`.

pub mod buffer;
pub mod editor;
pub mod error;
pub mod executor;
pub mod history;
pub mod options;
pub mod prompt;
