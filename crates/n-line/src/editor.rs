//! Editor loop — reads bytes, edits the line, runs commands.
//!
//! [`EditorLoop`] owns one session: a [`KeyDecoder`], the [`LineBuffer`]
//! being edited, and the [`HistoryStore`]. Everything it talks to is behind
//! a trait so tests can drive it without a terminal:
//!
//! ```text
//!   ByteSource ──▶ KeyDecoder ──▶ handle(event) ──▶ Render
//!                                      │
//!                                      └──▶ Executor (on Submit)
//! ```
//!
//! | Event         | Action                                                 |
//! |---------------|--------------------------------------------------------|
//! | `Printable`   | Insert at the cursor (bell if the line is full)        |
//! | `DeleteBack`  | Delete before the cursor                               |
//! | `Submit`      | Newline, execute, record in history, clear the line    |
//! | `ClearScreen` | Replace the line with `clear`, then submit it          |
//! | `HistoryPrev` | Load the previous history entry                        |
//! | `HistoryNext` | Load the next history entry, if there is one           |
//! | `EndOfInput`  | End the session (subject to [`EofPolicy`])             |
//! | `Unknown`     | Ignored                                                |
//!
//! After every event that leaves the loop editing, the prompt and line are
//! redrawn. Submitting an empty line only redraws.
//!
//! Under [`run_with_mode`](EditorLoop::run_with_mode) the terminal is raw
//! while keys are read and suspended back to its original mode while each
//! command runs, so programs get echo, line editing, and Ctrl-C.
//!
//! [`EofPolicy`]: crate::options::EofPolicy

use n_term::input::{InputEvent, KeyDecoder};
use n_term::reader::ByteSource;
use n_term::render::Render;
use n_term::terminal::{ModeControl, ModeError};

use crate::buffer::LineBuffer;
use crate::error::SessionError;
use crate::executor::{Executor, Outcome};
use crate::history::HistoryStore;
use crate::options::EditorOptions;
use crate::prompt::PromptSource;

/// Command run by the clear-screen key.
const CLEAR_COMMAND: &[u8] = b"clear";

/// Prefix for execution errors shown to the user.
const REPORT_PREFIX: &str = "n-shell";

/// Mode control for sessions run without one: every switch is a no-op.
struct Unmanaged;

impl ModeControl for Unmanaged {
    fn acquire_raw(&mut self) -> Result<(), ModeError> {
        Ok(())
    }

    fn restore(&mut self) -> Result<(), ModeError> {
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), ModeError> {
        Ok(())
    }

    fn resume(&mut self) -> Result<(), ModeError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user pressed Ctrl-D.
    EndOfInput,
    /// The byte source ran dry (e.g. piped input exhausted).
    StreamClosed,
    /// The `exit` built-in ran with this code.
    Exit(i32),
}

/// Where the loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Reading keys and editing the line.
    #[default]
    Editing,
    /// The session is over. Further events are ignored.
    Terminated(SessionEnd),
}

// ---------------------------------------------------------------------------
// EditorLoop
// ---------------------------------------------------------------------------

/// One interactive line-editing session.
pub struct EditorLoop<S, R, E, P> {
    source: S,
    renderer: R,
    executor: E,
    prompt: P,

    decoder: KeyDecoder,
    line: LineBuffer,
    history: HistoryStore,

    options: EditorOptions,
    state: LoopState,
}

impl<S, R, E, P> EditorLoop<S, R, E, P>
where
    S: ByteSource,
    R: Render,
    E: Executor,
    P: PromptSource,
{
    /// Create a session in the `Editing` state with an empty line and
    /// history.
    pub fn new(source: S, renderer: R, executor: E, prompt: P, options: EditorOptions) -> Self {
        Self {
            source,
            renderer,
            executor,
            prompt,
            decoder: KeyDecoder::new(),
            line: LineBuffer::with_capacity_limit(options.line_capacity),
            history: HistoryStore::with_capacity_limit(options.history_capacity),
            options,
            state: LoopState::Editing,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// The line being edited.
    #[must_use]
    pub const fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Submitted lines so far.
    #[must_use]
    pub const fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Current loop state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// The renderer the session draws through.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The executor submitted lines are handed to.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    // -- Running ------------------------------------------------------------

    /// Run until the session ends.
    ///
    /// Draws the initial prompt, then reads and handles one byte at a time.
    /// Does not touch the terminal mode; see [`run_with_mode`](Self::run_with_mode).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Read`] if the byte source fails and
    /// [`SessionError::Render`] if the terminal cannot be written.
    pub fn run(&mut self) -> Result<SessionEnd, SessionError> {
        self.run_in(&mut Unmanaged)
    }

    fn run_in<M: ModeControl>(&mut self, mode: &mut M) -> Result<SessionEnd, SessionError> {
        if let LoopState::Terminated(end) = self.state {
            return Ok(end);
        }

        self.redraw()?;
        loop {
            let Some(byte) = self.source.read_byte().map_err(SessionError::Read)? else {
                tracing::debug!("input stream closed");
                self.state = LoopState::Terminated(SessionEnd::StreamClosed);
                return Ok(SessionEnd::StreamClosed);
            };
            if let Some(end) = self.feed_in(byte, mode)? {
                return Ok(end);
            }
        }
    }

    /// Enter raw mode, [`run`](Self::run), and restore the mode however the
    /// loop ends. Raw mode is suspended while each command executes.
    ///
    /// If both the loop and the restore fail, the loop's error is returned
    /// and the restore failure is logged and reported on the error stream.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Mode`] if raw mode cannot be entered (the
    /// loop does not run), cannot be left, or cannot be suspended around a
    /// command, and any error from `run`.
    pub fn run_with_mode<M: ModeControl>(
        &mut self,
        mode: &mut M,
    ) -> Result<SessionEnd, SessionError> {
        mode.acquire_raw()?;
        let result = self.run_in(mode);

        match (result, mode.restore()) {
            (result, Ok(())) => result,
            (Ok(_), Err(restore)) => Err(restore.into()),
            (Err(err), Err(restore)) => {
                tracing::error!(%restore, "terminal mode not restored");
                let _ = self
                    .renderer
                    .report(&format!("{REPORT_PREFIX}: {restore}"));
                Err(err)
            }
        }
    }

    /// Decode one byte and handle the events it completes.
    ///
    /// Returns `Some` once the session has ended.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Render`] if the terminal cannot be written.
    pub fn feed(&mut self, byte: u8) -> Result<Option<SessionEnd>, SessionError> {
        self.feed_in(byte, &mut Unmanaged)
    }

    fn feed_in<M: ModeControl>(
        &mut self,
        byte: u8,
        mode: &mut M,
    ) -> Result<Option<SessionEnd>, SessionError> {
        for event in self.decoder.decode(byte) {
            if let Some(end) = self.handle_in(event, mode)? {
                return Ok(Some(end));
            }
        }
        Ok(None)
    }

    /// Apply one input event.
    ///
    /// Returns `Some` once the session has ended. Events arriving after
    /// that are ignored and return the same end.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Render`] if the terminal cannot be written.
    pub fn handle(&mut self, event: InputEvent) -> Result<Option<SessionEnd>, SessionError> {
        self.handle_in(event, &mut Unmanaged)
    }

    fn handle_in<M: ModeControl>(
        &mut self,
        event: InputEvent,
        mode: &mut M,
    ) -> Result<Option<SessionEnd>, SessionError> {
        if let LoopState::Terminated(end) = self.state {
            return Ok(Some(end));
        }
        tracing::trace!(?event, "dispatch");

        match event {
            InputEvent::Printable(byte) => {
                if let Err(full) = self.line.insert(byte) {
                    tracing::debug!(%full, "keypress refused");
                    self.renderer.bell().map_err(SessionError::Render)?;
                }
            }
            InputEvent::DeleteBack => {
                self.line.delete_back();
            }
            InputEvent::Submit => {
                if let Some(end) = self.submit(mode)? {
                    return Ok(Some(end));
                }
            }
            InputEvent::ClearScreen => {
                self.line.set_content(CLEAR_COMMAND);
                if let Some(end) = self.submit(mode)? {
                    return Ok(Some(end));
                }
            }
            InputEvent::HistoryPrev => {
                if let Some(entry) = self.history.prev() {
                    self.line.set_content(entry);
                }
            }
            InputEvent::HistoryNext => {
                if let Some(entry) = self.history.next() {
                    self.line.set_content(entry);
                }
            }
            InputEvent::EndOfInput => {
                if self.options.eof_policy.terminates(self.line.is_empty()) {
                    tracing::debug!("end of input");
                    return Ok(Some(self.terminate(SessionEnd::EndOfInput)));
                }
            }
            InputEvent::Unknown => {}
        }

        self.redraw()?;
        Ok(None)
    }

    // -- Internals ----------------------------------------------------------

    fn redraw(&mut self) -> Result<(), SessionError> {
        let prompt = self.prompt.current_prompt();
        self.renderer
            .draw(&prompt, self.line.snapshot(), self.line.cursor())
            .map_err(SessionError::Render)
    }

    /// Run the current line with the terminal suspended out of raw mode.
    /// An empty line runs nothing.
    fn submit<M: ModeControl>(
        &mut self,
        mode: &mut M,
    ) -> Result<Option<SessionEnd>, SessionError> {
        if self.line.is_empty() {
            return Ok(None);
        }

        self.renderer.newline().map_err(SessionError::Render)?;

        let command = self.line.to_string_lossy().into_owned();
        tracing::debug!(%command, "submit");
        mode.suspend()?;
        let result = self.executor.execute(&command);
        mode.resume()?;

        self.history.append(self.line.snapshot());
        self.line.clear();

        match result {
            Ok(Outcome::Done) => Ok(None),
            Ok(Outcome::Exit(code)) => {
                tracing::debug!(code, "exit requested");
                Ok(Some(self.terminate(SessionEnd::Exit(code))))
            }
            Err(err) => {
                tracing::warn!(%err, %command, "command failed");
                self.renderer
                    .report(&format!("{REPORT_PREFIX}: {err}"))
                    .map_err(SessionError::Render)?;
                Ok(None)
            }
        }
    }

    const fn terminate(&mut self, end: SessionEnd) -> SessionEnd {
        self.state = LoopState::Terminated(end);
        end
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
