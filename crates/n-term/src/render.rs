// SPDX-License-Identifier: MIT
//
// Line renderer — prompt + edit line, redrawn in place.
//
// There is no frame buffer here. The shell owns the rows holding the prompt
// and the line being typed: one row usually, several once the line wraps
// past the terminal width. Every redraw climbs back to the first of those
// rows, writes the prompt and the line, erases everything below, and then
// moves the cursor to the logical cursor position.
//
// The renderer remembers the last frame and where it left the cursor in
// it. An identical redraw is skipped, and anything that moves the terminal
// off the frame (a newline, an error report) forgets it so the next draw
// starts on a fresh row.
//
// Widths are in bytes: prompts and lines are ASCII, one column per byte.

use std::io::{self, Stderr, Stdout, Write};

use crate::ansi;
use crate::terminal;

/// Output side of the line editor.
pub trait Render {
    /// Redraw `prompt` followed by `line`, with the terminal cursor placed
    /// at byte offset `cursor` within `line`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn draw(&mut self, prompt: &str, line: &[u8], cursor: usize) -> io::Result<()>;

    /// Move to the start of a fresh row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn newline(&mut self) -> io::Result<()>;

    /// Print a non-fatal error message on its own row.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the error stream fails.
    fn report(&mut self, message: &str) -> io::Result<()>;

    /// Audible feedback for a rejected keypress.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the terminal fails.
    fn bell(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Width lookup for a terminal that never wraps.
const fn unbounded() -> Option<usize> {
    None
}

/// What the last draw put on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Frame {
    /// Prompt followed by the line.
    text: Vec<u8>,
    /// Cursor offset into `text`.
    cursor: usize,
    /// Terminal width used for the layout. `None` = never wraps.
    width: Option<usize>,
}

/// Row positions within the last frame, counted from its first row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Rows {
    /// Row the terminal cursor was left on.
    cursor: usize,
    /// Row the frame ends on.
    end: usize,
}

/// ANSI line renderer over an output and an error stream.
///
/// # Example
///
/// ```
/// use n_term::render::{LineRenderer, Render};
///
/// let mut r = LineRenderer::new(Vec::new(), Vec::new());
/// r.draw("> ", b"ls", 2)?;
/// assert_eq!(r.output(), b"\r> ls\x1b[J");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct LineRenderer<W, E> {
    out: W,
    err: E,
    /// Terminal width lookup, asked before every draw.
    width: fn() -> Option<usize>,
    last: Option<Frame>,
    rows: Rows,
}

impl<W: Write, E: Write> LineRenderer<W, E> {
    /// Create a renderer writing lines to `out` and reports to `err`.
    ///
    /// Lines are laid out as if the terminal were infinitely wide; use
    /// [`with_width`](Self::with_width) to wrap.
    pub const fn new(out: W, err: E) -> Self {
        Self {
            out,
            err,
            width: unbounded,
            last: None,
            rows: Rows { cursor: 0, end: 0 },
        }
    }

    /// Use `width` to learn the terminal width before each draw.
    #[must_use]
    pub fn with_width(mut self, width: fn() -> Option<usize>) -> Self {
        self.width = width;
        self
    }

    /// The output stream.
    pub const fn output(&self) -> &W {
        &self.out
    }

    /// The error stream.
    pub const fn errors(&self) -> &E {
        &self.err
    }

    /// Encode one draw, starting from wherever the previous one left the
    /// cursor.
    fn encode(&self, frame: &Frame) -> io::Result<(Vec<u8>, Rows)> {
        let end = frame.text.len();
        let target = frame.cursor;

        let mut out = Vec::with_capacity(end + 16);
        ansi::cursor_up(&mut out, self.rows.cursor)?;
        ansi::carriage_return(&mut out)?;
        out.extend_from_slice(&frame.text);

        // A frame ending exactly on the right margin leaves the cursor in
        // the pending-wrap state; step onto the next row explicitly.
        if let Some(w) = frame.width {
            if end > 0 && end % w == 0 {
                ansi::newline(&mut out)?;
            }
        }
        ansi::erase_below(&mut out)?;

        let (rows, col) = match frame.width {
            Some(w) => (
                Rows {
                    cursor: target / w,
                    end: end / w,
                },
                target % w,
            ),
            None => (Rows::default(), target),
        };

        if rows.cursor == rows.end {
            ansi::cursor_left(&mut out, end - target)?;
        } else {
            ansi::cursor_up(&mut out, rows.end - rows.cursor)?;
            ansi::carriage_return(&mut out)?;
            ansi::cursor_right(&mut out, col)?;
        }
        Ok((out, rows))
    }

    /// Forget the last frame: the cursor is on a fresh row.
    fn detach(&mut self) {
        self.last = None;
        self.rows = Rows::default();
    }
}

impl LineRenderer<Stdout, Stderr> {
    /// Renderer over the process's stdout and stderr, wrapping at the
    /// terminal width.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr()).with_width(terminal::width)
    }
}

impl<W: Write, E: Write> Render for LineRenderer<W, E> {
    fn draw(&mut self, prompt: &str, line: &[u8], cursor: usize) -> io::Result<()> {
        let mut text = Vec::with_capacity(prompt.len() + line.len());
        text.extend_from_slice(prompt.as_bytes());
        text.extend_from_slice(line);
        let frame = Frame {
            text,
            cursor: prompt.len() + cursor.min(line.len()),
            width: (self.width)().filter(|&w| w > 0),
        };
        if self.last.as_ref() == Some(&frame) {
            return Ok(());
        }

        let (bytes, rows) = self.encode(&frame)?;
        self.out.write_all(&bytes)?;
        self.out.flush()?;
        self.last = Some(frame);
        self.rows = rows;
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        ansi::cursor_down(&mut self.out, self.rows.end - self.rows.cursor)?;
        ansi::newline(&mut self.out)?;
        self.out.flush()?;
        self.detach();
        Ok(())
    }

    fn report(&mut self, message: &str) -> io::Result<()> {
        self.err.write_all(message.as_bytes())?;
        ansi::newline(&mut self.err)?;
        self.err.flush()?;
        self.detach();
        Ok(())
    }

    fn bell(&mut self) -> io::Result<()> {
        ansi::bell(&mut self.out)?;
        self.out.flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
