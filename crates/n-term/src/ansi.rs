// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit — that's the renderer's job. This module
// just knows the byte-level encoding of the few terminal commands a
// single-line editor needs.
//
// All functions return `io::Result` propagated from the underlying writer.
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to column 0 of the current row (carriage return).
#[inline]
pub fn carriage_return(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r")
}

/// Move the cursor `n` columns left (CUB). Writes nothing for `n == 0`,
/// since `CSI 0 D` moves one column on most terminals.
#[inline]
pub fn cursor_left(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}D")
}

/// Move the cursor `n` columns right (CUF). Writes nothing for `n == 0`.
#[inline]
pub fn cursor_right(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}C")
}

/// Move the cursor `n` rows up (CUU). Writes nothing for `n == 0`.
#[inline]
pub fn cursor_up(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}A")
}

/// Move the cursor `n` rows down (CUD). Writes nothing for `n == 0`.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: usize) -> io::Result<()> {
    if n == 0 {
        return Ok(());
    }
    write!(w, "\x1b[{n}B")
}

/// Start a new line. Always CR LF, so it is correct with or without
/// output post-processing.
#[inline]
pub fn newline(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\r\n")
}

// ─── Erase ───────────────────────────────────────────────────────────────────

/// Erase from the cursor to the end of the screen (ED 0). Clears the rest
/// of the current row and every row below it.
#[inline]
pub fn erase_below(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[J")
}

/// Ring the terminal bell (BEL).
#[inline]
pub fn bell(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x07")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
