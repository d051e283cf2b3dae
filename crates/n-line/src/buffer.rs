//! The edit line — bytes plus a cursor.
//!
//! [`LineBuffer`] holds the command the user is typing. It is byte-oriented:
//! the decoder only ever produces printable ASCII, and cursor arithmetic is
//! plain byte offsets.
//!
//! The one invariant is `0 <= cursor <= len`. Every operation keeps it,
//! including the edges: backspace at offset 0 does nothing, and replacing
//! the content parks the cursor at the new end.

use std::borrow::Cow;

use thiserror::Error;

// ---------------------------------------------------------------------------
// BufferFull
// ---------------------------------------------------------------------------

/// An insert was refused because the buffer is at its configured cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("line is full ({capacity} bytes)")]
pub struct BufferFull {
    /// The cap that was hit.
    pub capacity: usize,
}

// ---------------------------------------------------------------------------
// LineBuffer
// ---------------------------------------------------------------------------

/// An editable line with a cursor.
#[derive(Debug, Clone, Default)]
pub struct LineBuffer {
    content: Vec<u8>,

    /// Byte offset into `content`, `0..=content.len()`.
    cursor: usize,

    /// Maximum length in bytes. `None` = unbounded.
    capacity: Option<usize>,
}

impl LineBuffer {
    /// Create an empty, unbounded line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            content: Vec::new(),
            cursor: 0,
            capacity: None,
        }
    }

    /// Create an empty line that refuses inserts beyond `capacity` bytes.
    #[must_use]
    pub const fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            content: Vec::new(),
            cursor: 0,
            capacity,
        }
    }

    /// Cursor position (byte offset).
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// True if the line has no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// The configured cap, if any.
    #[inline]
    #[must_use]
    pub const fn capacity_limit(&self) -> Option<usize> {
        self.capacity
    }

    /// The current content, for rendering. No side effects.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &[u8] {
        &self.content
    }

    /// The content as text, with invalid UTF-8 replaced.
    #[must_use]
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }

    /// Insert a byte at the cursor and advance past it.
    ///
    /// # Errors
    ///
    /// Returns [`BufferFull`] if a cap is set and already reached. The
    /// buffer is left unchanged.
    pub fn insert(&mut self, byte: u8) -> Result<(), BufferFull> {
        if let Some(capacity) = self.capacity {
            if self.content.len() >= capacity {
                return Err(BufferFull { capacity });
            }
        }
        self.content.insert(self.cursor, byte);
        self.cursor += 1;
        Ok(())
    }

    /// Delete the byte before the cursor (backspace).
    /// Returns `true` if a byte was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.content.remove(self.cursor);
        true
    }

    /// Clear the content and reset the cursor.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Replace the content wholesale, cursor at the end.
    ///
    /// Used to load a history entry. The cap does not apply: an entry was
    /// accepted once already.
    pub fn set_content(&mut self, bytes: &[u8]) {
        self.content.clear();
        self.content.extend_from_slice(bytes);
        self.cursor = self.content.len();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &[u8]) -> LineBuffer {
        let mut line = LineBuffer::new();
        for &b in text {
            line.insert(b).unwrap();
        }
        line
    }

    /// Invariant check used by the sequence tests.
    fn assert_cursor_in_range(line: &LineBuffer) {
        assert!(
            line.cursor() <= line.len(),
            "cursor {} past end {}",
            line.cursor(),
            line.len()
        );
    }

    // -- Basic operations ---------------------------------------------------

    #[test]
    fn new_is_empty() {
        let line = LineBuffer::new();
        assert!(line.is_empty());
        assert_eq!(line.len(), 0);
        assert_eq!(line.cursor(), 0);
        assert_eq!(line.snapshot(), b"");
    }

    #[test]
    fn default_is_new() {
        let line = LineBuffer::default();
        assert!(line.is_empty());
        assert_eq!(line.capacity_limit(), None);
    }

    #[test]
    fn insert_advances_cursor() {
        let line = typed(b"hi");
        assert_eq!(line.snapshot(), b"hi");
        assert_eq!(line.cursor(), 2);
    }

    #[test]
    fn delete_back_removes_before_cursor() {
        let mut line = typed(b"hi");
        assert!(line.delete_back());
        assert_eq!(line.snapshot(), b"h");
        assert_eq!(line.cursor(), 1);
    }

    #[test]
    fn delete_back_on_empty_is_noop() {
        let mut line = LineBuffer::new();
        assert!(!line.delete_back());
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn delete_back_until_empty_then_noop() {
        let mut line = typed(b"ab");
        assert!(line.delete_back());
        assert!(line.delete_back());
        assert!(!line.delete_back());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn clear_resets() {
        let mut line = typed(b"echo");
        line.clear();
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn set_content_puts_cursor_at_end() {
        let mut line = typed(b"x");
        line.set_content(b"git status");
        assert_eq!(line.snapshot(), b"git status");
        assert_eq!(line.cursor(), 10);
    }

    #[test]
    fn set_content_empty() {
        let mut line = typed(b"abc");
        line.set_content(b"");
        assert!(line.is_empty());
        assert_eq!(line.cursor(), 0);
    }

    #[test]
    fn to_string_lossy_reads_text() {
        assert_eq!(typed(b"ls -l").to_string_lossy(), "ls -l");
    }

    #[test]
    fn snapshot_has_no_side_effects() {
        let line = typed(b"pwd");
        let _ = line.snapshot();
        let _ = line.snapshot();
        assert_eq!(line.cursor(), 3);
        assert_eq!(line.snapshot(), b"pwd");
    }

    // -- Capacity -----------------------------------------------------------

    #[test]
    fn capped_buffer_refuses_overflow() {
        let mut line = LineBuffer::with_capacity_limit(Some(2));
        line.insert(b'a').unwrap();
        line.insert(b'b').unwrap();
        assert_eq!(line.insert(b'c'), Err(BufferFull { capacity: 2 }));
        assert_eq!(line.snapshot(), b"ab");
        assert_eq!(line.cursor(), 2);
    }

    #[test]
    fn capped_buffer_accepts_after_delete() {
        let mut line = LineBuffer::with_capacity_limit(Some(1));
        line.insert(b'a').unwrap();
        line.delete_back();
        line.insert(b'b').unwrap();
        assert_eq!(line.snapshot(), b"b");
    }

    #[test]
    fn set_content_ignores_cap() {
        let mut line = LineBuffer::with_capacity_limit(Some(2));
        line.set_content(b"longer");
        assert_eq!(line.cursor(), 6);
    }

    #[test]
    fn buffer_full_message() {
        assert_eq!(
            BufferFull { capacity: 4096 }.to_string(),
            "line is full (4096 bytes)"
        );
    }

    // -- Invariant ----------------------------------------------------------

    #[test]
    fn cursor_stays_in_range_over_mixed_sequence() {
        // Deterministic pseudo-random insert/delete mix.
        let mut line = LineBuffer::new();
        let mut seed: u32 = 0x2545_F491;
        for _ in 0..2_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            if seed % 3 == 0 {
                line.delete_back();
            } else {
                line.insert(b'a' + (seed % 26) as u8).unwrap();
            }
            assert_cursor_in_range(&line);
        }
    }

    #[test]
    fn cursor_stays_in_range_when_deleting_past_start() {
        let mut line = typed(b"abc");
        for _ in 0..10 {
            line.delete_back();
            assert_cursor_in_range(&line);
        }
        assert_eq!(line.cursor(), 0);
    }
}
