//! Command history — submitted lines and a browsing cursor.
//!
//! [`HistoryStore`] records every non-empty line the user submits, oldest
//! first, duplicates included. A cursor walks it with Up/Down:
//!
//! - `cursor == len` is the *live* position: the user is editing a new line,
//!   not looking at history.
//! - [`prev`](HistoryStore::prev) steps toward older entries and stops at the
//!   oldest one (it keeps returning it).
//! - [`next`](HistoryStore::next) steps toward newer entries and saturates at
//!   the newest one: past it there is nothing to return, and it never wraps.
//! - [`append`](HistoryStore::append) jumps back to the live position.
//!
//! The store is owned by one editor session. Growth is unbounded unless a
//! capacity is set, in which case the oldest entries are evicted first.

use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// HistoryStore
// ---------------------------------------------------------------------------

/// Ordered list of submitted lines with a browsing cursor.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: VecDeque<Vec<u8>>,

    /// Browsing position, `0..=entries.len()`.
    cursor: usize,

    /// Maximum number of entries kept. `None` = unbounded.
    capacity: Option<usize>,
}

impl HistoryStore {
    /// Create an empty, unbounded history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity: None,
        }
    }

    /// Create an empty history that keeps at most `capacity` entries.
    ///
    /// A capacity of zero records nothing.
    #[must_use]
    pub const fn with_capacity_limit(capacity: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            capacity,
        }
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Browsing cursor. Equal to [`len`](Self::len) at the live position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// True if the cursor is at the live position.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.cursor == self.entries.len()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.iter().map(Vec::as_slice)
    }

    /// Record a submitted line and return to the live position.
    ///
    /// Empty lines are not recorded, but the cursor still resets.
    pub fn append(&mut self, line: &[u8]) {
        if !line.is_empty() && self.capacity != Some(0) {
            self.entries.push_back(line.to_vec());
            if let Some(capacity) = self.capacity {
                while self.entries.len() > capacity {
                    self.entries.pop_front();
                }
            }
        }
        self.reset_cursor();
    }

    /// Step to the previous (older) entry.
    ///
    /// At the oldest entry the cursor stays put and that entry is returned
    /// again. Returns `None` only when the history is empty.
    pub fn prev(&mut self) -> Option<&[u8]> {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.entries.get(self.cursor).map(Vec::as_slice)
    }

    /// Step to the next (newer) entry.
    ///
    /// Returns `None` without moving when already at the newest entry, at
    /// the live position, or when the history is empty.
    #[allow(clippy::should_implement_trait)] // Cursor step, not an iterator.
    pub fn next(&mut self) -> Option<&[u8]> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            return self.entries.get(self.cursor).map(Vec::as_slice);
        }
        None
    }

    /// Return the cursor to the live position.
    pub fn reset_cursor(&mut self) {
        self.cursor = self.entries.len();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
