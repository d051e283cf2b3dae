//! Editor options — limits and policies for one session.
//!
//! | Option             | Default   | Effect                                      |
//! |--------------------|-----------|---------------------------------------------|
//! | `history_capacity` | unbounded | Oldest history entries are evicted past it  |
//! | `line_capacity`    | unbounded | Keypresses past it are refused with a bell  |
//! | `eof_policy`       | `Always`  | When Ctrl-D ends the session                |
//!
//! The binary fills these in from command-line flags; tests build them
//! directly.

/// When an end-of-input keypress (Ctrl-D) ends the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EofPolicy {
    /// Always, whatever is on the line.
    #[default]
    Always,
    /// Only on an empty line; otherwise the keypress is ignored.
    WhenEmpty,
}

impl EofPolicy {
    /// Does end-of-input terminate, given whether the line is empty?
    #[must_use]
    pub const fn terminates(self, line_is_empty: bool) -> bool {
        match self {
            Self::Always => true,
            Self::WhenEmpty => line_is_empty,
        }
    }
}

/// Per-session editor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorOptions {
    /// Maximum number of history entries. `None` = unbounded.
    pub history_capacity: Option<usize>,

    /// Maximum line length in bytes. `None` = unbounded.
    pub line_capacity: Option<usize>,

    /// When Ctrl-D ends the session.
    pub eof_policy: EofPolicy,
}
