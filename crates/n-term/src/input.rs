// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into logical line-editing events. The shell only
// needs a handful of keys, so this is a deliberately small decoder:
//
// - Printable ASCII (0x20..=0x7E)
// - Enter, Backspace, Ctrl-D, Ctrl-L, Ctrl-N, Ctrl-P
// - Up / Down arrows as CSI sequences (`ESC [ A`, `ESC [ B`)
//
// # Design
//
// Decoding is incremental: one byte in, zero or more events out. A byte
// that starts an escape sequence produces nothing until the sequence
// completes or is abandoned, so the caller never has to read a fixed
// number of bytes (and never blocks waiting for bytes that are not
// coming). Chunk boundaries are irrelevant — `ESC` in one `read()` and
// `[A` in the next decode exactly like `ESC [ A` in a single chunk.
//
// An escape that turns out not to start a CSI sequence is reported as
// `Unknown`, and the byte that broke it is decoded again from the idle
// state. That keeps `ESC a` from swallowing the `a`.

use smallvec::{SmallVec, smallvec};

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded line-editing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable ASCII byte (0x20..=0x7E).
    Printable(u8),
    /// Enter (CR or LF).
    Submit,
    /// Backspace (DEL or BS).
    DeleteBack,
    /// End of transmission (Ctrl-D).
    EndOfInput,
    /// Form feed (Ctrl-L).
    ClearScreen,
    /// Up arrow or Ctrl-P.
    HistoryPrev,
    /// Down arrow or Ctrl-N.
    HistoryNext,
    /// Any byte or sequence without a mapping.
    Unknown,
}

/// Where the decoder is inside an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecoderState {
    /// Not inside a sequence.
    #[default]
    Idle,
    /// Saw `ESC`.
    SawEscape,
    /// Saw `ESC [`.
    SawEscapeBracket,
}

/// Events produced by a single byte.
///
/// Empty while a sequence is pending. Holds two events only when an
/// abandoned escape is followed by a byte that decodes on its own.
pub type Decoded = SmallVec<[InputEvent; 2]>;

// ─── Byte Constants ─────────────────────────────────────────────────────────

const ESC: u8 = 0x1B;
const EOT: u8 = 0x04;
const BS: u8 = 0x08;
const LF: u8 = 0x0A;
const FF: u8 = 0x0C;
const CR: u8 = 0x0D;
const CTRL_N: u8 = 0x0E;
const CTRL_P: u8 = 0x10;
const DEL: u8 = 0x7F;

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Incremental key decoder.
///
/// Feed bytes one at a time with [`decode`](KeyDecoder::decode), or a whole
/// chunk with [`decode_all`](KeyDecoder::decode_all).
///
/// # Example
///
/// ```
/// use n_term::input::{InputEvent, KeyDecoder};
///
/// let mut decoder = KeyDecoder::new();
/// assert!(decoder.decode(0x1B).is_empty());
/// assert!(decoder.decode(b'[').is_empty());
/// assert_eq!(decoder.decode(b'A').as_slice(), &[InputEvent::HistoryPrev]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KeyDecoder {
    state: DecoderState,
}

impl KeyDecoder {
    /// Create a decoder in the idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DecoderState::Idle,
        }
    }

    /// Current decoder state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> DecoderState {
        self.state
    }

    /// Is an escape sequence in progress?
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !matches!(self.state, DecoderState::Idle)
    }

    /// Drop any partial sequence and return to idle.
    pub const fn reset(&mut self) {
        self.state = DecoderState::Idle;
    }

    /// Decode one byte.
    ///
    /// Returns no events while a sequence is pending, one event in the
    /// common case, and two when an abandoned escape is followed by a byte
    /// that stands on its own.
    pub fn decode(&mut self, byte: u8) -> Decoded {
        match self.state {
            DecoderState::Idle => self.decode_idle(byte).into_iter().collect(),
            DecoderState::SawEscape => {
                if byte == b'[' {
                    self.state = DecoderState::SawEscapeBracket;
                    return SmallVec::new();
                }
                tracing::trace!(byte, "abandoned escape sequence");
                self.state = DecoderState::Idle;
                let mut out: Decoded = smallvec![InputEvent::Unknown];
                out.extend(self.decode_idle(byte));
                out
            }
            DecoderState::SawEscapeBracket => {
                self.state = DecoderState::Idle;
                let event = match byte {
                    b'A' => InputEvent::HistoryPrev,
                    b'B' => InputEvent::HistoryNext,
                    _ => {
                        tracing::trace!(byte, "unmapped CSI final byte");
                        InputEvent::Unknown
                    }
                };
                smallvec![event]
            }
        }
    }

    /// Decode a chunk of bytes, in order.
    ///
    /// A sequence left incomplete at the end of the chunk stays pending and
    /// resumes with the next call.
    pub fn decode_all(&mut self, data: &[u8]) -> Vec<InputEvent> {
        let mut events = Vec::with_capacity(data.len());
        for &byte in data {
            events.extend(self.decode(byte));
        }
        events
    }

    /// Dispatch a byte from the idle state. `None` means an escape started.
    fn decode_idle(&mut self, byte: u8) -> Option<InputEvent> {
        let event = match byte {
            ESC => {
                self.state = DecoderState::SawEscape;
                return None;
            }
            CR | LF => InputEvent::Submit,
            DEL | BS => InputEvent::DeleteBack,
            EOT => InputEvent::EndOfInput,
            FF => InputEvent::ClearScreen,
            CTRL_N => InputEvent::HistoryNext,
            CTRL_P => InputEvent::HistoryPrev,
            b @ 0x20..=0x7E => InputEvent::Printable(b),
            _ => {
                tracing::trace!(byte, "unmapped byte");
                InputEvent::Unknown
            }
        };
        Some(event)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
