// SPDX-License-Identifier: MIT
//
// n-term — Terminal layer for n-shell.
//
// Everything that touches the terminal byte-for-byte lives here: raw mode
// via termios, a one-byte-at-a-time input source, the incremental key
// decoder that turns those bytes into line-editing events, and the
// single-row renderer that draws the prompt and the edit line.
//
// This crate talks ANSI directly and manages termios itself instead of
// pulling in a terminal framework. The shell needs only a handful of
// escape codes, and each of them is written here.

pub mod ansi;
pub mod input;
pub mod reader;
pub mod render;
pub mod terminal;
