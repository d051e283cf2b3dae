// SPDX-License-Identifier: MIT
//
// Raw byte source — one byte per call from the terminal.
//
// The line editor reads stdin synchronously, one byte at a time. With the
// terminal in raw mode (VMIN=1, VTIME=0) each `read()` returns as soon as
// a single byte is available, so the loop blocks only while the user is
// not typing. Multi-byte keys arrive as separate bytes and the decoder in
// `input.rs` stitches them back together.
//
// `ByteSource` is the seam: the shell plugs in stdin, tests plug in byte
// slices or sources that fail on demand.

use std::io::{self, Read};

/// A sequential, blocking source of raw input bytes.
pub trait ByteSource {
    /// Read the next byte.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error. Callers treat it as fatal.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

/// Adapts any [`Read`] into a [`ByteSource`].
///
/// # Example
///
/// ```
/// use n_term::reader::{ByteSource, ReadBytes};
///
/// let mut src = ReadBytes::new(&b"hi"[..]);
/// assert_eq!(src.read_byte()?, Some(b'h'));
/// assert_eq!(src.read_byte()?, Some(b'i'));
/// assert_eq!(src.read_byte()?, None);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct ReadBytes<R> {
    inner: R,
}

impl<R: Read> ReadBytes<R> {
    /// Wrap a reader.
    pub const fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl ReadBytes<io::StdinLock<'static>> {
    /// Byte source over the process's locked stdin.
    #[must_use]
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: Read> ByteSource for ReadBytes<R> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                // A signal interrupted the read (e.g. SIGWINCH) — not an error.
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that fails once with `Interrupted`, then yields its data.
    struct Flaky {
        interrupted: bool,
        data: &'static [u8],
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.data.read(buf)
        }
    }

    /// Reader that always fails.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn reads_one_byte_at_a_time() {
        let mut src = ReadBytes::new(&b"\x1b[A"[..]);
        assert_eq!(src.read_byte().unwrap(), Some(0x1B));
        assert_eq!(src.read_byte().unwrap(), Some(b'['));
        assert_eq!(src.read_byte().unwrap(), Some(b'A'));
    }

    #[test]
    fn exhausted_source_yields_none() {
        let mut src = ReadBytes::new(&b""[..]);
        assert_eq!(src.read_byte().unwrap(), None);
        assert_eq!(src.read_byte().unwrap(), None);
    }

    #[test]
    fn interrupted_read_is_retried() {
        let mut src = ReadBytes::new(Flaky {
            interrupted: false,
            data: b"x",
        });
        assert_eq!(src.read_byte().unwrap(), Some(b'x'));
    }

    #[test]
    fn read_error_is_propagated() {
        let mut src = ReadBytes::new(Broken);
        let err = src.read_byte().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn into_inner_returns_reader() {
        let src = ReadBytes::new(&b"rest"[..]);
        assert_eq!(src.into_inner(), b"rest");
    }
}
