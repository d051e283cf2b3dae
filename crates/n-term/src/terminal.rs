// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode and RAII cleanup.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), ioctl (TIOCGWINSZ), sigaction, isatty, and raw fd writes. These are the standard POSIX
// interfaces for terminal control — there is no safe alternative. Each
// unsafe block is minimal.
#![allow(unsafe_code)]
//
// This module owns the terminal's raw state. It enters raw mode via termios
// so every keypress reaches the line editor unprocessed and unechoed, and it
// guarantees the original mode comes back: on `restore()`, on drop, and from
// a panic hook that runs before the panic message is printed.
//
// Unlike a full-screen TUI, the shell shares the terminal with the programs
// it runs. Output post-processing (OPOST) is therefore left on, so a child
// writing `\n` still gets a carriage return and its output lines up.
//
// While a command runs the terminal is handed back in its original (cooked)
// mode through `suspend()` / `resume()`: the child gets echo, line editing,
// Ctrl-C and Ctrl-D as the user expects. Ctrl-C then signals the whole
// foreground process group, shell included, so the first suspend installs
// a no-op SIGINT/SIGQUIT handler. A caught signal reverts to its default
// disposition on exec, so children are still interruptible.

use std::io;
use std::sync::{Mutex, Once};

use thiserror::Error;

// ─── Errors ─────────────────────────────────────────────────────────────────

/// Failure to switch the terminal into or out of raw mode.
#[derive(Debug, Error)]
pub enum ModeError {
    /// Reading or applying the raw termios settings failed.
    #[error("cannot enter raw mode: {0}")]
    Acquire(#[source] io::Error),
    /// Putting the saved termios settings back failed.
    #[error("cannot restore terminal mode: {0}")]
    Restore(#[source] io::Error),
}

// ─── Mode Control ───────────────────────────────────────────────────────────

/// Paired raw-mode switch.
///
/// Implementations must make [`restore`](ModeControl::restore) a no-op when
/// raw mode is not active, so callers can restore unconditionally on every
/// exit path.
pub trait ModeControl {
    /// Switch the terminal into raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::Acquire`] if the mode cannot be changed.
    fn acquire_raw(&mut self) -> Result<(), ModeError>;

    /// Put back the mode saved by [`acquire_raw`](ModeControl::acquire_raw).
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::Restore`] if the saved mode cannot be applied.
    fn restore(&mut self) -> Result<(), ModeError>;

    /// Temporarily hand the terminal back in its original mode, e.g. while
    /// a child process runs. A no-op when raw mode is not active.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::Restore`] if the original mode cannot be applied.
    fn suspend(&mut self) -> Result<(), ModeError>;

    /// Return to raw mode after [`suspend`](ModeControl::suspend). A no-op
    /// when raw mode is not active.
    ///
    /// # Errors
    ///
    /// Returns [`ModeError::Acquire`] if raw mode cannot be reapplied.
    fn resume(&mut self) -> Result<(), ModeError>;
}

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size {
            cols: ws.ws_col,
            rows: ws.ws_row,
        })
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Terminal width in columns, if stdout is a terminal.
#[must_use]
pub fn width() -> Option<usize> {
    get_size().map(|size| usize::from(size.cols))
}

/// Check whether stdin is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of original termios for panic recovery.
///
/// The [`Terminal`] struct owns its own copy, but the panic hook can't
/// access it. This global backup — behind a [`Mutex`], not `static mut` —
/// lets the hook restore the mode without the struct.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// Emergency output written before the panic message: start a fresh row so
/// the message is not printed after the half-typed command line.
const EMERGENCY_RESTORE: &[u8] = b"\r\n";

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, no way to read the error message.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Write the restore sequence directly to stdout's file descriptor,
/// bypassing Rust's `io::stdout()` lock in case the panic happened while
/// it was held.
fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        use std::io::Write;
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Interrupt Shield ───────────────────────────────────────────────────────

/// Guard for [`shield_interrupts`].
#[cfg(unix)]
static INTERRUPT_SHIELD: Once = Once::new();

/// Catch SIGINT and SIGQUIT with a handler that does nothing, so the
/// keyboard interrupts a running child without killing the shell.
///
/// A handler (not `SIG_IGN`) is used because exec resets caught signals to
/// their default disposition but keeps ignored ones ignored.
#[cfg(unix)]
fn shield_interrupts() {
    INTERRUPT_SHIELD.call_once(|| unsafe {
        let mut sa: libc::sigaction = std::mem::zeroed();
        sa.sa_sigaction = ignore_signal as *const () as usize;
        sa.sa_flags = libc::SA_RESTART;
        libc::sigemptyset(&raw mut sa.sa_mask);
        libc::sigaction(libc::SIGINT, &raw const sa, std::ptr::null_mut());
        libc::sigaction(libc::SIGQUIT, &raw const sa, std::ptr::null_mut());
    });
}

#[cfg(unix)]
extern "C" fn ignore_signal(_sig: libc::c_int) {}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// Call [`acquire_raw`](ModeControl::acquire_raw) to enter raw mode. The
/// original mode is restored by [`restore`](ModeControl::restore), or
/// automatically when the handle is dropped — even on panic.
///
/// When stdin is not a TTY (piped input, CI), both operations succeed
/// without touching anything.
///
/// # Example
///
/// ```no_run
/// use n_term::terminal::{ModeControl, Terminal};
///
/// let mut term = Terminal::new();
/// term.acquire_raw()?;
/// // ... read keys, draw the line ...
/// term.restore()?;
/// # Ok::<(), n_term::terminal::ModeError>(())
/// ```
#[derive(Default)]
pub struct Terminal {
    /// Original termios saved before entering raw mode.
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// The raw settings applied by `acquire_raw`, reapplied by `resume`.
    #[cfg(unix)]
    raw_termios: Option<libc::termios>,

    /// Whether raw mode is currently applied.
    active: bool,
}

impl Terminal {
    /// Create a terminal handle. Does **not** enter raw mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether raw mode is currently active.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            // Save original for restore.
            self.original_termios = Some(termios);

            // Also save to global backup for the panic hook.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw minus OPOST: no line discipline, no echo, no
            // signal keys (Ctrl-C / Ctrl-Z arrive as bytes).
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;

            // VMIN=1, VTIME=0: read() blocks until at least 1 byte available.
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.raw_termios = Some(termios);
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            // Clear the global backup — we've restored successfully.
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }

            self.original_termios = None;
            self.raw_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Apply saved settings without discarding pending input, so keys typed
    /// while a child runs are not lost.
    #[cfg(unix)]
    fn apply(termios: Option<&libc::termios>) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let Some(termios) = termios else {
            return Ok(());
        };
        let fd = io::stdin().as_raw_fd();
        unsafe {
            if libc::tcsetattr(fd, libc::TCSADRAIN, termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }
        Ok(())
    }

    #[cfg(unix)]
    fn cooked(&self) -> io::Result<()> {
        if self.original_termios.is_some() {
            shield_interrupts();
        }
        Self::apply(self.original_termios.as_ref())
    }

    #[cfg(not(unix))]
    fn cooked(&self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn raw(&self) -> io::Result<()> {
        Self::apply(self.raw_termios.as_ref())
    }

    #[cfg(not(unix))]
    fn raw(&self) -> io::Result<()> {
        Ok(())
    }
}

impl ModeControl for Terminal {
    /// Idempotent: acquiring while already active is a no-op.
    fn acquire_raw(&mut self) -> Result<(), ModeError> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode().map_err(ModeError::Acquire)?;
        self.active = true;
        tracing::debug!(tty = is_tty(), "raw mode acquired");
        Ok(())
    }

    /// Idempotent: restoring while inactive is a no-op.
    fn restore(&mut self) -> Result<(), ModeError> {
        if !self.active {
            return Ok(());
        }

        self.disable_raw_mode().map_err(ModeError::Restore)?;
        self.active = false;
        tracing::debug!("terminal mode restored");
        Ok(())
    }

    fn suspend(&mut self) -> Result<(), ModeError> {
        if !self.active {
            return Ok(());
        }
        self.cooked().map_err(ModeError::Restore)?;
        tracing::trace!("raw mode suspended");
        Ok(())
    }

    fn resume(&mut self) -> Result<(), ModeError> {
        if !self.active {
            return Ok(());
        }
        self.raw().map_err(ModeError::Acquire)?;
        tracing::trace!("raw mode resumed");
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.restore();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
