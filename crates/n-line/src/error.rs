//! Error types for command execution and editor sessions.
//!
//! Two tiers, matching how far a failure propagates:
//!
//! - [`ExecError`] — a command failed. Reported on the error stream, then
//!   editing continues.
//! - [`SessionError`] — the session itself cannot go on: input is gone,
//!   the terminal cannot be written, or its mode cannot be switched.
//!
//! Decoding anomalies are not errors at all; they surface as
//! [`InputEvent::Unknown`](n_term::input::InputEvent::Unknown) and are
//! ignored.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use n_term::terminal::ModeError;
use thiserror::Error;

/// A submitted command could not be run, or ran and failed.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The program could not be started (not found, not executable, ...).
    #[error("{program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("{program}: {status}")]
    Status { program: String, status: ExitStatus },

    /// `cd` could not change into the target directory.
    #[error("cd: {}: {source}", path.display())]
    ChangeDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `cd` with no argument, and no home directory to fall back on.
    #[error("cd: home directory not known, path required")]
    NoHomeDir,

    /// `exit` with an argument that is not an integer.
    #[error("exit: {0}: numeric argument required")]
    InvalidExitCode(String),
}

/// A failure that ends the editor session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading from the input stream failed.
    #[error("cannot read input: {0}")]
    Read(#[source] io::Error),

    /// Writing the line to the terminal failed.
    #[error("cannot draw line: {0}")]
    Render(#[source] io::Error),

    /// Raw mode could not be entered or left.
    #[error(transparent)]
    Mode(#[from] ModeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_message_names_program() {
        let e = ExecError::Spawn {
            program: "nosuchcmd".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(e.to_string(), "nosuchcmd: not found");
    }

    #[test]
    fn change_dir_message_names_path() {
        let e = ExecError::ChangeDir {
            path: PathBuf::from("/nope"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(e.to_string(), "cd: /nope: missing");
    }

    #[test]
    fn no_home_message() {
        assert_eq!(
            ExecError::NoHomeDir.to_string(),
            "cd: home directory not known, path required"
        );
    }

    #[test]
    fn invalid_exit_code_message() {
        assert_eq!(
            ExecError::InvalidExitCode("soon".into()).to_string(),
            "exit: soon: numeric argument required"
        );
    }

    #[test]
    fn session_errors_wrap_io() {
        let e = SessionError::Read(io::Error::other("eio"));
        assert_eq!(e.to_string(), "cannot read input: eio");
        let e = SessionError::Render(io::Error::other("epipe"));
        assert_eq!(e.to_string(), "cannot draw line: epipe");
    }

    #[test]
    fn mode_error_is_transparent() {
        let e: SessionError = ModeError::Acquire(io::Error::other("no tty")).into();
        assert_eq!(e.to_string(), "cannot enter raw mode: no tty");
    }
}
