//! Command execution — built-ins and external programs.
//!
//! A submitted line is split on whitespace into a program name and its
//! arguments, then dispatched:
//!
//! | Program | Action                                                   |
//! |---------|----------------------------------------------------------|
//! | `cd`    | Change the working directory (home when no argument)      |
//! | `exit`  | End the shell, optionally with an exit code              |
//! | other   | Spawn it, inherit stdio, wait for it to finish           |
//!
//! `cd` and `exit` have to be built in: a child process cannot change its
//! parent's working directory, and there is no `exit` executable.
//!
//! No quoting, globbing, pipes, or redirection — whitespace is the only
//! syntax.

use std::env;
use std::path::PathBuf;
use std::process::{self, Stdio};

use crate::error::ExecError;

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `cd [dir]` — extra arguments are ignored.
    ChangeDir(Option<&'a str>),

    /// `exit [code]`.
    Exit(Option<&'a str>),

    /// Anything else.
    External { program: &'a str, args: Vec<&'a str> },
}

impl<'a> Command<'a> {
    /// Parse a command line. Returns `None` for a blank line.
    #[must_use]
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let program = words.next()?;

        let cmd = match program {
            "cd" => Self::ChangeDir(words.next()),
            "exit" => Self::Exit(words.next()),
            _ => Self::External {
                program,
                args: words.collect(),
            },
        };
        Some(cmd)
    }
}

// ---------------------------------------------------------------------------
// Executor
// ---------------------------------------------------------------------------

/// What happened after a command ran successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Done — keep editing.
    Done,
    /// `exit` — end the shell with this code.
    Exit(i32),
}

/// Runs submitted command lines.
///
/// Blocking: `execute` returns only once the command has finished.
pub trait Executor {
    /// Run one command line.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] if the command cannot be run or fails. The
    /// editor reports it and keeps going.
    fn execute(&mut self, line: &str) -> Result<Outcome, ExecError>;
}

/// Executor backed by the operating system.
#[derive(Debug, Clone, Copy)]
pub struct SystemExecutor {
    /// Where `cd` with no argument goes.
    resolve_home: fn() -> Option<PathBuf>,
}

impl SystemExecutor {
    /// Create an executor that resolves `~` from the user's environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resolve_home: dirs::home_dir,
        }
    }

    /// Create an executor with a custom home directory lookup.
    #[must_use]
    pub const fn with_home_resolver(resolve_home: fn() -> Option<PathBuf>) -> Self {
        Self { resolve_home }
    }

    fn change_dir(&self, target: Option<&str>) -> Result<Outcome, ExecError> {
        let path = match target {
            Some(dir) => PathBuf::from(dir),
            None => (self.resolve_home)().ok_or(ExecError::NoHomeDir)?,
        };
        env::set_current_dir(&path).map_err(|source| ExecError::ChangeDir {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "changed directory");
        Ok(Outcome::Done)
    }

    fn spawn(program: &str, args: &[&str]) -> Result<Outcome, ExecError> {
        tracing::debug!(program, ?args, "spawning");
        let status = process::Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(Outcome::Done)
        } else {
            Err(ExecError::Status {
                program: program.to_string(),
                status,
            })
        }
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for SystemExecutor {
    fn execute(&mut self, line: &str) -> Result<Outcome, ExecError> {
        let Some(cmd) = Command::parse(line) else {
            return Ok(Outcome::Done);
        };

        match cmd {
            Command::ChangeDir(target) => self.change_dir(target),
            Command::Exit(None) => Ok(Outcome::Exit(0)),
            Command::Exit(Some(code)) => code
                .parse()
                .map(Outcome::Exit)
                .map_err(|_| ExecError::InvalidExitCode(code.to_string())),
            Command::External { program, args } => Self::spawn(program, &args),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;
    use std::path::Path;

    /// Restores the working directory when dropped.
    struct CwdGuard(PathBuf);

    impl CwdGuard {
        fn new() -> Self {
            Self(env::current_dir().unwrap())
        }
    }

    impl Drop for CwdGuard {
        fn drop(&mut self) {
            let _ = env::set_current_dir(&self.0);
        }
    }

    fn same_dir(a: &Path, b: &Path) -> bool {
        a.canonicalize().unwrap() == b.canonicalize().unwrap()
    }

    // -- Parsing ------------------------------------------------------------

    #[test]
    fn parse_blank_is_none() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   \t "), None);
    }

    #[test]
    fn parse_cd_without_argument() {
        assert_eq!(Command::parse("cd"), Some(Command::ChangeDir(None)));
    }

    #[test]
    fn parse_cd_with_argument() {
        assert_eq!(
            Command::parse("cd  /tmp  extra"),
            Some(Command::ChangeDir(Some("/tmp")))
        );
    }

    #[test]
    fn parse_exit() {
        assert_eq!(Command::parse("exit"), Some(Command::Exit(None)));
        assert_eq!(Command::parse("exit 3"), Some(Command::Exit(Some("3"))));
    }

    #[test]
    fn parse_external_splits_on_whitespace() {
        assert_eq!(
            Command::parse("  ls -l   -a "),
            Some(Command::External {
                program: "ls",
                args: vec!["-l", "-a"],
            })
        );
    }

    #[test]
    fn parse_builtin_names_are_exact() {
        assert_eq!(
            Command::parse("cdx"),
            Some(Command::External {
                program: "cdx",
                args: vec![],
            })
        );
    }

    // -- Built-ins ----------------------------------------------------------

    #[test]
    fn blank_line_is_done() {
        let mut ex = SystemExecutor::new();
        assert_eq!(ex.execute("  ").unwrap(), Outcome::Done);
    }

    #[test]
    fn exit_defaults_to_zero() {
        let mut ex = SystemExecutor::new();
        assert_eq!(ex.execute("exit").unwrap(), Outcome::Exit(0));
    }

    #[test]
    fn exit_with_code() {
        let mut ex = SystemExecutor::new();
        assert_eq!(ex.execute("exit 42").unwrap(), Outcome::Exit(42));
    }

    #[test]
    fn exit_with_bad_code_is_error() {
        let mut ex = SystemExecutor::new();
        let err = ex.execute("exit now").unwrap_err();
        assert!(matches!(err, ExecError::InvalidExitCode(ref s) if s == "now"));
    }

    #[test]
    #[serial]
    fn cd_without_argument_goes_home() {
        let _guard = CwdGuard::new();
        let mut ex = SystemExecutor::with_home_resolver(|| Some(env::temp_dir()));
        assert_eq!(ex.execute("cd").unwrap(), Outcome::Done);
        assert!(same_dir(&env::current_dir().unwrap(), &env::temp_dir()));
    }

    #[test]
    #[serial]
    fn cd_with_argument() {
        let _guard = CwdGuard::new();
        let target = env::temp_dir();
        let mut ex = SystemExecutor::new();
        ex.execute(&format!("cd {}", target.display())).unwrap();
        assert!(same_dir(&env::current_dir().unwrap(), &target));
    }

    #[test]
    #[serial]
    fn cd_without_home_fails() {
        let _guard = CwdGuard::new();
        let before = env::current_dir().unwrap();
        let mut ex = SystemExecutor::with_home_resolver(|| None);
        assert!(matches!(ex.execute("cd"), Err(ExecError::NoHomeDir)));
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial]
    fn cd_into_missing_directory_fails() {
        let _guard = CwdGuard::new();
        let mut ex = SystemExecutor::new();
        let err = ex.execute("cd /definitely/not/here").unwrap_err();
        assert!(matches!(err, ExecError::ChangeDir { .. }));
    }

    // -- External programs --------------------------------------------------

    #[test]
    fn missing_program_is_spawn_error() {
        let mut ex = SystemExecutor::new();
        let err = ex.execute("n-shell-no-such-program-xyz").unwrap_err();
        assert!(
            matches!(err, ExecError::Spawn { ref program, .. } if program == "n-shell-no-such-program-xyz")
        );
    }

    #[cfg(unix)]
    #[test]
    fn successful_program_is_done() {
        let mut ex = SystemExecutor::new();
        assert_eq!(ex.execute("true").unwrap(), Outcome::Done);
    }

    #[cfg(unix)]
    #[test]
    fn failing_program_is_status_error() {
        let mut ex = SystemExecutor::new();
        let err = ex.execute("false").unwrap_err();
        assert!(matches!(err, ExecError::Status { ref program, .. } if program == "false"));
    }
}
