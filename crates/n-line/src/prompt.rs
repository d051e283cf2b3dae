//! Prompt text.
//!
//! The editor asks its [`PromptSource`] for the prompt before every redraw,
//! so a prompt that depends on changing state (the host name, the working
//! directory) is always current. Any `FnMut() -> String` closure works as a
//! source; [`HostPrompt`] is the shell's default, `"<hostname>)-> "`.

/// Supplies the prompt string.
pub trait PromptSource {
    /// The prompt to draw in front of the edit line.
    fn current_prompt(&mut self) -> String;
}

impl<F: FnMut() -> String> PromptSource for F {
    fn current_prompt(&mut self) -> String {
        self()
    }
}

/// Prompt used when the host name cannot be determined.
pub const FALLBACK_PROMPT: &str = "> ";

/// `"<hostname>)-> "`, or [`FALLBACK_PROMPT`] without a host name.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostPrompt;

impl HostPrompt {
    /// Build the prompt text for a given host name.
    #[must_use]
    pub fn render(hostname: Option<&str>) -> String {
        match hostname {
            Some(host) if !host.is_empty() => format!("{host})-> "),
            _ => FALLBACK_PROMPT.to_string(),
        }
    }
}

impl PromptSource for HostPrompt {
    fn current_prompt(&mut self) -> String {
        Self::render(hostname().as_deref())
    }
}

/// The machine's host name, via `gethostname(2)`.
#[cfg(unix)]
#[allow(unsafe_code)]
#[must_use]
pub fn hostname() -> Option<String> {
    let mut buf = [0u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&b| b == 0).unwrap_or(buf.len());
    std::str::from_utf8(&buf[..end])
        .ok()
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}

#[cfg(not(unix))]
#[must_use]
pub fn hostname() -> Option<String> {
    std::env::var("COMPUTERNAME").ok().filter(|name| !name.is_empty())
}
