//! Interactive prompt capability.
//!
//! The pipeline never talks to a terminal directly; it goes through
//! [`Interact`] so frontends supply dialoguer-backed prompts while tests
//! substitute scripted input.

/// User interaction needed by the pipeline: secret entry and yes/no
/// confirmation.
pub trait Interact {
    /// Solicit a secret value with no-echo display.
    ///
    /// An empty string means the user declined to provide a value.
    fn prompt_secret(&self, name: &str) -> anyhow::Result<String>;

    /// Ask for explicit confirmation before a destructive action.
    fn confirm(&self, message: &str) -> anyhow::Result<bool>;
}

/// Interaction stub for non-interactive runs; provides no secrets and
/// declines every confirmation.
#[derive(Debug, Default)]
pub struct NonInteractive;

impl Interact for NonInteractive {
    fn prompt_secret(&self, _name: &str) -> anyhow::Result<String> {
        Ok(String::new())
    }

    fn confirm(&self, _message: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}
