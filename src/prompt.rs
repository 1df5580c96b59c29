//! Interactive confirmation

use crate::error::{Error, Result};
use dialoguer::Confirm;
use std::io;

/// Yes/no confirmation capability
pub trait Prompter: Send + Sync {
    /// Ask `question` and block until answered
    ///
    /// Returns [`Error::Interrupted`] when the operator aborts the prompt.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Terminal prompt on stdin/stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .map_err(prompt_error)
    }
}

/// Ctrl-C in raw mode arrives as an interrupted read, not as a signal
fn prompt_error(e: dialoguer::Error) -> Error {
    match e {
        dialoguer::Error::IO(io) if io.kind() == io::ErrorKind::Interrupted => Error::Interrupted,
        other => Error::Prompt(other.to_string()),
    }
}
