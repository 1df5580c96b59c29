//! Error types for bumpgate

use std::time::Duration;
use thiserror::Error;

/// Errors produced while talking to the host or deciding on a PR
#[derive(Debug, Error)]
pub enum Error {
    /// GitHub returned an unexpected response
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Error surfaced by octocrab
    #[error("GitHub client error: {0}")]
    Octocrab(#[from] octocrab::Error),

    /// Local I/O failure (log files, terminal)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or unusable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// A title filter could not be compiled
    #[error("invalid title pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// A schedule expression could not be parsed
    #[error("invalid schedule '{expression}': {message}")]
    Schedule {
        /// The offending expression
        expression: String,
        /// Parser message
        message: String,
    },

    /// A host call did not finish in time
    #[error("{operation} timed out after {}s", timeout.as_secs())]
    Timeout {
        /// What was being attempted
        operation: &'static str,
        /// The bound that expired
        timeout: Duration,
    },

    /// The host accepted a branch update and will run it asynchronously
    ///
    /// Raised by the host layer; the action executor treats it as success.
    #[error("branch update accepted and queued: {0}")]
    UpdateAccepted(String),

    /// The merge call returned without merging
    #[error("merge was not performed: {0}")]
    MergeRejected(String),

    /// Invalid local input or state
    #[error("{0}")]
    Internal(String),

    /// Reading the interactive answer failed
    #[error("failed to read confirmation: {0}")]
    Prompt(String),

    /// The operator interrupted the run at a prompt
    #[error("interrupted")]
    Interrupted,
}

impl Error {
    /// Whether this error ends the whole run rather than a single notification
    pub const fn is_run_fatal(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
}

/// Result alias for bumpgate
pub type Result<T> = std::result::Result<T, Error>;
