//! Status validation before merging
//!
//! Pure checks over the latest commit's combined status.

use crate::types::{CommitStatus, PATCH_FINISHED_MARKER, StatusState};
use std::fmt;

/// Verdict over a commit's statuses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusVerdict {
    /// No failures and the patch run has finished
    Ready,
    /// No statuses were posted
    Empty,
    /// A status failed; a dependency PR must never merge over a failure
    Failing {
        /// Context of the first failing status
        context: String,
    },
    /// No status reports the patch run as finished
    Unfinished,
}

impl StatusVerdict {
    /// Whether the PR may be merged
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for StatusVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Empty => write!(f, "latest commit has no statuses"),
            Self::Failing { context } => write!(f, "status '{context}' is failing"),
            Self::Unfinished => write!(f, "patch has not finished"),
        }
    }
}

/// Validate statuses in host order
///
/// Any `failure` rejects immediately, regardless of the other entries.
pub fn validate_statuses(statuses: &[CommitStatus]) -> StatusVerdict {
    if statuses.is_empty() {
        return StatusVerdict::Empty;
    }

    let mut patch_finished = false;
    for status in statuses {
        if status.state == StatusState::Failure {
            return StatusVerdict::Failing {
                context: status.context.clone(),
            };
        }
        if status.description.contains(PATCH_FINISHED_MARKER) {
            patch_finished = true;
        }
    }

    if patch_finished {
        StatusVerdict::Ready
    } else {
        StatusVerdict::Unfinished
    }
}
