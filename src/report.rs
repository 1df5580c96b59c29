//! Run results
//!
//! Collects the outcome of every processed notification and derives the
//! unresolved list an operator has to follow up on by hand.

use crate::error::Error;
use crate::types::OperationResult;
use tracing::{error, info};

/// Outcome of one notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// Notification / PR title
    pub title: String,
    /// Web URL of the PR (or the notification subject if unresolved)
    pub url: String,
    /// Classification
    pub result: OperationResult,
}

/// Item needing manual follow-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved<'a> {
    /// Notification / PR title
    pub title: &'a str,
    /// Web URL of the PR
    pub url: &'a str,
}

/// Ordered outcomes of a run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    entries: Vec<ReportEntry>,
}

impl RunReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an evaluator result; errors are logged and become
    /// [`OperationResult::Errored`]
    pub fn record(
        &mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        outcome: Result<OperationResult, Error>,
    ) -> OperationResult {
        let title = title.into();
        let result = match outcome {
            Ok(result) => result,
            Err(e) => {
                error!(%title, error = %e, "processing notification failed");
                OperationResult::Errored
            }
        };
        self.entries.push(ReportEntry {
            title,
            url: url.into(),
            result,
        });
        result
    }

    /// All entries in processing order
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Results in processing order
    pub fn outcomes(&self) -> Vec<OperationResult> {
        self.entries.iter().map(|e| e.result).collect()
    }

    /// Number of entries with `result`
    pub fn count(&self, result: OperationResult) -> usize {
        self.entries.iter().filter(|e| e.result == result).count()
    }

    /// Skipped entries, for manual follow-up
    pub fn unresolved(&self) -> Vec<Unresolved<'_>> {
        self.entries
            .iter()
            .filter(|e| e.result == OperationResult::Skipped)
            .map(|e| Unresolved {
                title: &e.title,
                url: &e.url,
            })
            .collect()
    }

    /// Whether nothing was processed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Log the unresolved list
    pub fn log_unresolved(&self) {
        let unresolved = self.unresolved();
        if unresolved.is_empty() {
            return;
        }
        info!(count = unresolved.len(), "unresolved notifications");
        for item in unresolved {
            info!(title = %item.title, url = %item.url, "unresolved");
        }
    }
}
