//! Run loop
//!
//! List → filter → resolve → evaluate → record, one notification at a time.
//! Processing is sequential so host rate limits and the interactive prompt
//! stay well-defined.

use crate::authorize::check_and_authorize;
use crate::context::{DecisionContext, bounded};
use crate::error::Result;
use crate::filter::{NotificationFilter, Selected, select_candidates};
use crate::merge::check_and_merge;
use crate::platform::NotificationQuery;
use crate::report::RunReport;
use crate::types::{OperationResult, PullRequestNotification, SubjectType};
use std::fmt;
use tracing::{Instrument, debug, info, info_span};

/// What a run does with each candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Authorize held-back branch updates
    Authorize,
    /// Merge PRs whose checks have finished
    Merge,
}

impl Operation {
    /// Evaluate one candidate and act on it
    pub async fn evaluate(
        self,
        ctx: &DecisionContext<'_>,
        candidate: &PullRequestNotification,
    ) -> Result<OperationResult> {
        match self {
            Self::Authorize => check_and_authorize(ctx, candidate).await,
            Self::Merge => check_and_merge(ctx, candidate).await,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authorize => write!(f, "authorize"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Pair a notification with the PR it refers to
///
/// Reuses the snapshot fetched during filtering when there is one. Returns
/// `None` for notifications that are not about a pull request.
pub async fn resolve_candidate(
    ctx: &DecisionContext<'_>,
    selected: Selected,
) -> Result<Option<PullRequestNotification>> {
    let Selected {
        notification,
        pull_request,
    } = selected;
    if notification.subject.kind != SubjectType::PullRequest {
        return Ok(None);
    }
    let Some(url) = notification.subject.url.as_deref() else {
        return Ok(None);
    };

    let pull_request = match pull_request {
        Some(pr) => pr,
        None => {
            ctx.call("getting PR", ctx.host.get_pull_request(url))
                .await?
        }
    };
    Ok(Some(PullRequestNotification {
        notification,
        pull_request,
    }))
}

/// Run `operation` over every notification matching `filter`
///
/// Listing and filtering failures abort the run, as does an interrupted
/// prompt; other failures while processing a single notification are
/// recorded as [`OperationResult::Errored`] and processing continues.
pub async fn run(
    ctx: &DecisionContext<'_>,
    operation: Operation,
    query: &NotificationQuery,
    filter: &NotificationFilter,
) -> Result<RunReport> {
    info!(%operation, "checking notifications for dependency PRs");

    let notifications = bounded(
        "listing notifications",
        ctx.timeouts.list,
        ctx.host.list_notifications(query),
    )
    .await?;
    debug!(count = notifications.len(), "found notifications");

    let candidates = select_candidates(ctx, notifications, filter).await?;

    let mut report = RunReport::new();
    for (i, selected) in candidates.into_iter().enumerate() {
        let span = info_span!("notification", index = i + 1, title = %selected.notification.subject.title);
        process(ctx, operation, selected, &mut report)
            .instrument(span)
            .await?;
    }

    info!(
        %operation,
        done = report.count(OperationResult::Done),
        already_done = report.count(OperationResult::AlreadyDone),
        skipped = report.count(OperationResult::Skipped),
        errored = report.count(OperationResult::Errored),
        "run complete"
    );
    report.log_unresolved();
    Ok(report)
}

/// Process one candidate; only run-fatal errors are returned
async fn process(
    ctx: &DecisionContext<'_>,
    operation: Operation,
    selected: Selected,
    report: &mut RunReport,
) -> Result<()> {
    let notification = &selected.notification;
    info!(notification = %notification.log_format(), "processing notification");
    let title = notification.subject.title.clone();
    let subject_url = notification.subject.url.clone().unwrap_or_default();

    let result = match resolve_candidate(ctx, selected).await {
        Ok(Some(candidate)) => {
            info!(url = %candidate.pull_request.html_url, "resolved PR");
            match operation.evaluate(ctx, &candidate).await {
                Err(e) if e.is_run_fatal() => return Err(e),
                outcome => report.record(title, candidate.pull_request.html_url, outcome),
            }
        }
        Ok(None) => {
            debug!("skipping because notification is not about a pull request");
            report.record(title, subject_url, Ok(OperationResult::Skipped))
        }
        Err(e) => report.record(title, subject_url, Err(e)),
    };
    debug!(%result, "notification processed");
    Ok(())
}
