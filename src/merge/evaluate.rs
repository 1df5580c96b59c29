//! Merge evaluation - poll, validate, confirm, merge

use crate::action;
use crate::context::DecisionContext;
use crate::error::Result;
use crate::merge::poll::{PollOutcome, poll_mergeability};
use crate::merge::status::validate_statuses;
use crate::types::{MergeMethod, OperationResult, PullRequestNotification};
use tracing::{debug, info};

/// Decide whether a candidate can be merged and, if so, squash-merge it
///
/// `Err` means the candidate errored; the caller records it as
/// [`OperationResult::Errored`].
pub async fn check_and_merge(
    ctx: &DecisionContext<'_>,
    candidate: &PullRequestNotification,
) -> Result<OperationResult> {
    let pr = match poll_mergeability(ctx, &candidate.pull_request.url).await? {
        PollOutcome::Mergeable(pr) => pr,
        PollOutcome::Resolved(result) => return Ok(result),
        PollOutcome::Exhausted => {
            debug!("skipping because PR is not mergeable");
            return Ok(OperationResult::Skipped);
        }
    };

    let commits = ctx
        .call("getting commits", ctx.host.get_commits(&pr.commits_url))
        .await?;
    let Some(latest) = commits.last() else {
        debug!("skipping because PR has no commits");
        return Ok(OperationResult::Skipped);
    };

    let combined = ctx
        .call(
            "getting combined status",
            ctx.host
                .get_combined_status(&candidate.notification.repository, &latest.sha),
        )
        .await?;

    for (i, status) in combined.statuses.iter().enumerate() {
        info!(
            index = i + 1,
            context = %status.context,
            state = %status.state,
            description = %status.description,
            target_url = status.target_url.as_deref().unwrap_or_default(),
            "commit status"
        );
    }

    let verdict = validate_statuses(&combined.statuses);
    if !verdict.is_ready() {
        debug!(sha = %latest.sha, %verdict, "skipping because statuses do not allow merging");
        return Ok(OperationResult::Skipped);
    }

    if !ctx.confirm("Merge this PR?")? {
        return Ok(OperationResult::Skipped);
    }

    info!(title = %pr.title, url = %pr.html_url, "merging PR");
    let message = action::merge_commit_message(&pr);
    action::merge(
        ctx,
        &candidate.notification.repository,
        pr.number,
        &message,
        MergeMethod::Squash,
    )
    .await?;
    Ok(OperationResult::Done)
}
