//! Authorization of held-back dependency patches
//!
//! A PR qualifies when its head commit carries exactly one status, a
//! `failure` with the manual-authorization description, and the PR is open
//! with a single commit. Checks run statuses first since that is the
//! narrowest filter.

use crate::action;
use crate::context::DecisionContext;
use crate::error::Result;
use crate::types::{
    MANUAL_AUTHORIZATION_DESCRIPTION, OperationResult, PrState, PullRequestNotification,
    StatusState,
};
use tracing::{debug, info};

/// Decide whether a candidate needs authorization and, if so, authorize it
///
/// `Err` means the candidate errored; the caller records it as
/// [`OperationResult::Errored`].
pub async fn check_and_authorize(
    ctx: &DecisionContext<'_>,
    candidate: &PullRequestNotification,
) -> Result<OperationResult> {
    let snapshot = &candidate.pull_request;

    let statuses = ctx
        .call(
            "getting commit statuses",
            ctx.host.get_commit_statuses(&snapshot.statuses_url),
        )
        .await?;

    let [status] = statuses.as_slice() else {
        debug!(
            count = statuses.len(),
            "skipping because there should be exactly 1 failed commit status for a PR in need of manual authorization"
        );
        return Ok(OperationResult::Skipped);
    };
    if status.state != StatusState::Failure {
        debug!(state = %status.state, "skipping because the commit status is not a failure");
        return Ok(OperationResult::Skipped);
    }
    if status.description != MANUAL_AUTHORIZATION_DESCRIPTION {
        debug!(description = %status.description, "skipping because the commit status is not the manual authorization message");
        return Ok(OperationResult::Skipped);
    }

    let pr = ctx
        .call("getting PR", ctx.host.get_pull_request(&snapshot.url))
        .await?;
    match pr.state {
        PrState::Open => {}
        PrState::Closed => {
            debug!("skipping because PR is closed");
            return Ok(OperationResult::AlreadyDone);
        }
        PrState::Unknown => {
            debug!(state = %pr.state, "skipping because PR is not open");
            return Ok(OperationResult::Skipped);
        }
    }
    if pr.commits != 1 {
        debug!(
            commits = pr.commits,
            "skipping because authorization requires exactly 1 commit"
        );
        return Ok(OperationResult::Skipped);
    }

    if !ctx.confirm("Authorize this PR?")? {
        return Ok(OperationResult::Skipped);
    }

    info!(title = %pr.title, url = %pr.html_url, "authorizing PR");
    action::update_branch(ctx, &candidate.notification.repository, pr.number).await?;
    Ok(OperationResult::Done)
}
