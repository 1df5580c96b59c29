//! Mergeability polling
//!
//! The host computes mergeability asynchronously, so right after another
//! merge in the same repository a PR can read as `unknown` for a while. The
//! PR is re-fetched on every attempt; a stale mergeable flag is never reused.

use crate::context::DecisionContext;
use crate::error::Result;
use crate::types::{MergeableState, OperationResult, PrState, PullRequest};
use tracing::debug;

/// How a poll ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// The PR is mergeable; carries the snapshot that said so
    Mergeable(PullRequest),
    /// The PR reached a terminal state (closed, conflicting, ...)
    Resolved(OperationResult),
    /// Every attempt read as not yet mergeable
    Exhausted,
}

/// Classification of a single snapshot
enum Attempt {
    Ready,
    Retry,
    Stop(OperationResult),
}

fn classify(pr: &PullRequest) -> Attempt {
    match pr.state {
        PrState::Open => {}
        PrState::Closed => {
            debug!("skipping because PR is closed");
            return Attempt::Stop(OperationResult::AlreadyDone);
        }
        PrState::Unknown => {
            debug!(state = %pr.state, "skipping because PR is not open");
            return Attempt::Stop(OperationResult::Skipped);
        }
    }

    match pr.mergeable_state {
        MergeableState::Clean | MergeableState::Unstable => {}
        MergeableState::Unknown => return Attempt::Retry,
        ref other => {
            debug!(mergeable_state = %other, "skipping because PR is not cleanly mergeable");
            return Attempt::Stop(OperationResult::Skipped);
        }
    }

    if pr.mergeable == Some(true) {
        Attempt::Ready
    } else {
        Attempt::Retry
    }
}

/// Poll the PR at `pr_url` until it is mergeable, terminal, or the retry
/// budget runs out
///
/// Makes at most `ctx.retry.max_attempts` fetches and pauses
/// `ctx.retry.interval` between them.
pub async fn poll_mergeability(ctx: &DecisionContext<'_>, pr_url: &str) -> Result<PollOutcome> {
    for attempt in 1..=ctx.retry.max_attempts {
        if attempt > 1 {
            ctx.delay.pause(ctx.retry.interval).await;
        }

        let pr = ctx
            .call("getting PR", ctx.host.get_pull_request(pr_url))
            .await?;

        match classify(&pr) {
            Attempt::Ready => {
                debug!(attempt, "PR is mergeable");
                return Ok(PollOutcome::Mergeable(pr));
            }
            Attempt::Stop(result) => return Ok(PollOutcome::Resolved(result)),
            Attempt::Retry => {
                debug!(
                    attempt,
                    mergeable_state = %pr.mergeable_state,
                    mergeable = ?pr.mergeable,
                    "uncertain if PR is mergeable"
                );
            }
        }
    }

    debug!(
        attempts = ctx.retry.max_attempts,
        "PR did not become mergeable"
    );
    Ok(PollOutcome::Exhausted)
}
