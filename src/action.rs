//! Action execution
//!
//! Performs the branch-update and merge calls and normalizes the host's
//! success signals.

use crate::context::DecisionContext;
use crate::error::{Error, Result};
use crate::types::{BranchUpdateOutcome, MergeMethod, MergeResult, PullRequest, RepoRef};
use tracing::{debug, info};

/// Update a PR branch, authorizing the held-back patch
///
/// An accepted-and-queued response is a success even though the host layer
/// reports it as [`Error::UpdateAccepted`].
pub async fn update_branch(
    ctx: &DecisionContext<'_>,
    repo: &RepoRef,
    number: u64,
) -> Result<BranchUpdateOutcome> {
    match ctx
        .call("updating branch", ctx.host.update_branch(repo, number))
        .await
    {
        Ok(update) => {
            info!("{} ({})", update.message, update.url);
            Ok(BranchUpdateOutcome::Updated(update))
        }
        Err(Error::UpdateAccepted(message)) => {
            info!(pr_number = number, %message, "branch update queued");
            Ok(BranchUpdateOutcome::Queued)
        }
        Err(e) => Err(e),
    }
}

/// Squash commit title for a PR: `"<title> (#<number>)"`
pub fn merge_commit_message(pr: &PullRequest) -> String {
    format!("{} (#{})", pr.title, pr.number)
}

/// Merge a PR
///
/// A response without a confirmed merge is reported as
/// [`Error::MergeRejected`].
pub async fn merge(
    ctx: &DecisionContext<'_>,
    repo: &RepoRef,
    number: u64,
    message: &str,
    method: MergeMethod,
) -> Result<MergeResult> {
    let result = ctx
        .call("merging PR", ctx.host.merge(repo, number, message, method))
        .await?;

    if !result.merged {
        return Err(Error::MergeRejected(
            result
                .message
                .unwrap_or_else(|| "host did not confirm the merge".to_string()),
        ));
    }

    debug!(pr_number = number, sha = ?result.sha, "merged PR");
    Ok(result)
}
