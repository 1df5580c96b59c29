//! Host services
//!
//! The narrow slice of the code host that the decision engine depends on.

mod github;

pub use github::{DEFAULT_API_URL, GitHubService};

use crate::error::Result;
use crate::types::{
    BranchUpdate, CombinedStatus, Commit, CommitStatus, MergeMethod, MergeResult, Notification,
    PullRequest, RepoRef,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Time window and read-state for a notification listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQuery {
    /// Only notifications updated after this time
    pub since: DateTime<Utc>,
    /// Only notifications updated before this time
    pub before: Option<DateTime<Utc>>,
    /// Include notifications already marked read
    pub include_read: bool,
}

/// Host service trait for notification and PR operations
///
/// Implemented by [`GitHubService`] and by test doubles, so every branch of
/// the decision engine can be driven deterministically.
#[async_trait]
pub trait HostService: Send + Sync {
    /// List notifications in the query window
    async fn list_notifications(&self, query: &NotificationQuery) -> Result<Vec<Notification>>;

    /// Fetch a PR by its API URL (the notification subject URL)
    async fn get_pull_request(&self, url: &str) -> Result<PullRequest>;

    /// List statuses of a PR's head commit
    async fn get_commit_statuses(&self, statuses_url: &str) -> Result<Vec<CommitStatus>>;

    /// Get the combined status of a commit
    async fn get_combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CombinedStatus>;

    /// List a PR's commits, oldest first
    async fn get_commits(&self, commits_url: &str) -> Result<Vec<Commit>>;

    /// Update a PR branch with its base branch
    ///
    /// A queued (asynchronous) update is reported as
    /// [`Error::UpdateAccepted`](crate::error::Error::UpdateAccepted).
    async fn update_branch(&self, repo: &RepoRef, number: u64) -> Result<BranchUpdate>;

    /// Merge a PR
    ///
    /// The commit title is `message`. The returned [`MergeResult::merged`]
    /// flag must be checked; a response without a confirmed merge is not a
    /// success.
    async fn merge(
        &self,
        repo: &RepoRef,
        number: u64,
        message: &str,
        method: MergeMethod,
    ) -> Result<MergeResult>;
}
