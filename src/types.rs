//! Core types for bumpgate

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt;

/// Login of the Dependabot account on GitHub
pub const DEPENDABOT_LOGIN: &str = "dependabot[bot]";

/// Status description the host posts when a patch must be authorized by hand
pub const MANUAL_AUTHORIZATION_DESCRIPTION: &str = "patch must be manually authorized";

/// Substring of a status description marking that the patch run completed
pub const PATCH_FINISHED_MARKER: &str = "patch finished";

/// Notification reason codes accepted by the host
pub const NOTIFICATION_REASONS: &[&str] = &[
    "assign",
    "author",
    "ci_activity",
    "comment",
    "invitation",
    "manual",
    "mention",
    "review_requested",
    "security_alert",
    "state_change",
    "subscribed",
    "team_mention",
];

/// Repository a notification or PR belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub name: String,
}

impl RepoRef {
    /// Create a repository reference
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Kind of thing a notification is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectType {
    /// A pull request (the only actionable kind)
    PullRequest,
    /// An issue
    Issue,
    /// Anything else the host reports (releases, discussions, ...)
    Other(String),
}

impl SubjectType {
    /// Host-side name of the subject type
    pub fn as_str(&self) -> &str {
        match self {
            Self::PullRequest => "PullRequest",
            Self::Issue => "Issue",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for SubjectType {
    fn from(s: &str) -> Self {
        match s {
            "PullRequest" => Self::PullRequest,
            "Issue" => Self::Issue,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject of a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Subject title (the PR title for pull requests)
    pub title: String,
    /// API URL of the subject, if the host provides one
    pub url: Option<String>,
    /// Subject type
    pub kind: SubjectType,
}

/// A notification from the host's notification stream
///
/// Fetched once per run and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification thread ID
    pub id: String,
    /// What the notification is about
    pub subject: Subject,
    /// Reason code (e.g. `review_requested`)
    pub reason: String,
    /// Repository the notification came from
    pub repository: RepoRef,
    /// Whether the notification is still unread
    pub unread: bool,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    /// Short form used in log lines: `"title (owner/repo)"`
    pub fn log_format(&self) -> String {
        format!("\"{} ({})\"", self.subject.title, self.repository)
    }
}

/// PR state as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR is closed (merged or abandoned)
    Closed,
    /// Any state the host adds later
    Unknown,
}

impl From<&str> for PrState {
    fn from(s: &str) -> Self {
        match s {
            "open" => Self::Open,
            "closed" => Self::Closed,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for PrState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The host's computed mergeability of a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeableState {
    /// No conflicts and all checks pass
    Clean,
    /// No conflicts, some non-required checks fail
    Unstable,
    /// Merge conflicts
    Dirty,
    /// Not yet computed
    Unknown,
    /// Anything else (`blocked`, `behind`, `draft`, ...)
    Other(String),
}

impl From<&str> for MergeableState {
    fn from(s: &str) -> Self {
        match s {
            "clean" => Self::Clean,
            "unstable" => Self::Unstable,
            "dirty" => Self::Dirty,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MergeableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Unstable => write!(f, "unstable"),
            Self::Dirty => write!(f, "dirty"),
            Self::Unknown => write!(f, "unknown"),
            Self::Other(s) => f.write_str(s),
        }
    }
}

/// Kind of account that authored a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountType {
    /// Automation account
    Bot,
    /// Human account
    User,
    /// Organization account
    Organization,
    /// Anything else
    Other(String),
}

impl From<&str> for AccountType {
    fn from(s: &str) -> Self {
        match s {
            "Bot" => Self::Bot,
            "User" => Self::User,
            "Organization" => Self::Organization,
            other => Self::Other(other.to_string()),
        }
    }
}

/// PR author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Login name
    pub login: String,
    /// Account type
    pub account_type: AccountType,
}

/// A pull request snapshot
///
/// Never mutated locally; every re-fetch produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// PR state
    pub state: PrState,
    /// Number of commits on the PR branch
    pub commits: u64,
    /// Whether the PR can be merged
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = not mergeable
    /// - `None` = unknown (host still computing)
    pub mergeable: Option<bool>,
    /// Detailed mergeability
    pub mergeable_state: MergeableState,
    /// PR title
    pub title: String,
    /// API URL of the PR
    pub url: String,
    /// Web URL of the PR
    pub html_url: String,
    /// URL listing statuses of the head commit
    pub statuses_url: String,
    /// URL listing the PR's commits
    pub commits_url: String,
    /// PR author, if reported
    pub user: Option<Account>,
}

/// State of a single commit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    /// Still running
    Pending,
    /// Passed
    Success,
    /// Errored out
    Error,
    /// Failed
    Failure,
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// A status posted against a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitStatus {
    /// Status state
    pub state: StatusState,
    /// Human-readable description
    pub description: String,
    /// Status context (the reporting system)
    pub context: String,
    /// Link to details
    pub target_url: Option<String>,
}

/// Aggregate of all statuses on one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedStatus {
    /// Aggregate state
    pub state: StatusState,
    /// Commit SHA the statuses belong to
    pub sha: String,
    /// Individual statuses, in host order
    pub statuses: Vec<CommitStatus>,
}

/// A commit on a PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Commit SHA
    pub sha: String,
}

/// A notification paired with the PR it refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestNotification {
    /// The notification
    pub notification: Notification,
    /// PR snapshot taken when the candidate was resolved
    pub pull_request: PullRequest,
}

/// Terminal classification of processing one notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationResult {
    /// The action was performed
    Done,
    /// Nothing to do, someone already closed the PR
    AlreadyDone,
    /// Not eligible; needs a human to follow up
    Skipped,
    /// An unexpected failure occurred
    Errored,
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::AlreadyDone => write!(f, "already-done"),
            Self::Skipped => write!(f, "skipped"),
            Self::Errored => write!(f, "errored"),
        }
    }
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto base branch
    Rebase,
}

impl fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}

/// Result of a merge call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    /// Whether the host confirmed the merge
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Successful response to a branch update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchUpdate {
    /// Host message
    pub message: String,
    /// URL of the updated PR
    pub url: String,
}

/// Normalized outcome of a branch update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchUpdateOutcome {
    /// Branch was updated synchronously
    Updated(BranchUpdate),
    /// Host accepted the update and will perform it asynchronously
    Queued,
}
