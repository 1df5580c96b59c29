//! Shared test fixtures

#![allow(dead_code)]

pub mod mock_host;

pub use mock_host::MockHostService;

use async_trait::async_trait;
use bumpgate::context::{DecisionContext, Delay};
use bumpgate::error::{Error, Result};
use bumpgate::prompt::Prompter;
use bumpgate::types::{
    Account, AccountType, CombinedStatus, Commit, CommitStatus, DEPENDABOT_LOGIN,
    MANUAL_AUTHORIZATION_DESCRIPTION, MergeableState, Notification, PrState, PullRequest,
    PullRequestNotification, RepoRef, StatusState, Subject, SubjectType,
};
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";

pub fn repo() -> RepoRef {
    RepoRef::new(OWNER, REPO)
}

pub fn pr_url(number: u64) -> String {
    format!("https://api.github.com/repos/{OWNER}/{REPO}/pulls/{number}")
}

pub fn html_url(number: u64) -> String {
    format!("https://github.com/{OWNER}/{REPO}/pull/{number}")
}

pub fn statuses_url(number: u64) -> String {
    format!("https://api.github.com/repos/{OWNER}/{REPO}/statuses/head{number}")
}

pub fn commits_url(number: u64) -> String {
    format!("{}/commits", pr_url(number))
}

/// A review-requested PR notification for PR `number`
pub fn make_notification(number: u64, title: &str) -> Notification {
    Notification {
        id: number.to_string(),
        subject: Subject {
            title: title.to_string(),
            url: Some(pr_url(number)),
            kind: SubjectType::PullRequest,
        },
        reason: "review_requested".to_string(),
        repository: repo(),
        unread: true,
        updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}

/// An open, mergeable, single-commit Dependabot PR
pub fn make_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        state: PrState::Open,
        commits: 1,
        mergeable: Some(true),
        mergeable_state: MergeableState::Clean,
        title: title.to_string(),
        url: pr_url(number),
        html_url: html_url(number),
        statuses_url: statuses_url(number),
        commits_url: commits_url(number),
        user: Some(Account {
            login: DEPENDABOT_LOGIN.to_string(),
            account_type: AccountType::Bot,
        }),
    }
}

/// PR snapshot with the given mergeability
pub fn pr_with_mergeability(
    number: u64,
    mergeable_state: MergeableState,
    mergeable: Option<bool>,
) -> PullRequest {
    PullRequest {
        mergeable_state,
        mergeable,
        ..make_pr(number, "Bump serde")
    }
}

pub fn candidate(number: u64, title: &str) -> PullRequestNotification {
    PullRequestNotification {
        notification: make_notification(number, title),
        pull_request: make_pr(number, title),
    }
}

pub fn status(state: StatusState, description: &str) -> CommitStatus {
    CommitStatus {
        state,
        description: description.to_string(),
        context: "evergreen".to_string(),
        target_url: Some("https://ci.example.com/build/1".to_string()),
    }
}

pub fn manual_authorization_status() -> CommitStatus {
    status(StatusState::Failure, MANUAL_AUTHORIZATION_DESCRIPTION)
}

pub fn combined(sha: &str, statuses: Vec<CommitStatus>) -> CombinedStatus {
    CombinedStatus {
        state: StatusState::Success,
        sha: sha.to_string(),
        statuses,
    }
}

pub fn head_sha(number: u64) -> String {
    format!("sha{number}")
}

/// PR `number` waiting for manual authorization
pub fn setup_authorizable_pr(mock: &MockHostService, number: u64, title: &str) {
    mock.set_pr(&pr_url(number), make_pr(number, title));
    mock.set_statuses(&statuses_url(number), vec![manual_authorization_status()]);
}

/// PR `number` that is mergeable with a finished patch
pub fn setup_mergeable_pr(mock: &MockHostService, number: u64, title: &str) {
    mock.set_pr(&pr_url(number), make_pr(number, title));
    mock.set_commits(
        &commits_url(number),
        vec![Commit {
            sha: head_sha(number),
        }],
    );
    mock.set_combined_status(
        &head_sha(number),
        combined(
            &head_sha(number),
            vec![status(StatusState::Success, "patch finished: no changes")],
        ),
    );
}

/// Delay that records requested pauses and returns immediately
#[derive(Default)]
pub struct RecordingDelay {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().unwrap().clone()
    }
}

#[async_trait]
impl Delay for RecordingDelay {
    async fn pause(&self, duration: Duration) {
        self.pauses.lock().unwrap().push(duration);
    }
}

/// Prompter answering from a script and recording the questions
///
/// A `None` entry answers like an operator pressing Ctrl-C.
#[derive(Default)]
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<Option<bool>>>,
    questions: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[bool]) -> Self {
        Self::scripted(answers.iter().copied().map(Some))
    }

    /// Answers `answers`, then is interrupted
    pub fn interrupted_after(answers: &[bool]) -> Self {
        Self::scripted(answers.iter().copied().map(Some).chain([None]))
    }

    fn scripted(answers: impl IntoIterator<Item = Option<bool>>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            questions: Mutex::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().unwrap().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.questions.lock().unwrap().push(question.to_string());
        match self.answers.lock().unwrap().pop_front() {
            Some(Some(answer)) => Ok(answer),
            Some(None) => Err(Error::Interrupted),
            None => Err(Error::Prompt("no scripted answer left".to_string())),
        }
    }
}

/// Non-interactive context over `host` with instant pauses
pub fn context<'a>(host: &'a MockHostService, delay: &'a RecordingDelay) -> DecisionContext<'a> {
    DecisionContext::new(host, delay)
}
