//! Mock host service for testing
//!
//! These are test utilities - not all may be used by every test crate.

#![allow(dead_code)]

use async_trait::async_trait;
use bumpgate::error::{Error, Result};
use bumpgate::platform::{HostService, NotificationQuery};
use bumpgate::types::{
    BranchUpdate, CombinedStatus, Commit, CommitStatus, MergeMethod, MergeResult, Notification,
    PullRequest, RepoRef,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `update_branch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBranchCall {
    pub repo: RepoRef,
    pub number: u64,
}

/// Call record for `merge`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub repo: RepoRef,
    pub number: u64,
    pub message: String,
    pub method: MergeMethod,
}

/// How `update_branch` responds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpdateBranchBehavior {
    /// Synchronous success
    #[default]
    Updated,
    /// 202 Accepted, update queued
    Accepted,
    /// Any other failure
    Fail(String),
}

/// Simple mock host service for testing
///
/// Manually implements `HostService` so PR responses can be scripted as
/// sequences (one snapshot per fetch) for the polling tests.
///
/// Features:
/// - Scripted PR snapshots per URL (the last one repeats)
/// - Call tracking, including the global call order
/// - Error injection for failure path testing
#[derive(Default)]
pub struct MockHostService {
    notifications: Mutex<Vec<Notification>>,
    pr_responses: Mutex<HashMap<String, VecDeque<PullRequest>>>,
    status_responses: Mutex<HashMap<String, Vec<CommitStatus>>>,
    commit_responses: Mutex<HashMap<String, Vec<Commit>>>,
    combined_responses: Mutex<HashMap<String, CombinedStatus>>,
    merge_responses: Mutex<HashMap<u64, MergeResult>>,
    update_behavior: Mutex<UpdateBranchBehavior>,
    // Call tracking
    call_log: Mutex<Vec<String>>,
    get_pr_calls: Mutex<Vec<String>>,
    status_calls: Mutex<Vec<String>>,
    commit_calls: Mutex<Vec<String>>,
    combined_calls: Mutex<Vec<(RepoRef, String)>>,
    update_branch_calls: Mutex<Vec<UpdateBranchCall>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_get_pr: Mutex<HashMap<String, String>>,
    error_on_statuses: Mutex<Option<String>>,
    error_on_merge: Mutex<Option<String>>,
}

impl MockHostService {
    pub fn new() -> Self {
        Self::default()
    }

    // === Response setup ===

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    /// Every fetch of `url` returns `pr`
    pub fn set_pr(&self, url: &str, pr: PullRequest) {
        self.set_pr_sequence(url, vec![pr]);
    }

    /// Successive fetches of `url` return these snapshots in order; the last
    /// one repeats
    pub fn set_pr_sequence(&self, url: &str, prs: Vec<PullRequest>) {
        self.pr_responses
            .lock()
            .unwrap()
            .insert(url.to_string(), prs.into());
    }

    pub fn set_statuses(&self, statuses_url: &str, statuses: Vec<CommitStatus>) {
        self.status_responses
            .lock()
            .unwrap()
            .insert(statuses_url.to_string(), statuses);
    }

    pub fn set_commits(&self, commits_url: &str, commits: Vec<Commit>) {
        self.commit_responses
            .lock()
            .unwrap()
            .insert(commits_url.to_string(), commits);
    }

    pub fn set_combined_status(&self, sha: &str, combined: CombinedStatus) {
        self.combined_responses
            .lock()
            .unwrap()
            .insert(sha.to_string(), combined);
    }

    pub fn set_merge_response(&self, number: u64, result: MergeResult) {
        self.merge_responses.lock().unwrap().insert(number, result);
    }

    pub fn set_update_behavior(&self, behavior: UpdateBranchBehavior) {
        *self.update_behavior.lock().unwrap() = behavior;
    }

    // === Error injection ===

    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_get_pr(&self, url: &str, msg: &str) {
        self.error_on_get_pr
            .lock()
            .unwrap()
            .insert(url.to_string(), msg.to_string());
    }

    pub fn fail_statuses(&self, msg: &str) {
        *self.error_on_statuses.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_merge(&self, msg: &str) {
        *self.error_on_merge.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    /// Names of every host call in order
    pub fn call_log(&self) -> Vec<String> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn get_pr_calls(&self) -> Vec<String> {
        self.get_pr_calls.lock().unwrap().clone()
    }

    pub fn get_pr_call_count(&self, url: &str) -> usize {
        self.get_pr_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }

    pub fn status_calls(&self) -> Vec<String> {
        self.status_calls.lock().unwrap().clone()
    }

    pub fn commit_calls(&self) -> Vec<String> {
        self.commit_calls.lock().unwrap().clone()
    }

    pub fn combined_calls(&self) -> Vec<(RepoRef, String)> {
        self.combined_calls.lock().unwrap().clone()
    }

    pub fn update_branch_calls(&self) -> Vec<UpdateBranchCall> {
        self.update_branch_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Assert that `merge` was called for a specific PR
    pub fn assert_merge_called(&self, number: u64) {
        let calls = self.merge_calls();
        assert!(
            calls.iter().any(|c| c.number == number),
            "Expected merge({number}) but got: {calls:?}"
        );
    }

    /// Assert that nothing was merged or updated
    pub fn assert_no_action(&self) {
        let merges = self.merge_calls();
        let updates = self.update_branch_calls();
        assert!(
            merges.is_empty() && updates.is_empty(),
            "Expected no actions but got merges: {merges:?}, updates: {updates:?}"
        );
    }

    fn log(&self, call: &str) {
        self.call_log.lock().unwrap().push(call.to_string());
    }
}

#[async_trait]
impl HostService for MockHostService {
    async fn list_notifications(&self, _query: &NotificationQuery) -> Result<Vec<Notification>> {
        self.log("list_notifications");
        if let Some(msg) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, url: &str) -> Result<PullRequest> {
        self.log("get_pull_request");
        self.get_pr_calls.lock().unwrap().push(url.to_string());

        if let Some(msg) = self.error_on_get_pr.lock().unwrap().get(url) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let mut responses = self.pr_responses.lock().unwrap();
        let queue = responses.get_mut(url).ok_or_else(|| {
            Error::GitHubApi(format!("get_pull_request: no response configured for {url}"))
        })?;
        let pr = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        pr.ok_or_else(|| Error::GitHubApi(format!("get_pull_request: empty script for {url}")))
    }

    async fn get_commit_statuses(&self, statuses_url: &str) -> Result<Vec<CommitStatus>> {
        self.log("get_commit_statuses");
        self.status_calls
            .lock()
            .unwrap()
            .push(statuses_url.to_string());

        if let Some(msg) = self.error_on_statuses.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(self
            .status_responses
            .lock()
            .unwrap()
            .get(statuses_url)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CombinedStatus> {
        self.log("get_combined_status");
        self.combined_calls
            .lock()
            .unwrap()
            .push((repo.clone(), sha.to_string()));

        self.combined_responses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .ok_or_else(|| {
                Error::GitHubApi(format!("get_combined_status: no response configured for {sha}"))
            })
    }

    async fn get_commits(&self, commits_url: &str) -> Result<Vec<Commit>> {
        self.log("get_commits");
        self.commit_calls
            .lock()
            .unwrap()
            .push(commits_url.to_string());
        Ok(self
            .commit_responses
            .lock()
            .unwrap()
            .get(commits_url)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_branch(&self, repo: &RepoRef, number: u64) -> Result<BranchUpdate> {
        self.log("update_branch");
        self.update_branch_calls
            .lock()
            .unwrap()
            .push(UpdateBranchCall {
                repo: repo.clone(),
                number,
            });

        match self.update_behavior.lock().unwrap().clone() {
            UpdateBranchBehavior::Updated => Ok(BranchUpdate {
                message: "Updating pull request branch.".to_string(),
                url: format!("https://github.com/{repo}/pull/{number}"),
            }),
            UpdateBranchBehavior::Accepted => Err(Error::UpdateAccepted(
                "Updating pull request branch.".to_string(),
            )),
            UpdateBranchBehavior::Fail(msg) => Err(Error::GitHubApi(msg)),
        }
    }

    async fn merge(
        &self,
        repo: &RepoRef,
        number: u64,
        message: &str,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        self.log("merge");
        self.merge_calls.lock().unwrap().push(MergeCall {
            repo: repo.clone(),
            number,
            message: message.to_string(),
            method,
        });

        if let Some(msg) = self.error_on_merge.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self
            .merge_responses
            .lock()
            .unwrap()
            .get(&number)
            .cloned()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merged_sha_{number}")),
                message: Some("Pull Request successfully merged".to_string()),
            }))
    }
}
