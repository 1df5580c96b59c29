//! GitHub host service implementation

use crate::error::{Error, Result};
use crate::platform::{HostService, NotificationQuery};
use crate::types::{
    Account, AccountType, BranchUpdate, CombinedStatus, Commit, CommitStatus, MergeMethod,
    MergeResult, MergeableState, Notification, PrState, PullRequest, RepoRef, StatusState,
    Subject, SubjectType,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Public GitHub API root
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size for URL-addressed list endpoints
const PER_PAGE: &str = "100";

// Wire types for the raw REST calls

#[derive(Deserialize)]
struct WirePullRequest {
    number: u64,
    state: String,
    #[serde(default)]
    commits: u64,
    mergeable: Option<bool>,
    mergeable_state: Option<String>,
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    statuses_url: String,
    #[serde(default)]
    commits_url: String,
    user: Option<WireUser>,
}

#[derive(Deserialize)]
struct WireUser {
    login: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct WireStatus {
    state: StatusState,
    description: Option<String>,
    #[serde(default)]
    context: String,
    target_url: Option<String>,
}

#[derive(Deserialize)]
struct WireCombinedStatus {
    state: StatusState,
    sha: String,
    #[serde(default)]
    statuses: Vec<WireStatus>,
}

#[derive(Deserialize)]
struct WireCommit {
    sha: String,
}

#[derive(Deserialize)]
struct WireBranchUpdate {
    #[serde(default)]
    message: String,
    #[serde(default)]
    url: String,
}

impl From<WirePullRequest> for PullRequest {
    fn from(pr: WirePullRequest) -> Self {
        Self {
            number: pr.number,
            state: PrState::from(pr.state.as_str()),
            commits: pr.commits,
            mergeable: pr.mergeable,
            mergeable_state: pr
                .mergeable_state
                .as_deref()
                .map_or(MergeableState::Unknown, MergeableState::from),
            title: pr.title,
            url: pr.url,
            html_url: pr.html_url,
            statuses_url: pr.statuses_url,
            commits_url: pr.commits_url,
            user: pr.user.map(|u| Account {
                login: u.login,
                account_type: AccountType::from(u.kind.as_str()),
            }),
        }
    }
}

impl From<WireStatus> for CommitStatus {
    fn from(s: WireStatus) -> Self {
        Self {
            state: s.state,
            description: s.description.unwrap_or_default(),
            context: s.context,
            target_url: s.target_url,
        }
    }
}

/// Helper to convert an octocrab notification to our `Notification` type
fn notification_from_octocrab(n: octocrab::models::activity::Notification) -> Notification {
    Notification {
        id: n.id.0.to_string(),
        subject: Subject {
            title: n.subject.title,
            url: n.subject.url.as_ref().map(ToString::to_string),
            kind: SubjectType::from(n.subject.r#type.as_str()),
        },
        reason: n.reason,
        repository: RepoRef {
            owner: n
                .repository
                .owner
                .map(|owner| owner.login)
                .unwrap_or_default(),
            name: n.repository.name,
        },
        unread: n.unread,
        updated_at: n.updated_at,
    }
}

/// GitHub service using octocrab for typed endpoints and reqwest for
/// URL-addressed ones
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http_client: Client,
    /// API root without trailing slash
    api_url: String,
}

impl GitHubService {
    /// Create a new GitHub service
    ///
    /// `api_url` defaults to [`DEFAULT_API_URL`]; pass
    /// `https://<host>/api/v3` for GitHub Enterprise.
    pub fn new(token: &str, api_url: Option<&str>) -> Result<Self> {
        let api_url = api_url
            .unwrap_or(DEFAULT_API_URL)
            .trim_end_matches('/')
            .to_string();
        let parsed = Url::parse(&api_url)
            .map_err(|e| Error::Internal(format!("invalid API URL '{api_url}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Internal(format!(
                "invalid API URL '{api_url}': expected http or https"
            )));
        }

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("bumpgate")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_url,
        })
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// GET a URL, failing on non-success statuses
    async fn get(&self, url: &str, query: &[(&str, &str)], what: &str) -> Result<Response> {
        let response = self
            .request(Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {what}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "{what} request returned {status}: {body}"
            )));
        }
        Ok(response)
    }

    /// GET a URL and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        self.get(url, query, what)
            .await?
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {what}: {e}")))
    }

    /// GET a list endpoint and every following page
    async fn get_all_pages<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut response = self.get(url, &[("per_page", PER_PAGE)], what).await?;
        loop {
            let next = next_page_url(response.headers());
            let page: Vec<T> = response
                .json()
                .await
                .map_err(|e| Error::GitHubApi(format!("Failed to parse {what}: {e}")))?;
            items.extend(page);

            let Some(next) = next else {
                return Ok(items);
            };
            debug!(url = %next, "fetching next page of {what}");
            response = self.get(&next, &[], what).await?;
        }
    }
}

/// URL of the `rel="next"` entry of a `Link` header
fn next_page_url(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(header::LINK)?.to_str().ok()?;
    link.split(',')
        .find(|part| part.contains(r#"rel="next""#))
        .and_then(|part| part.split(';').next())
        .map(|url| url.trim_matches(&[' ', '<', '>'] as &[_]).to_string())
        .filter(|url| !url.is_empty())
}

#[async_trait]
impl HostService for GitHubService {
    async fn list_notifications(&self, query: &NotificationQuery) -> Result<Vec<Notification>> {
        debug!(since = %query.since, include_read = query.include_read, "listing notifications");

        let mut builder = self
            .client
            .activity()
            .notifications()
            .list()
            .all(query.include_read)
            .since(query.since)
            .per_page(50u8);
        if let Some(before) = query.before {
            builder = builder.before(before);
        }

        let first_page = builder.send().await?;
        let notifications = self.client.all_pages(first_page).await?;

        let result: Vec<Notification> = notifications
            .into_iter()
            .map(notification_from_octocrab)
            .collect();
        debug!(count = result.len(), "listed notifications");
        Ok(result)
    }

    async fn get_pull_request(&self, url: &str) -> Result<PullRequest> {
        debug!(url, "getting PR");
        let pr: WirePullRequest = self.get_json(url, &[], "pull request").await?;
        let pr = PullRequest::from(pr);
        debug!(pr_number = pr.number, state = %pr.state, mergeable_state = %pr.mergeable_state, "got PR");
        Ok(pr)
    }

    async fn get_commit_statuses(&self, statuses_url: &str) -> Result<Vec<CommitStatus>> {
        debug!(statuses_url, "listing commit statuses");
        let statuses: Vec<WireStatus> = self
            .get_all_pages(statuses_url, "commit statuses")
            .await?;
        Ok(statuses.into_iter().map(CommitStatus::from).collect())
    }

    async fn get_combined_status(&self, repo: &RepoRef, sha: &str) -> Result<CombinedStatus> {
        debug!(%repo, sha, "getting combined status");
        let url = format!(
            "{}/repos/{}/{}/commits/{}/status",
            self.api_url, repo.owner, repo.name, sha
        );
        let combined: WireCombinedStatus = self
            .get_json(&url, &[("per_page", PER_PAGE)], "combined status")
            .await?;

        Ok(CombinedStatus {
            state: combined.state,
            sha: combined.sha,
            statuses: combined
                .statuses
                .into_iter()
                .map(CommitStatus::from)
                .collect(),
        })
    }

    async fn get_commits(&self, commits_url: &str) -> Result<Vec<Commit>> {
        debug!(commits_url, "listing commits");
        let commits: Vec<WireCommit> = self.get_all_pages(commits_url, "commits").await?;
        Ok(commits
            .into_iter()
            .map(|c| Commit { sha: c.sha })
            .collect())
    }

    async fn update_branch(&self, repo: &RepoRef, number: u64) -> Result<BranchUpdate> {
        debug!(%repo, pr_number = number, "updating PR branch");
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/update-branch",
            self.api_url, repo.owner, repo.name, number
        );

        let response = self
            .request(Method::PUT, &url)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to update branch: {e}")))?;

        let status = response.status();
        if status == StatusCode::ACCEPTED {
            let message = response
                .json::<WireBranchUpdate>()
                .await
                .map(|body| body.message)
                .unwrap_or_default();
            debug!(pr_number = number, "branch update accepted");
            return Err(Error::UpdateAccepted(message));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "update branch returned {status}: {body}"
            )));
        }

        let body: WireBranchUpdate = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse branch update: {e}")))?;
        debug!(pr_number = number, "updated PR branch");
        Ok(BranchUpdate {
            message: body.message,
            url: body.url,
        })
    }

    async fn merge(
        &self,
        repo: &RepoRef,
        number: u64,
        message: &str,
        method: MergeMethod,
    ) -> Result<MergeResult> {
        debug!(%repo, pr_number = number, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&repo.owner, &repo.name)
            .merge(number)
            .method(octocrab_method)
            .title(message)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            pr_number = number,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }
}
