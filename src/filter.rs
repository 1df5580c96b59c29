//! Notification filtering
//!
//! Narrows a raw notification list to candidates. Each predicate set matches
//! if any entry matches, and an empty set matches everything. Predicates run
//! cheapest first (title, reason, type) so the author check, which costs a
//! PR fetch, only runs on notifications that already passed the others.

use crate::context::DecisionContext;
use crate::error::{Error, Result};
use crate::types::{
    Account, AccountType, DEPENDABOT_LOGIN, Notification, PullRequest, SubjectType,
};
use regex::Regex;
use tracing::debug;

/// Accept PRs authored by a given account
///
/// `None` fields are wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthorFilter {
    /// Login to match
    pub name: Option<String>,
    /// Account type to match
    pub account_type: Option<AccountType>,
}

impl AuthorFilter {
    /// The Dependabot bot account
    pub fn dependabot() -> Self {
        Self {
            name: Some(DEPENDABOT_LOGIN.to_string()),
            account_type: Some(AccountType::Bot),
        }
    }

    /// Whether `account` satisfies this filter
    pub fn matches(&self, account: &Account) -> bool {
        self.name.as_ref().is_none_or(|name| *name == account.login)
            && self
                .account_type
                .as_ref()
                .is_none_or(|kind| *kind == account.account_type)
    }
}

/// Predicate sets for [`filter_notifications`]
#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    titles: Vec<Regex>,
    reasons: Vec<String>,
    subject_types: Vec<SubjectType>,
    authors: Vec<AuthorFilter>,
}

impl NotificationFilter {
    /// A filter that matches every notification
    pub fn new() -> Self {
        Self::default()
    }

    /// Match titles against any of these regular expressions
    pub fn with_titles<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            self.titles.push(regex);
        }
        Ok(self)
    }

    /// Match any of these reason codes
    #[must_use]
    pub fn with_reasons<I, S>(mut self, reasons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reasons.extend(reasons.into_iter().map(Into::into));
        self
    }

    /// Match any of these subject types
    #[must_use]
    pub fn with_subject_types(mut self, types: impl IntoIterator<Item = SubjectType>) -> Self {
        self.subject_types.extend(types);
        self
    }

    /// Match PRs authored by any of these accounts
    #[must_use]
    pub fn with_authors(mut self, authors: impl IntoIterator<Item = AuthorFilter>) -> Self {
        self.authors.extend(authors);
        self
    }

    /// Title predicate
    pub fn matches_title(&self, notification: &Notification) -> bool {
        self.titles.is_empty()
            || self
                .titles
                .iter()
                .any(|re| re.is_match(&notification.subject.title))
    }

    /// Reason predicate
    pub fn matches_reason(&self, notification: &Notification) -> bool {
        self.reasons.is_empty() || self.reasons.contains(&notification.reason)
    }

    /// Subject type predicate
    pub fn matches_type(&self, notification: &Notification) -> bool {
        self.subject_types.is_empty() || self.subject_types.contains(&notification.subject.kind)
    }

    /// Author predicate; fetches the PR when an author set is configured
    ///
    /// Only pull requests with a subject URL can match a non-empty author
    /// set.
    pub async fn matches_author(
        &self,
        ctx: &DecisionContext<'_>,
        notification: &Notification,
    ) -> Result<bool> {
        Ok(!matches!(
            self.check_author(ctx, notification).await?,
            AuthorCheck::Rejected
        ))
    }

    async fn check_author(
        &self,
        ctx: &DecisionContext<'_>,
        notification: &Notification,
    ) -> Result<AuthorCheck> {
        if self.authors.is_empty() {
            return Ok(AuthorCheck::Unchecked);
        }
        if notification.subject.kind != SubjectType::PullRequest {
            return Ok(AuthorCheck::Rejected);
        }
        let Some(url) = notification.subject.url.as_deref() else {
            return Ok(AuthorCheck::Rejected);
        };

        let pr = ctx
            .call("getting PR author", ctx.host.get_pull_request(url))
            .await?;
        let matched = pr
            .user
            .as_ref()
            .is_some_and(|user| self.authors.iter().any(|author| author.matches(user)));
        Ok(if matched {
            AuthorCheck::Matched(pr)
        } else {
            AuthorCheck::Rejected
        })
    }
}

enum AuthorCheck {
    /// No author set configured
    Unchecked,
    /// Author matched; carries the PR fetched to check it
    Matched(PullRequest),
    Rejected,
}

/// A notification that passed every predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    /// The notification
    pub notification: Notification,
    /// PR snapshot fetched by the author check, if one ran
    pub pull_request: Option<PullRequest>,
}

/// Reduce `notifications` to the ones matching every configured predicate
///
/// A failed author lookup aborts the whole operation: reporting it as a
/// mismatch would hide host errors as false negatives.
pub async fn filter_notifications(
    ctx: &DecisionContext<'_>,
    notifications: Vec<Notification>,
    filter: &NotificationFilter,
) -> Result<Vec<Notification>> {
    Ok(select_candidates(ctx, notifications, filter)
        .await?
        .into_iter()
        .map(|selected| selected.notification)
        .collect())
}

/// Like [`filter_notifications`], keeping the PR snapshots the author check
/// fetched so they are not fetched again
pub async fn select_candidates(
    ctx: &DecisionContext<'_>,
    notifications: Vec<Notification>,
    filter: &NotificationFilter,
) -> Result<Vec<Selected>> {
    let total = notifications.len();
    debug!(count = total, "filtering notifications");

    let mut selected = Vec::new();
    for notification in notifications {
        if !filter.matches_title(&notification) {
            debug!(notification = %notification.log_format(), "skipping notification due to unmatched title");
            continue;
        }
        if !filter.matches_reason(&notification) {
            debug!(notification = %notification.log_format(), reason = %notification.reason, "skipping notification due to unmatched reason");
            continue;
        }
        if !filter.matches_type(&notification) {
            debug!(notification = %notification.log_format(), kind = %notification.subject.kind, "skipping notification due to unmatched type");
            continue;
        }
        let pull_request = match filter.check_author(ctx, &notification).await? {
            AuthorCheck::Unchecked => None,
            AuthorCheck::Matched(pr) => Some(pr),
            AuthorCheck::Rejected => {
                debug!(notification = %notification.log_format(), "skipping notification due to unmatched author");
                continue;
            }
        };
        selected.push(Selected {
            notification,
            pull_request,
        });
    }

    if selected.len() != total {
        debug!(count = selected.len(), "filtered notifications to smaller candidate set");
    }
    Ok(selected)
}
