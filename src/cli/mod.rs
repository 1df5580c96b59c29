//! Command-line interface

mod context;
mod run;
mod style;

pub use run::run_command;
pub use style::Stylize;

use bumpgate::error::{Error, Result};
use bumpgate::filter::{AuthorFilter, NotificationFilter};
use bumpgate::platform::NotificationQuery;
use bumpgate::run::Operation;
use bumpgate::types::{NOTIFICATION_REASONS, SubjectType};
use chrono::{DateTime, Utc};
use clap::builder::PossibleValuesParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Authorize and merge dependency-update PRs from GitHub notifications
#[derive(Debug, Parser)]
#[command(name = "bumpgate", version, about)]
pub struct Cli {
    /// GitHub API root (for GitHub Enterprise: https://<host>/api/v3)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Authorize Dependabot PRs whose patch is waiting for manual authorization
    #[command(visible_alias = "aa")]
    Authorize(NotificationArgs),

    /// Merge Dependabot PRs that pass all checks
    #[command(visible_alias = "am")]
    Merge(NotificationArgs),
}

impl Commands {
    /// Operation and arguments of the subcommand
    pub const fn split(&self) -> (Operation, &NotificationArgs) {
        match self {
            Self::Authorize(args) => (Operation::Authorize, args),
            Self::Merge(args) => (Operation::Merge, args),
        }
    }
}

/// Notification selection and run options shared by both subcommands
#[derive(Debug, Clone, Args)]
pub struct NotificationArgs {
    /// How far back to look for notifications (e.g. 300ms, 30m, "1h 30m", 2days)
    #[arg(long, default_value = "24h", value_parser = humantime::parse_duration)]
    pub past: Duration,

    /// Include notifications already marked as read
    #[arg(long)]
    pub include_read: bool,

    /// Only notifications whose title matches one of these regexes
    #[arg(long = "include-titles", value_name = "REGEX", value_delimiter = ',')]
    pub include_titles: Vec<String>,

    /// Only notifications with one of these reasons
    #[arg(
        long = "include-reasons",
        value_name = "REASON",
        value_delimiter = ',',
        value_parser = PossibleValuesParser::new(NOTIFICATION_REASONS.iter().copied())
    )]
    pub include_reasons: Vec<String>,

    /// Also verify that the PR was opened by Dependabot (one extra request per notification)
    #[arg(long)]
    pub check_dependabot_user: bool,

    /// Ask before acting on each PR
    #[arg(long)]
    pub interactive: bool,

    /// Repeat on a cron schedule (e.g. "*/30 * * * *")
    #[arg(long, value_name = "CRON")]
    pub schedule: Option<String>,
}

impl NotificationArgs {
    /// Listing window ending at `now`
    pub fn query(&self, now: DateTime<Utc>) -> Result<NotificationQuery> {
        let past = chrono::Duration::from_std(self.past)
            .map_err(|e| Error::Internal(format!("lookback too large: {e}")))?;
        Ok(NotificationQuery {
            since: now - past,
            before: None,
            include_read: self.include_read,
        })
    }

    /// Predicates selected by the flags
    pub fn filter(&self) -> Result<NotificationFilter> {
        let mut filter = NotificationFilter::new()
            .with_titles(&self.include_titles)?
            .with_reasons(self.include_reasons.iter().cloned())
            .with_subject_types([SubjectType::PullRequest]);
        if self.check_dependabot_user {
            filter = filter.with_authors([AuthorFilter::dependabot()]);
        }
        Ok(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn past(value: &str) -> std::result::Result<Duration, clap::Error> {
        let cli = Cli::try_parse_from(["bumpgate", "merge", "--past", value])?;
        Ok(cli.command.split().1.past)
    }

    #[test]
    fn test_past_accepts_human_durations() {
        assert_eq!(past("24h").unwrap(), Duration::from_secs(86_400));
        assert_eq!(past("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(past("1h 30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(past("1h30m").unwrap(), Duration::from_secs(5_400));
        assert_eq!(past("2days").unwrap(), Duration::from_secs(172_800));
    }

    #[test]
    fn test_past_rejects_garbage() {
        assert!(past("").is_err());
        assert!(past("12").is_err());
        assert!(past("soon").is_err());
    }

    #[test]
    fn test_dependabot_check_adds_author_filter() {
        let cli = Cli::parse_from(["bumpgate", "merge", "--check-dependabot-user"]);
        let (operation, args) = cli.command.split();
        assert_eq!(operation, Operation::Merge);
        assert!(args.check_dependabot_user);
        assert_eq!(args.past, Duration::from_secs(86_400));
    }

    #[test]
    fn test_reasons_are_validated() {
        let result = Cli::try_parse_from(["bumpgate", "authorize", "--include-reasons", "bogus"]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "bumpgate",
            "aa",
            "--include-reasons",
            "review_requested,mention",
        ])
        .unwrap();
        let (_, args) = cli.command.split();
        assert_eq!(args.include_reasons, ["review_requested", "mention"]);
    }

    #[test]
    fn test_invalid_title_pattern_is_rejected() {
        let cli = Cli::parse_from(["bumpgate", "merge", "--include-titles", "("]);
        let (_, args) = cli.command.split();
        assert!(matches!(args.filter(), Err(Error::InvalidPattern { .. })));
    }
}
