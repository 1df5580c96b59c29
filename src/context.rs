//! Shared context for the decision engine
//!
//! Bundles the host handle with the capabilities the evaluators need:
//! interactive confirmation, call timeouts and the retry pause.

use crate::error::{Error, Result};
use crate::platform::HostService;
use crate::prompt::Prompter;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

/// Upper bounds for host calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Bound on listing notifications (paginated, may be slow)
    pub list: Duration,
    /// Bound on every other single host call
    pub call: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(5 * 60),
            call: Duration::from_secs(60),
        }
    }
}

/// Bounded retry for mergeability polling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of PR fetches
    pub max_attempts: u32,
    /// Pause between attempts
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            interval: Duration::from_secs(1),
        }
    }
}

/// Pause strategy between poll attempts
#[async_trait]
pub trait Delay: Send + Sync {
    /// Wait for `duration`
    async fn pause(&self, duration: Duration);
}

/// Real-time pause backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Everything an evaluator needs to reach a decision
pub struct DecisionContext<'a> {
    /// Host service
    pub host: &'a dyn HostService,
    /// Confirmation capability; `None` runs non-interactively
    pub prompter: Option<&'a dyn Prompter>,
    /// Pause between poll attempts
    pub delay: &'a dyn Delay,
    /// Call bounds
    pub timeouts: Timeouts,
    /// Mergeability polling bounds
    pub retry: RetryPolicy,
}

impl<'a> DecisionContext<'a> {
    /// Create a non-interactive context with default bounds
    pub fn new(host: &'a dyn HostService, delay: &'a dyn Delay) -> Self {
        Self {
            host,
            prompter: None,
            delay,
            timeouts: Timeouts::default(),
            retry: RetryPolicy::default(),
        }
    }

    /// Ask for confirmation before acting
    #[must_use]
    pub fn with_prompter(mut self, prompter: &'a dyn Prompter) -> Self {
        self.prompter = Some(prompter);
        self
    }

    /// Override call bounds
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Override polling bounds
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run a single host call under the per-call bound
    pub async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        bounded(operation, self.timeouts.call, fut).await
    }

    /// Ask the operator, if interactive. Non-interactive contexts always
    /// proceed.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        self.prompter
            .map_or(Ok(true), |prompter| prompter.confirm(question))
    }
}

/// Run `fut` with an upper bound, mapping expiry to [`Error::Timeout`]
pub async fn bounded<T>(
    operation: &'static str,
    timeout: Duration,
    fut: impl Future<Output = Result<T>> + Send,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| Error::Timeout { operation, timeout })?
}
