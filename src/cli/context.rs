//! Shared command context for CLI commands
//!
//! Resolves credentials and builds the long-lived services both
//! subcommands need.

use bumpgate::auth::get_github_auth;
use bumpgate::context::{DecisionContext, TokioDelay};
use bumpgate::error::Result;
use bumpgate::platform::GitHubService;
use bumpgate::prompt::TerminalPrompter;

/// Services shared across runs of a command
pub struct CommandContext {
    /// GitHub host service
    pub host: GitHubService,
    /// Terminal confirmation prompt
    pub prompter: TerminalPrompter,
    /// Real-time pause between poll attempts
    pub delay: TokioDelay,
}

impl CommandContext {
    /// Resolve the token and create the host service
    ///
    /// Fails before any host call if the token is missing.
    pub fn new(api_url: Option<&str>) -> Result<Self> {
        let auth = get_github_auth()?;
        let host = GitHubService::new(&auth.token, api_url)?;
        Ok(Self {
            host,
            prompter: TerminalPrompter,
            delay: TokioDelay,
        })
    }

    /// Decision context for one run
    pub fn decision_context(&self, interactive: bool) -> DecisionContext<'_> {
        let ctx = DecisionContext::new(&self.host, &self.delay);
        if interactive {
            ctx.with_prompter(&self.prompter)
        } else {
            ctx
        }
    }
}
