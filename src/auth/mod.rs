//! Authentication for GitHub
//!
//! The access token comes from the environment.

use crate::error::{Error, Result};
use std::env;

/// Environment variable holding the access token
pub const TOKEN_ENV_VAR: &str = "GITHUB_OAUTH_TOKEN";

/// Resolved GitHub credentials
#[derive(Clone)]
pub struct GitHubAuthConfig {
    /// Access token
    pub token: String,
}

impl std::fmt::Debug for GitHubAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubAuthConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Read the token from [`TOKEN_ENV_VAR`]
///
/// A missing or blank token is an error; nothing can run without it.
pub fn get_github_auth() -> Result<GitHubAuthConfig> {
    token_from(env::var(TOKEN_ENV_VAR).ok())
}

fn token_from(value: Option<String>) -> Result<GitHubAuthConfig> {
    match value.map(|v| v.trim().to_string()) {
        Some(token) if !token.is_empty() => Ok(GitHubAuthConfig { token }),
        _ => Err(Error::Auth(format!(
            "{TOKEN_ENV_VAR} environment variable is required"
        ))),
    }
}
