//! GitHub token resolution
//!
//! Tries the `GITHUB_TOKEN` environment variable first, then the gh CLI.

use std::process::Command;

use crate::error::{Error, Result};

/// Source of the resolved authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the gh CLI
    Cli,
    /// Token from the `GITHUB_TOKEN` environment variable
    EnvVar,
}

/// A resolved GitHub token and its provenance
#[derive(Clone)]
pub struct AuthToken {
    /// The token value
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

impl std::fmt::Debug for AuthToken {
    // Never print the token itself
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthToken")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// Resolve a GitHub token from the environment or the gh CLI
pub fn resolve_token() -> Result<AuthToken> {
    if let Ok(token) = std::env::var("GITHUB_TOKEN")
        && !token.trim().is_empty()
    {
        return Ok(AuthToken {
            token: token.trim().to_string(),
            source: AuthSource::EnvVar,
        });
    }

    if let Some(token) = gh_cli_token() {
        return Ok(AuthToken {
            token,
            source: AuthSource::Cli,
        });
    }

    Err(Error::Auth(
        "no GitHub token found: set GITHUB_TOKEN environment variable or authenticate with \
         'gh auth login'"
            .to_string(),
    ))
}

/// Ask the gh CLI for its stored token
fn gh_cli_token() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let token = String::from_utf8(output.stdout).ok()?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
