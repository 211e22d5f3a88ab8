//! Run configuration and flag validation
//!
//! The CLI resolves its arguments into a [`Config`] and validates it
//! before any API call happens. All cross-flag rules live here, never in
//! the evaluator.

use crate::error::{Error, Result};

/// Validated configuration of one sweep
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Config {
    /// Organization to sweep
    pub org: String,
    /// Substring matched against head branch names
    pub source_branch: String,
    /// Update out-of-date branches instead of skipping them
    pub rebase: bool,
    /// Merge PRs that are in a valid state
    pub merge: bool,
    /// With merge, merge even when the branch is behind its base
    pub skip_rebase: bool,
    /// Restrict the sweep to these repository names; empty means all
    pub repos: Vec<String>,
    /// Maximum repositories to process; 0 means unlimited
    pub repo_limit: usize,
    /// Scan first and ask before executing any action
    pub confirm: bool,
}

impl Config {
    /// Check cross-flag consistency, returning the first violation
    pub fn validate(&self) -> Result<()> {
        if self.org.is_empty() {
            return Err(Error::Config(
                "--org is required (or set GITHUB_ORG environment variable)".to_string(),
            ));
        }
        if self.source_branch.is_empty() {
            return Err(Error::Config("--source-branch is required".to_string()));
        }
        if self.rebase && self.merge {
            return Err(Error::Config(
                "--rebase and --merge are mutually exclusive; use --rebase first to update \
                 branches, then --merge after checks pass"
                    .to_string(),
            ));
        }
        if self.skip_rebase && !self.merge {
            return Err(Error::Config("--skip-rebase requires --merge".to_string()));
        }
        Ok(())
    }

    /// Human description of the operating mode
    #[must_use]
    pub const fn mode_description(&self) -> &'static str {
        if self.rebase {
            "rebase mode"
        } else if self.merge && self.skip_rebase {
            "merge mode (skipping rebase)"
        } else if self.merge {
            "merge mode"
        } else {
            "analysis only (no mutations)"
        }
    }

    /// Repository ceiling, when one was set
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        if self.repo_limit == 0 {
            None
        } else {
            Some(self.repo_limit)
        }
    }
}
