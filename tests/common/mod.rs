//! Shared fixtures for unit and integration tests
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

pub mod mock_github;

pub use mock_github::MockGitHubClient;

use pr_sweep::config::Config;
use pr_sweep::github::{BranchStatus, CheckState, CheckStatus, PullRequest, Repository};

/// An active repository under the `acme` organization
pub fn make_repo(name: &str) -> Repository {
    Repository {
        name: name.to_string(),
        full_name: format!("acme/{name}"),
        default_branch: "main".to_string(),
        archived: false,
    }
}

/// An archived repository under the `acme` organization
pub fn make_archived_repo(name: &str) -> Repository {
    Repository {
        archived: true,
        ..make_repo(name)
    }
}

/// A non-draft PR targeting `main`
pub fn make_pr(number: u64, head_branch: &str) -> PullRequest {
    PullRequest {
        number,
        title: format!("Update {head_branch}"),
        url: format!("https://github.com/acme/widgets/pull/{number}"),
        head_branch: head_branch.to_string(),
        base_branch: "main".to_string(),
        draft: false,
        head_sha: format!("sha-{number}"),
    }
}

pub fn passing_checks() -> CheckStatus {
    CheckStatus {
        state: CheckState::AllPassing,
        detail: "all checks passing".to_string(),
    }
}

pub fn pending_checks() -> CheckStatus {
    CheckStatus {
        state: CheckState::Pending,
        detail: "check 'build' is in_progress".to_string(),
    }
}

pub fn failing_checks() -> CheckStatus {
    CheckStatus {
        state: CheckState::Failing,
        detail: "check 'test' has conclusion 'failure'".to_string(),
    }
}

pub fn no_checks() -> CheckStatus {
    CheckStatus {
        state: CheckState::NoChecks,
        detail: "no checks found".to_string(),
    }
}

pub fn up_to_date_branch() -> BranchStatus {
    BranchStatus {
        behind_by: 0,
        has_conflict: false,
    }
}

pub fn behind_branch(behind_by: u64) -> BranchStatus {
    BranchStatus {
        behind_by,
        has_conflict: false,
    }
}

pub fn conflicted_branch() -> BranchStatus {
    BranchStatus {
        behind_by: 0,
        has_conflict: true,
    }
}

/// Analysis-only configuration sweeping `acme` for `deps/` branches
pub fn base_config() -> Config {
    Config {
        org: "acme".to_string(),
        source_branch: "deps/".to_string(),
        rebase: false,
        merge: false,
        skip_rebase: false,
        repos: Vec::new(),
        repo_limit: 0,
        confirm: false,
    }
}

/// [`base_config`] with merging enabled
pub fn merge_config() -> Config {
    Config {
        merge: true,
        ..base_config()
    }
}

/// [`base_config`] with rebasing enabled
pub fn rebase_config() -> Config {
    Config {
        rebase: true,
        ..base_config()
    }
}
