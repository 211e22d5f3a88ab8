//! Pure selection of repositories and candidate pull requests

use crate::github::{PullRequest, Repository, matches_branch_pattern};

/// Drop archived repositories and apply the allow-list, preserving order
///
/// An empty allow-list keeps everything; otherwise only repositories whose
/// short name is listed survive.
#[must_use]
pub fn filter_repositories(repos: Vec<Repository>, allow_list: &[String]) -> Vec<Repository> {
    repos
        .into_iter()
        .filter(|r| !r.archived)
        .filter(|r| allow_list.is_empty() || allow_list.iter().any(|name| name == &r.name))
        .collect()
}

/// Keep open PRs that are non-draft, target the default branch, and whose
/// head branch matches the pattern
#[must_use]
pub fn filter_candidates(
    prs: Vec<PullRequest>,
    default_branch: &str,
    pattern: &str,
) -> Vec<PullRequest> {
    prs.into_iter()
        .filter(|pr| !pr.draft)
        .filter(|pr| pr.base_branch == default_branch)
        .filter(|pr| matches_branch_pattern(&pr.head_branch, pattern))
        .collect()
}
