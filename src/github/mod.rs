//! GitHub data model and client abstraction
//!
//! Snapshot types for the entities a sweep touches, plus the
//! [`GitHubClient`] trait that separates the engine from the live API.

mod rest;

pub use rest::RestClient;

use async_trait::async_trait;

use crate::error::Result;

/// Repository snapshot, fetched once per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Short repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Default branch name
    pub default_branch: String,
    /// Whether the repository is archived
    pub archived: bool,
}

/// Open pull request snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number within its repository
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL of the PR
    pub url: String,
    /// Head branch name
    pub head_branch: String,
    /// Base branch name
    pub base_branch: String,
    /// Whether the PR is a draft
    pub draft: bool,
    /// SHA of the head commit
    pub head_sha: String,
}

/// Aggregate CI state of one commit
///
/// GitHub reports CI through two systems, check runs (GitHub Actions) and
/// commit statuses (legacy external CI). The classification collapses both
/// into a single state plus a detail string naming the first check that
/// determined it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckStatus {
    /// Combined classification over both CI systems
    pub state: CheckState,
    /// Human-readable note, e.g. the first pending or failing check
    pub detail: String,
}

/// Classification of all checks for a commit
///
/// An enum rather than independent booleans: a commit with no checks at
/// all can never also read as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Every check run and commit status succeeded
    AllPassing,
    /// At least one check is still running
    Pending,
    /// No check runs and no commit statuses exist
    NoChecks,
    /// At least one check concluded unsuccessfully
    Failing,
}

/// Mergeability and freshness of a PR branch relative to its base
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchStatus {
    /// Commits the base has that the head does not; 0 means up to date
    pub behind_by: u64,
    /// Whether merging would produce conflicts
    pub has_conflict: bool,
}

impl BranchStatus {
    /// Whether the head branch contains every commit of its base
    #[must_use]
    pub const fn is_up_to_date(self) -> bool {
        self.behind_by == 0
    }
}

/// GitHub operations the sweep engine needs
///
/// Implemented by [`RestClient`] for the live API and by an in-memory
/// double in tests. Owner is passed explicitly on every call; the engine
/// always uses the organization it is sweeping.
#[async_trait]
pub trait GitHubClient: Send + Sync {
    /// List all repositories of an organization
    async fn list_repositories(&self, org: &str) -> Result<Vec<Repository>>;

    /// List open pull requests targeting the repository's default branch
    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        default_branch: &str,
    ) -> Result<Vec<PullRequest>>;

    /// Classify all check runs and commit statuses of a commit
    async fn get_check_status(
        &self,
        owner: &str,
        repo: &str,
        commit_ref: &str,
    ) -> Result<CheckStatus>;

    /// Determine conflict state and behind-count of a PR branch
    async fn get_branch_status(&self, owner: &str, repo: &str, pr_number: u64)
    -> Result<BranchStatus>;

    /// Request a branch update (merge the base into the head)
    async fn update_branch(&self, owner: &str, repo: &str, pr_number: u64) -> Result<()>;

    /// Post the `@dependabot rebase` trigger comment on a PR
    async fn post_rebase_comment(&self, owner: &str, repo: &str, pr_number: u64) -> Result<()>;

    /// Merge a PR with the default merge method
    async fn merge_pull_request(&self, owner: &str, repo: &str, pr_number: u64) -> Result<()>;
}

/// Branch prefix Dependabot uses for the PRs it owns
const DEPENDABOT_PREFIX: &str = "dependabot/";

/// Whether a head branch belongs to Dependabot
///
/// Dependabot-owned branches cannot be updated through the branch-update
/// API; they are rebased by posting a trigger comment instead.
#[must_use]
pub fn is_dependabot_branch(branch: &str) -> bool {
    branch.starts_with(DEPENDABOT_PREFIX)
}

/// Substring match used to select candidate head branches
#[must_use]
pub fn matches_branch_pattern(branch: &str, pattern: &str) -> bool {
    branch.contains(pattern)
}
