//! Mock GitHub client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pr_sweep::error::{Error, Result};
use pr_sweep::github::{
    BranchStatus, CheckState, CheckStatus, GitHubClient, PullRequest, Repository,
};

/// In-memory [`GitHubClient`] with scripted responses
///
/// Features:
/// - Configurable responses per repository, commit, and PR number
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockGitHubClient {
    repository_responses: Mutex<Vec<Repository>>,
    pull_request_responses: Mutex<HashMap<String, Vec<PullRequest>>>,
    check_status_responses: Mutex<HashMap<String, CheckStatus>>,
    branch_status_responses: Mutex<HashMap<u64, BranchStatus>>,
    // Call tracking
    list_repositories_calls: Mutex<Vec<String>>,
    list_pull_requests_calls: Mutex<Vec<String>>,
    check_status_calls: Mutex<Vec<String>>,
    branch_status_calls: Mutex<Vec<u64>>,
    update_branch_calls: Mutex<Vec<u64>>,
    rebase_comment_calls: Mutex<Vec<u64>>,
    merge_calls: Mutex<Vec<u64>>,
    // Error injection
    error_on_list_repositories: Mutex<Option<String>>,
    error_on_list_pull_requests: Mutex<HashMap<String, String>>,
    error_on_check_status: Mutex<HashMap<String, String>>,
    error_on_branch_status: Mutex<HashMap<u64, String>>,
    error_on_update_branch: Mutex<HashMap<u64, String>>,
    error_on_rebase_comment: Mutex<HashMap<u64, String>>,
    error_on_merge: Mutex<HashMap<u64, String>>,
}

impl MockGitHubClient {
    /// Create a new mock with no scripted responses
    pub fn new() -> Self {
        Self {
            repository_responses: Mutex::new(Vec::new()),
            pull_request_responses: Mutex::new(HashMap::new()),
            check_status_responses: Mutex::new(HashMap::new()),
            branch_status_responses: Mutex::new(HashMap::new()),
            list_repositories_calls: Mutex::new(Vec::new()),
            list_pull_requests_calls: Mutex::new(Vec::new()),
            check_status_calls: Mutex::new(Vec::new()),
            branch_status_calls: Mutex::new(Vec::new()),
            update_branch_calls: Mutex::new(Vec::new()),
            rebase_comment_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            error_on_list_repositories: Mutex::new(None),
            error_on_list_pull_requests: Mutex::new(HashMap::new()),
            error_on_check_status: Mutex::new(HashMap::new()),
            error_on_branch_status: Mutex::new(HashMap::new()),
            error_on_update_branch: Mutex::new(HashMap::new()),
            error_on_rebase_comment: Mutex::new(HashMap::new()),
            error_on_merge: Mutex::new(HashMap::new()),
        }
    }

    // === Response configuration methods ===

    /// Add a repository to the organization listing
    pub fn add_repository(&self, repo: Repository) {
        self.repository_responses.lock().unwrap().push(repo);
    }

    /// Set the open PRs returned for a repository
    pub fn set_pull_requests(&self, repo: &str, prs: Vec<PullRequest>) {
        self.pull_request_responses
            .lock()
            .unwrap()
            .insert(repo.to_string(), prs);
    }

    /// Set the check status returned for a commit SHA
    pub fn set_check_status(&self, sha: &str, status: CheckStatus) {
        self.check_status_responses
            .lock()
            .unwrap()
            .insert(sha.to_string(), status);
    }

    /// Set the branch status returned for a PR number
    pub fn set_branch_status(&self, pr_number: u64, status: BranchStatus) {
        self.branch_status_responses
            .lock()
            .unwrap()
            .insert(pr_number, status);
    }

    /// Seed a repository with one PR whose checks pass and whose branch
    /// is up to date
    pub fn setup_ready_pr(&self, repo: &Repository, pr: &PullRequest) {
        self.ensure_repository(repo);
        self.append_pull_request(&repo.name, pr.clone());
        self.set_check_status(
            &pr.head_sha,
            CheckStatus {
                state: CheckState::AllPassing,
                detail: "all checks passing".to_string(),
            },
        );
        self.set_branch_status(
            pr.number,
            BranchStatus {
                behind_by: 0,
                has_conflict: false,
            },
        );
    }

    /// Seed a repository with one PR whose checks pass but whose branch
    /// is behind its base
    pub fn setup_behind_pr(&self, repo: &Repository, pr: &PullRequest, behind_by: u64) {
        self.ensure_repository(repo);
        self.append_pull_request(&repo.name, pr.clone());
        self.set_check_status(
            &pr.head_sha,
            CheckStatus {
                state: CheckState::AllPassing,
                detail: "all checks passing".to_string(),
            },
        );
        self.set_branch_status(
            pr.number,
            BranchStatus {
                behind_by,
                has_conflict: false,
            },
        );
    }

    /// Seed a repository with one PR whose branch conflicts with its base
    pub fn setup_conflicted_pr(&self, repo: &Repository, pr: &PullRequest) {
        self.ensure_repository(repo);
        self.append_pull_request(&repo.name, pr.clone());
        self.set_check_status(
            &pr.head_sha,
            CheckStatus {
                state: CheckState::AllPassing,
                detail: "all checks passing".to_string(),
            },
        );
        self.set_branch_status(
            pr.number,
            BranchStatus {
                behind_by: 0,
                has_conflict: true,
            },
        );
    }

    fn ensure_repository(&self, repo: &Repository) {
        let mut repos = self.repository_responses.lock().unwrap();
        if !repos.iter().any(|r| r.full_name == repo.full_name) {
            repos.push(repo.clone());
        }
    }

    fn append_pull_request(&self, repo: &str, pr: PullRequest) {
        self.pull_request_responses
            .lock()
            .unwrap()
            .entry(repo.to_string())
            .or_default()
            .push(pr);
    }

    // === Error injection methods ===

    /// Make `list_repositories` return an error
    pub fn fail_list_repositories(&self, msg: &str) {
        *self.error_on_list_repositories.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_pull_requests` fail for one repository
    pub fn fail_list_pull_requests(&self, repo: &str, msg: &str) {
        self.error_on_list_pull_requests
            .lock()
            .unwrap()
            .insert(repo.to_string(), msg.to_string());
    }

    /// Make `get_check_status` fail for one commit SHA
    pub fn fail_check_status(&self, sha: &str, msg: &str) {
        self.error_on_check_status
            .lock()
            .unwrap()
            .insert(sha.to_string(), msg.to_string());
    }

    /// Make `get_branch_status` fail for one PR
    pub fn fail_branch_status(&self, pr_number: u64, msg: &str) {
        self.error_on_branch_status
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `update_branch` fail for one PR
    pub fn fail_update_branch(&self, pr_number: u64, msg: &str) {
        self.error_on_update_branch
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `post_rebase_comment` fail for one PR
    pub fn fail_rebase_comment(&self, pr_number: u64, msg: &str) {
        self.error_on_rebase_comment
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    /// Make `merge_pull_request` fail for one PR
    pub fn fail_merge(&self, pr_number: u64, msg: &str) {
        self.error_on_merge
            .lock()
            .unwrap()
            .insert(pr_number, msg.to_string());
    }

    // === Call verification methods ===

    /// Repositories passed to `list_pull_requests`, in call order
    pub fn get_list_pull_requests_calls(&self) -> Vec<String> {
        self.list_pull_requests_calls.lock().unwrap().clone()
    }

    /// Commit SHAs passed to `get_check_status`, in call order
    pub fn get_check_status_calls(&self) -> Vec<String> {
        self.check_status_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `get_branch_status`, in call order
    pub fn get_branch_status_calls(&self) -> Vec<u64> {
        self.branch_status_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `update_branch`, in call order
    pub fn get_update_branch_calls(&self) -> Vec<u64> {
        self.update_branch_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `post_rebase_comment`, in call order
    pub fn get_rebase_comment_calls(&self) -> Vec<u64> {
        self.rebase_comment_calls.lock().unwrap().clone()
    }

    /// PR numbers passed to `merge_pull_request`, in call order
    pub fn get_merge_calls(&self) -> Vec<u64> {
        self.merge_calls.lock().unwrap().clone()
    }

    /// Status fetches performed, check and branch calls combined
    pub fn evaluation_call_count(&self) -> usize {
        self.check_status_calls.lock().unwrap().len()
            + self.branch_status_calls.lock().unwrap().len()
    }

    /// Mutating calls performed, merges, branch updates, and comments
    pub fn mutation_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
            + self.update_branch_calls.lock().unwrap().len()
            + self.rebase_comment_calls.lock().unwrap().len()
    }

    /// Assert `merge_pull_request` was called for a PR
    pub fn assert_merge_called(&self, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            calls.contains(&pr_number),
            "Expected merge_pull_request({pr_number}) to be called, but calls were: {calls:?}"
        );
    }

    /// Assert `merge_pull_request` was not called for a PR
    pub fn assert_merge_not_called(&self, pr_number: u64) {
        let calls = self.get_merge_calls();
        assert!(
            !calls.contains(&pr_number),
            "Expected merge_pull_request({pr_number}) not to be called, but calls were: {calls:?}"
        );
    }

    /// Assert `update_branch` was called for a PR
    pub fn assert_update_branch_called(&self, pr_number: u64) {
        let calls = self.get_update_branch_calls();
        assert!(
            calls.contains(&pr_number),
            "Expected update_branch({pr_number}) to be called, but calls were: {calls:?}"
        );
    }

    /// Assert `post_rebase_comment` was called for a PR
    pub fn assert_rebase_comment_called(&self, pr_number: u64) {
        let calls = self.get_rebase_comment_calls();
        assert!(
            calls.contains(&pr_number),
            "Expected post_rebase_comment({pr_number}) to be called, but calls were: {calls:?}"
        );
    }
}

impl Default for MockGitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GitHubClient for MockGitHubClient {
    async fn list_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        self.list_repositories_calls
            .lock()
            .unwrap()
            .push(org.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_list_repositories.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(self.repository_responses.lock().unwrap().clone())
    }

    async fn list_pull_requests(
        &self,
        _owner: &str,
        repo: &str,
        _default_branch: &str,
    ) -> Result<Vec<PullRequest>> {
        self.list_pull_requests_calls
            .lock()
            .unwrap()
            .push(repo.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_list_pull_requests.lock().unwrap().get(repo) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let responses = self.pull_request_responses.lock().unwrap();
        Ok(responses.get(repo).cloned().unwrap_or_default())
    }

    async fn get_check_status(
        &self,
        _owner: &str,
        _repo: &str,
        commit_ref: &str,
    ) -> Result<CheckStatus> {
        self.check_status_calls
            .lock()
            .unwrap()
            .push(commit_ref.to_string());

        // Check for injected error
        if let Some(msg) = self.error_on_check_status.lock().unwrap().get(commit_ref) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let responses = self.check_status_responses.lock().unwrap();
        responses.get(commit_ref).cloned().ok_or_else(|| {
            Error::GitHubApi(format!(
                "get_check_status: no response configured for {commit_ref}"
            ))
        })
    }

    async fn get_branch_status(
        &self,
        _owner: &str,
        _repo: &str,
        pr_number: u64,
    ) -> Result<BranchStatus> {
        self.branch_status_calls.lock().unwrap().push(pr_number);

        // Check for injected error
        if let Some(msg) = self.error_on_branch_status.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let responses = self.branch_status_responses.lock().unwrap();
        responses.get(&pr_number).copied().ok_or_else(|| {
            Error::GitHubApi(format!(
                "get_branch_status: no response configured for PR #{pr_number}"
            ))
        })
    }

    async fn update_branch(&self, _owner: &str, _repo: &str, pr_number: u64) -> Result<()> {
        self.update_branch_calls.lock().unwrap().push(pr_number);

        // Check for injected error
        if let Some(msg) = self.error_on_update_branch.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(())
    }

    async fn post_rebase_comment(&self, _owner: &str, _repo: &str, pr_number: u64) -> Result<()> {
        self.rebase_comment_calls.lock().unwrap().push(pr_number);

        // Check for injected error
        if let Some(msg) = self.error_on_rebase_comment.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(())
    }

    async fn merge_pull_request(&self, _owner: &str, _repo: &str, pr_number: u64) -> Result<()> {
        self.merge_calls.lock().unwrap().push(pr_number);

        // Check for injected error
        if let Some(msg) = self.error_on_merge.lock().unwrap().get(&pr_number) {
            return Err(Error::GitHubApi(msg.clone()));
        }

        Ok(())
    }
}
