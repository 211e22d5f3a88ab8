//! GitHub REST client implementation
//!
//! Uses octocrab for the endpoints it models well and raw reqwest for the
//! rest (check runs, combined status, branch comparison, branch update).

use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::github::{BranchStatus, CheckState, CheckStatus, GitHubClient, PullRequest, Repository};

/// Host for raw REST requests
const API_HOST: &str = "api.github.com";

/// How many extra PR fetches to attempt while mergeability is unknown
const MERGEABLE_POLL_ATTEMPTS: u32 = 5;

/// Delay between mergeability polls
const MERGEABLE_POLL_DELAY: std::time::Duration = std::time::Duration::from_secs(1);

/// Comment body that triggers a Dependabot rebase
const DEPENDABOT_REBASE_COMMAND: &str = "@dependabot rebase";

// Wire types for the two CI status APIs

#[derive(Deserialize)]
struct CheckRunsResponse {
    check_runs: Vec<CheckRun>,
}

#[derive(Deserialize)]
struct CheckRun {
    name: String,
    status: String,
    conclusion: Option<String>,
}

#[derive(Deserialize)]
struct CombinedStatusResponse {
    statuses: Vec<CommitStatus>,
}

#[derive(Deserialize)]
struct CommitStatus {
    context: String,
    state: String,
}

/// Collapse both CI systems into a single classification
///
/// GitHub has two CI systems:
/// 1. Check Runs API (modern) - used by GitHub Actions
/// 2. Commit Status API (legacy) - used by external CI services
///
/// Emptiness is tested before anything else: a commit with no checks at
/// all must classify as `NoChecks`, never as pending. After that the first
/// check run or commit status that is not a clean success decides.
fn classify_checks(check_runs: &[CheckRun], statuses: &[CommitStatus]) -> CheckStatus {
    if check_runs.is_empty() && statuses.is_empty() {
        return CheckStatus {
            state: CheckState::NoChecks,
            detail: "no checks found".to_string(),
        };
    }

    for run in check_runs {
        if run.status != "completed" {
            return CheckStatus {
                state: CheckState::Pending,
                detail: format!("check '{}' is {}", run.name, run.status),
            };
        }
        if run.conclusion.as_deref() != Some("success") {
            return CheckStatus {
                state: CheckState::Failing,
                detail: format!(
                    "check '{}' has conclusion '{}'",
                    run.name,
                    run.conclusion.as_deref().unwrap_or("")
                ),
            };
        }
    }

    for status in statuses {
        if status.state == "pending" {
            return CheckStatus {
                state: CheckState::Pending,
                detail: format!("status '{}' is pending", status.context),
            };
        }
        if status.state != "success" {
            return CheckStatus {
                state: CheckState::Failing,
                detail: format!("status '{}' has state '{}'", status.context, status.state),
            };
        }
    }

    CheckStatus {
        state: CheckState::AllPassing,
        detail: "all checks passing".to_string(),
    }
}

/// Helper to convert an octocrab PR to our `PullRequest` snapshot
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        head_branch: pr.head.ref_field.clone(),
        base_branch: pr.base.ref_field.clone(),
        draft: pr.draft.unwrap_or(false),
        head_sha: pr.head.sha.clone(),
    }
}

/// GitHub REST client using octocrab
pub struct RestClient {
    client: Octocrab,
    /// Token for raw HTTP requests
    token: String,
    /// HTTP client for raw requests
    http: Client,
}

impl RestClient {
    /// Create a client from a personal access token
    pub fn new(token: &str) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http = Client::builder()
            .user_agent("prsweep")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http,
        })
    }

    /// Raw API request with the standard GitHub headers
    fn api_request(&self, method: Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
    }

    /// Count how far a head branch is behind its base via the compare API
    async fn compare_behind(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head_owner: &str,
        head: &str,
    ) -> Result<u64> {
        #[derive(Deserialize)]
        struct Comparison {
            behind_by: u64,
        }

        let url = format!(
            "https://{API_HOST}/repos/{owner}/{repo}/compare/{base}...{head_owner}:{head}"
        );

        let response = self
            .api_request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch comparison: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "comparison request returned {}",
                response.status()
            )));
        }

        let comparison: Comparison = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse comparison: {e}")))?;

        Ok(comparison.behind_by)
    }
}

#[async_trait]
impl GitHubClient for RestClient {
    async fn list_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        debug!(org, "listing repositories");

        let page = self
            .client
            .orgs(org)
            .list_repos()
            .per_page(100)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
        let repos = self
            .client
            .all_pages(page)
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        debug!(count = repos.len(), "listed repositories");
        Ok(repos
            .into_iter()
            .map(|r| Repository {
                full_name: r
                    .full_name
                    .unwrap_or_else(|| format!("{org}/{}", r.name)),
                default_branch: r.default_branch.unwrap_or_else(|| "main".to_string()),
                archived: r.archived.unwrap_or(false),
                name: r.name,
            })
            .collect())
    }

    async fn list_pull_requests(
        &self,
        owner: &str,
        repo: &str,
        default_branch: &str,
    ) -> Result<Vec<PullRequest>> {
        debug!(owner, repo, default_branch, "listing open pull requests");

        let page = self
            .client
            .pulls(owner, repo)
            .list()
            .state(octocrab::params::State::Open)
            .base(default_branch)
            .per_page(100)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;
        let prs = self
            .client
            .all_pages(page)
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        debug!(count = prs.len(), "listed open pull requests");
        Ok(prs.iter().map(pr_from_octocrab).collect())
    }

    async fn get_check_status(
        &self,
        owner: &str,
        repo: &str,
        commit_ref: &str,
    ) -> Result<CheckStatus> {
        debug!(owner, repo, commit_ref, "fetching check status");

        let url = format!("https://{API_HOST}/repos/{owner}/{repo}/commits/{commit_ref}/check-runs");
        let response = self
            .api_request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch check runs: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "check runs request returned {}",
                response.status()
            )));
        }
        let check_runs: CheckRunsResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse check runs: {e}")))?;

        let url = format!("https://{API_HOST}/repos/{owner}/{repo}/commits/{commit_ref}/status");
        let response = self
            .api_request(Method::GET, &url)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch commit status: {e}")))?;
        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "commit status request returned {}",
                response.status()
            )));
        }
        let combined: CombinedStatusResponse = response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse commit status: {e}")))?;

        let status = classify_checks(&check_runs.check_runs, &combined.statuses);
        debug!(state = ?status.state, detail = %status.detail, "check status");
        Ok(status)
    }

    async fn get_branch_status(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
    ) -> Result<BranchStatus> {
        debug!(owner, repo, pr_number, "fetching branch status");

        let mut pr = self
            .client
            .pulls(owner, repo)
            .get(pr_number)
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        // GitHub computes mergeability lazily; the first fetch after a push
        // usually reports null.
        let mut attempts = 0;
        while pr.mergeable.is_none() && attempts < MERGEABLE_POLL_ATTEMPTS {
            tokio::time::sleep(MERGEABLE_POLL_DELAY).await;
            pr = self
                .client
                .pulls(owner, repo)
                .get(pr_number)
                .await
                .map_err(|e| Error::GitHubApi(e.to_string()))?;
            attempts += 1;
        }
        let Some(mergeable) = pr.mergeable else {
            return Err(Error::GitHubApi(format!(
                "could not determine mergeability of PR #{pr_number}"
            )));
        };

        // Cross-fork PRs need the head owner qualifier in the comparison.
        let head_owner = pr
            .head
            .repo
            .as_ref()
            .and_then(|r| r.owner.as_ref())
            .map_or(owner, |o| o.login.as_str());
        let behind_by = self
            .compare_behind(owner, repo, &pr.base.ref_field, head_owner, &pr.head.ref_field)
            .await?;

        debug!(pr_number, behind_by, mergeable, "branch status");
        Ok(BranchStatus {
            behind_by,
            has_conflict: !mergeable,
        })
    }

    async fn update_branch(&self, owner: &str, repo: &str, pr_number: u64) -> Result<()> {
        debug!(owner, repo, pr_number, "requesting branch update");

        let url = format!("https://{API_HOST}/repos/{owner}/{repo}/pulls/{pr_number}/update-branch");
        let response = self
            .api_request(Method::PUT, &url)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to request branch update: {e}")))?;

        let status = response.status();
        // 202 Accepted: GitHub schedules the update as a background job.
        if status.is_success() {
            debug!(pr_number, "branch update accepted");
            return Ok(());
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(Error::GitHubApi(
                "branch update not supported or failed".to_string(),
            ));
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::GitHubApi(format!(
            "branch update returned {status}: {body}"
        )))
    }

    async fn post_rebase_comment(&self, owner: &str, repo: &str, pr_number: u64) -> Result<()> {
        debug!(owner, repo, pr_number, "posting rebase comment");

        self.client
            .issues(owner, repo)
            .create_comment(pr_number, DEPENDABOT_REBASE_COMMAND)
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        debug!(pr_number, "posted rebase comment");
        Ok(())
    }

    async fn merge_pull_request(&self, owner: &str, repo: &str, pr_number: u64) -> Result<()> {
        debug!(owner, repo, pr_number, "merging PR");

        let result = self
            .client
            .pulls(owner, repo)
            .merge(pr_number)
            .method(octocrab::params::pulls::MergeMethod::Merge)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        if !result.merged {
            return Err(Error::GitHubApi(result.message.unwrap_or_else(|| {
                "merge was not performed".to_string()
            })));
        }

        debug!(pr_number, "merge complete");
        Ok(())
    }
}
