//! Run orchestration
//!
//! The [`Sweeper`] walks repositories strictly in listing order, one at a
//! time, and aggregates every outcome into the report tree. A run is
//! either single-phase (evaluate and execute each PR inline) or the scan
//! half of the confirm flow, whose frozen plan [`Sweeper::execute_planned`]
//! later replays without re-evaluating anything.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::report::{PrReport, RepoReport, RepoSkip, RunMetadata, RunReport, RunSummary};
use crate::sweep::evaluate::evaluate_pull_request;
use crate::sweep::execute::execute_pending;
use crate::sweep::filter::{filter_candidates, filter_repositories};

/// Progress notifications emitted while a sweep runs
#[async_trait]
pub trait RunObserver: Send + Sync {
    /// A repository finished, processed or skipped; `index` is 1-based
    async fn on_repository(&self, index: usize, total: usize, repo: &RepoReport);

    /// One pull request reached a terminal outcome during an execute pass
    async fn on_action(&self, repo_full_name: &str, pr: &PrReport);
}

/// Observer that ignores every notification
pub struct NullObserver;

#[async_trait]
impl RunObserver for NullObserver {
    async fn on_repository(&self, _index: usize, _total: usize, _repo: &RepoReport) {}

    async fn on_action(&self, _repo_full_name: &str, _pr: &PrReport) {}
}

/// Sequential orchestrator over one organization
pub struct Sweeper<'a> {
    client: &'a dyn GitHubClient,
    config: &'a Config,
}

impl<'a> Sweeper<'a> {
    /// Bind a client and a validated configuration
    #[must_use]
    pub const fn new(client: &'a dyn GitHubClient, config: &'a Config) -> Self {
        Self { client, config }
    }

    /// Walk the organization once
    ///
    /// In confirm mode this is the scan phase and actionable PRs stay
    /// pending; otherwise pending outcomes are executed inline before the
    /// next PR is evaluated. Listing failures skip the affected repository
    /// and the run continues; only the initial repository listing is
    /// fatal.
    pub async fn run(&self, observer: &dyn RunObserver) -> Result<RunReport> {
        let start_time = Utc::now();

        let repos = self.client.list_repositories(&self.config.org).await?;
        let repos = filter_repositories(repos, &self.config.repos);
        let total = repos.len();
        debug!(total, org = %self.config.org, "repositories after filtering");

        let mut summary = RunSummary::default();
        let mut repositories = Vec::with_capacity(total);
        let mut processed = 0usize;

        for (index, repo) in repos.into_iter().enumerate() {
            // Beyond the ceiling nothing is fetched; the repository is
            // recorded as skipped with zero API calls.
            if let Some(limit) = self.config.limit()
                && processed >= limit
            {
                summary.repos_skipped += 1;
                let report = RepoReport::skipped(&repo, RepoSkip::LimitReached);
                observer.on_repository(index + 1, total, &report).await;
                repositories.push(report);
                continue;
            }

            let prs = match self
                .client
                .list_pull_requests(&self.config.org, &repo.name, &repo.default_branch)
                .await
            {
                Ok(prs) => prs,
                Err(e) => {
                    // A listing failure does not consume limit budget.
                    summary.repos_skipped += 1;
                    let report = RepoReport::skipped(&repo, RepoSkip::ListingFailed(e.to_string()));
                    observer.on_repository(index + 1, total, &report).await;
                    repositories.push(report);
                    continue;
                }
            };
            processed += 1;
            summary.repos_processed += 1;

            let candidates =
                filter_candidates(prs, &repo.default_branch, &self.config.source_branch);
            let mut entries = Vec::with_capacity(candidates.len());
            for pr in &candidates {
                summary.candidates_found += 1;
                let mut entry =
                    evaluate_pull_request(self.client, &self.config.org, &repo.name, pr, self.config)
                        .await;
                if !self.config.confirm {
                    execute_pending(self.client, &self.config.org, &repo.name, &mut entry).await;
                }
                summary.record(entry.action);
                entries.push(entry);
            }

            let report = RepoReport::processed(&repo, entries);
            observer.on_repository(index + 1, total, &report).await;
            repositories.push(report);
        }

        Ok(RunReport {
            metadata: self.metadata(start_time, Utc::now()),
            repositories,
            summary,
        })
    }

    /// Replay a scan report, performing exactly the actions it planned
    ///
    /// Entries whose action is not would-merge or would-rebase are left
    /// untouched and nothing is re-evaluated; a PR whose live state
    /// changed since the scan is still acted on according to the frozen
    /// plan. Afterwards the summary's action buckets are rebuilt from the
    /// final entries and the end timestamp refreshed.
    pub async fn execute_planned(&self, report: &mut RunReport, observer: &dyn RunObserver) {
        for repo in &mut report.repositories {
            if repo.is_skipped() {
                continue;
            }
            for entry in &mut repo.pull_requests {
                if !entry.action.is_pending() {
                    continue;
                }
                execute_pending(self.client, &self.config.org, &repo.name, entry).await;
                observer.on_action(&repo.full_name, entry).await;
            }
        }
        report.summary.recount_actions(&report.repositories);
        report.metadata.end_time = Utc::now();
    }

    fn metadata(&self, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> RunMetadata {
        RunMetadata {
            org: self.config.org.clone(),
            source_branch: self.config.source_branch.clone(),
            mode: self.config.mode_description().to_string(),
            rebase: self.config.rebase,
            merge: self.config.merge,
            skip_rebase: self.config.skip_rebase,
            repo_limit: self.config.limit(),
            start_time,
            end_time,
        }
    }
}
