//! Run report tree
//!
//! Everything a sweep produces lands here: one action per evaluated pull
//! request, one entry per repository, and an aggregated summary. The same
//! tree feeds the human renderer and the JSON output, so actions and skip
//! categories serialize as their display strings.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::github::{PullRequest, Repository};

/// Category attached to a skipped pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A status retrieval call failed
    ApiError,
    /// At least one check is still running
    ChecksPending,
    /// At least one check concluded unsuccessfully
    ChecksFailing,
    /// Merging would produce conflicts
    Conflict,
    /// The branch is behind its base and rebasing is not enabled
    BranchBehind,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ApiError => "API error",
            Self::ChecksPending => "checks pending",
            Self::ChecksFailing => "checks failing",
            Self::Conflict => "merge conflict",
            Self::BranchBehind => "branch behind default",
        };
        write!(f, "{s}")
    }
}

impl Serialize for SkipReason {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The single outcome assigned to an evaluated pull request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrAction {
    /// Merge is planned but has not happened yet
    WouldMerge,
    /// A branch update is planned but has not happened yet
    WouldRebase,
    /// Everything passed but merging is not enabled
    ReadyToMerge,
    /// The PR was merged
    Merged,
    /// The merge call failed
    MergeFailed,
    /// The branch update was triggered
    Rebased,
    /// The branch update call failed
    RebaseFailed,
    /// The PR was skipped for the given reason
    Skip(SkipReason),
}

impl PrAction {
    /// Whether this action still awaits execution
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::WouldMerge | Self::WouldRebase)
    }

    /// The skip category, for skip outcomes
    #[must_use]
    pub const fn skip_reason(self) -> Option<SkipReason> {
        match self {
            Self::Skip(reason) => Some(reason),
            _ => None,
        }
    }
}

impl fmt::Display for PrAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WouldMerge => write!(f, "would merge"),
            Self::WouldRebase => write!(f, "would rebase"),
            Self::ReadyToMerge => write!(f, "ready to merge"),
            Self::Merged => write!(f, "merged"),
            Self::MergeFailed => write!(f, "merge failed"),
            Self::Rebased => write!(f, "rebased"),
            Self::RebaseFailed => write!(f, "rebase failed"),
            Self::Skip(reason) => write!(f, "skip: {reason}"),
        }
    }
}

impl Serialize for PrAction {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Why a whole repository was skipped without evaluating any PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSkip {
    /// The repository ceiling was already reached
    LimitReached,
    /// Listing the repository's pull requests failed
    ListingFailed(String),
}

impl fmt::Display for RepoSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LimitReached => write!(f, "repo limit reached"),
            Self::ListingFailed(e) => write!(f, "API error: {e}"),
        }
    }
}

impl Serialize for RepoSkip {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Outcome entry for one evaluated pull request
#[derive(Debug, Clone, Serialize)]
pub struct PrReport {
    /// PR number within its repository
    pub number: u64,
    /// Web URL of the PR
    pub url: String,
    /// Head branch name
    pub head_branch: String,
    /// PR title
    pub title: String,
    /// The action taken or planned
    pub action: PrAction,
    /// Human-readable explanation of the action
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reason: String,
    /// Skip category, present only for skip outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

impl PrReport {
    /// Build an entry for a PR from its evaluated action
    #[must_use]
    pub fn new(pr: &PullRequest, action: PrAction, reason: impl Into<String>) -> Self {
        Self {
            number: pr.number,
            url: pr.url.clone(),
            head_branch: pr.head_branch.clone(),
            title: pr.title.clone(),
            action,
            reason: reason.into(),
            skip_reason: action.skip_reason(),
        }
    }

    /// Replace the action, keeping the skip category consistent
    pub fn set_action(&mut self, action: PrAction, reason: impl Into<String>) {
        self.action = action;
        self.reason = reason.into();
        self.skip_reason = action.skip_reason();
    }
}

/// Results for one repository
#[derive(Debug, Clone, Serialize)]
pub struct RepoReport {
    /// Short repository name
    pub name: String,
    /// `owner/name`
    pub full_name: String,
    /// Default branch name
    pub default_branch: String,
    /// One entry per evaluated pull request, in discovery order
    pub pull_requests: Vec<PrReport>,
    /// Present when the repository was skipped before any evaluation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<RepoSkip>,
}

impl RepoReport {
    /// Entry for a repository that was processed
    #[must_use]
    pub fn processed(repo: &Repository, pull_requests: Vec<PrReport>) -> Self {
        Self {
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            default_branch: repo.default_branch.clone(),
            pull_requests,
            skip_reason: None,
        }
    }

    /// Entry for a repository that was skipped without evaluation
    #[must_use]
    pub fn skipped(repo: &Repository, why: RepoSkip) -> Self {
        Self {
            name: repo.name.clone(),
            full_name: repo.full_name.clone(),
            default_branch: repo.default_branch.clone(),
            pull_requests: Vec::new(),
            skip_reason: Some(why),
        }
    }

    /// Whether this repository was skipped without evaluation
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip_reason.is_some()
    }
}

/// Flag values and timing of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Organization that was swept
    pub org: String,
    /// Head branch substring pattern
    pub source_branch: String,
    /// Human description of the operating mode
    pub mode: String,
    /// Whether rebasing was enabled
    pub rebase: bool,
    /// Whether merging was enabled
    pub merge: bool,
    /// Whether merging behind branches without rebase was enabled
    pub skip_rebase: bool,
    /// Repository ceiling, when one was set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_limit: Option<usize>,
    /// When the run started
    pub start_time: DateTime<Utc>,
    /// When the run (or its execute pass) finished
    pub end_time: DateTime<Utc>,
}

/// Aggregated counters over every outcome of a run
///
/// Every evaluated PR increments exactly one action bucket; skips also
/// increment the per-reason histogram. The histogram is a `BTreeMap` so
/// its keys always serialize in lexicographic order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Repositories whose PRs were listed and evaluated
    pub repos_processed: u64,
    /// Repositories skipped before any evaluation
    pub repos_skipped: u64,
    /// PRs that survived the candidate filter
    pub candidates_found: u64,
    /// PRs merged
    pub merged_success: u64,
    /// PRs whose merge call failed
    pub merge_failed: u64,
    /// PRs whose branch update was triggered
    pub rebased_success: u64,
    /// PRs whose branch update call failed
    pub rebase_failed: u64,
    /// PRs planned for merge but not yet executed
    pub would_merge: u64,
    /// PRs planned for a branch update but not yet executed
    pub would_rebase: u64,
    /// PRs ready to merge while merging was disabled
    pub ready_to_merge: u64,
    /// PRs skipped
    pub skipped: u64,
    /// Skip counts keyed by reason string
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub skipped_by_reason: BTreeMap<String, u64>,
}

impl RunSummary {
    /// Count one outcome into exactly one action bucket
    pub fn record(&mut self, action: PrAction) {
        match action {
            PrAction::WouldMerge => self.would_merge += 1,
            PrAction::WouldRebase => self.would_rebase += 1,
            PrAction::ReadyToMerge => self.ready_to_merge += 1,
            PrAction::Merged => self.merged_success += 1,
            PrAction::MergeFailed => self.merge_failed += 1,
            PrAction::Rebased => self.rebased_success += 1,
            PrAction::RebaseFailed => self.rebase_failed += 1,
            PrAction::Skip(reason) => {
                self.skipped += 1;
                *self
                    .skipped_by_reason
                    .entry(reason.to_string())
                    .or_insert(0) += 1;
            }
        }
    }

    /// Rebuild every action bucket from the final per-PR actions
    ///
    /// Used after an execute pass so pending counts drain into terminal
    /// ones and nothing is counted twice. Repository and candidate counts
    /// are facts of the scan and stay untouched.
    pub fn recount_actions(&mut self, repositories: &[RepoReport]) {
        self.would_merge = 0;
        self.would_rebase = 0;
        self.ready_to_merge = 0;
        self.merged_success = 0;
        self.merge_failed = 0;
        self.rebased_success = 0;
        self.rebase_failed = 0;
        self.skipped = 0;
        self.skipped_by_reason.clear();
        for repo in repositories {
            for pr in &repo.pull_requests {
                self.record(pr.action);
            }
        }
    }
}

/// The full output of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Flag values and timing
    pub metadata: RunMetadata,
    /// One entry per discovered repository, in listing order
    pub repositories: Vec<RepoReport>,
    /// Aggregated counters
    pub summary: RunSummary,
}

impl RunReport {
    /// Number of entries still awaiting execution
    #[must_use]
    pub fn pending_actions(&self) -> usize {
        self.repositories
            .iter()
            .flat_map(|r| &r.pull_requests)
            .filter(|pr| pr.action.is_pending())
            .count()
    }
}
