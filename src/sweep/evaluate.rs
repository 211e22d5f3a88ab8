//! Readiness evaluation for a single pull request
//!
//! [`decide`] is the pure core: four signals in, exactly one outcome out.
//! [`evaluate_pull_request`] is the effectful shell that fetches the
//! status inputs in gate order and turns retrieval failures into
//! API-error skips.

use crate::config::Config;
use crate::github::{
    BranchStatus, CheckState, CheckStatus, GitHubClient, PullRequest, is_dependabot_branch,
};
use crate::report::{PrAction, PrReport, SkipReason};

/// The skip the check gate forces, if any
///
/// Rebase-only runs pass pending and failing checks through.
fn check_gate(checks: &CheckStatus, config: &Config) -> Option<(PrAction, String)> {
    let rebase_only = config.rebase && !config.merge;
    if rebase_only {
        return None;
    }
    match checks.state {
        CheckState::Pending => Some((
            PrAction::Skip(SkipReason::ChecksPending),
            checks.detail.clone(),
        )),
        CheckState::Failing => Some((
            PrAction::Skip(SkipReason::ChecksFailing),
            checks.detail.clone(),
        )),
        CheckState::AllPassing | CheckState::NoChecks => None,
    }
}

/// Combine check, branch, and mode signals into a single outcome
///
/// First matching rule wins and the ordering is load-bearing: check gate,
/// then conflict, then freshness, then merge eligibility. A rebase-only
/// run tolerates pending and failing checks, since updating a branch does
/// not need green CI. A merge conflict is the one condition no flag can
/// bypass.
#[must_use]
pub fn decide(
    pr: &PullRequest,
    checks: &CheckStatus,
    branch: &BranchStatus,
    config: &Config,
) -> (PrAction, String) {
    if let Some(skip) = check_gate(checks, config) {
        return skip;
    }

    if branch.has_conflict {
        return (
            PrAction::Skip(SkipReason::Conflict),
            "pull request has merge conflicts".to_string(),
        );
    }

    // A missing check suite is a neutral pass; the reason records it.
    let checks_note = match checks.state {
        CheckState::NoChecks => "no checks configured",
        CheckState::AllPassing => "all checks passing",
        CheckState::Pending | CheckState::Failing => checks.detail.as_str(),
    };

    if !branch.is_up_to_date() {
        let behind = branch.behind_by;
        if config.skip_rebase && config.merge {
            return (
                PrAction::WouldMerge,
                format!("{checks_note}, {behind} commits behind (rebase explicitly skipped)"),
            );
        }
        if !config.rebase {
            return (
                PrAction::Skip(SkipReason::BranchBehind),
                format!("branch is {behind} commits behind base (use --rebase to update)"),
            );
        }
        let reason = if is_dependabot_branch(&pr.head_branch) {
            format!("would post @dependabot rebase comment ({behind} commits behind)")
        } else {
            format!("would update branch via API ({behind} commits behind)")
        };
        return (PrAction::WouldRebase, reason);
    }

    if config.merge {
        (
            PrAction::WouldMerge,
            format!("{checks_note}, branch up to date"),
        )
    } else {
        (
            PrAction::ReadyToMerge,
            format!("{checks_note}, branch up to date (use --merge to merge)"),
        )
    }
}

/// Fetch the status inputs for a candidate and decide its outcome
///
/// Retrieval failures become API-error skips so one broken PR never
/// aborts the run. The check gate resolves before the branch-status
/// fetch; a check-blocked PR makes no branch-status call.
pub async fn evaluate_pull_request(
    client: &dyn GitHubClient,
    owner: &str,
    repo: &str,
    pr: &PullRequest,
    config: &Config,
) -> PrReport {
    let checks = match client.get_check_status(owner, repo, &pr.head_sha).await {
        Ok(checks) => checks,
        Err(e) => {
            return PrReport::new(
                pr,
                PrAction::Skip(SkipReason::ApiError),
                format!("failed to get check status: {e}"),
            );
        }
    };

    if let Some((action, reason)) = check_gate(&checks, config) {
        return PrReport::new(pr, action, reason);
    }

    let branch = match client.get_branch_status(owner, repo, pr.number).await {
        Ok(branch) => branch,
        Err(e) => {
            return PrReport::new(
                pr,
                PrAction::Skip(SkipReason::ApiError),
                format!("failed to get branch status: {e}"),
            );
        }
    };

    let (action, reason) = decide(pr, &checks, &branch, config);
    PrReport::new(pr, action, reason)
}
