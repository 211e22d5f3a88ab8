//! Conversion of pending outcomes into terminal ones

use crate::github::{GitHubClient, is_dependabot_branch};
use crate::report::{PrAction, PrReport};

/// Perform the mutation a pending outcome calls for, rewriting the entry
/// in place
///
/// Entries that are not would-merge or would-rebase are left untouched. A
/// failed call becomes the matching failure outcome carrying the error
/// text; it never aborts the run. The rebase strategy is re-derived from
/// the head branch name: Dependabot owns its branches, so they are rebased
/// through the trigger comment rather than the branch-update API.
pub async fn execute_pending(
    client: &dyn GitHubClient,
    owner: &str,
    repo: &str,
    entry: &mut PrReport,
) {
    match entry.action {
        PrAction::WouldRebase => {
            if is_dependabot_branch(&entry.head_branch) {
                match client.post_rebase_comment(owner, repo, entry.number).await {
                    Ok(()) => entry.set_action(PrAction::Rebased, "posted @dependabot rebase comment"),
                    Err(e) => entry.set_action(
                        PrAction::RebaseFailed,
                        format!("failed to post rebase comment: {e}"),
                    ),
                }
            } else {
                match client.update_branch(owner, repo, entry.number).await {
                    Ok(()) => entry.set_action(PrAction::Rebased, "branch update requested via API"),
                    Err(e) => entry.set_action(
                        PrAction::RebaseFailed,
                        format!("failed to update branch: {e}"),
                    ),
                }
            }
        }
        PrAction::WouldMerge => match client.merge_pull_request(owner, repo, entry.number).await {
            Ok(()) => entry.set_action(PrAction::Merged, "successfully merged"),
            Err(e) => entry.set_action(PrAction::MergeFailed, format!("merge failed: {e}")),
        },
        _ => {}
    }
}
