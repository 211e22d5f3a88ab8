//! Streaming progress and final report rendering
//!
//! Progress goes to stderr so the final report on stdout pipes cleanly,
//! in both human and JSON form.

use std::io::Write as _;

use anstream::eprintln;
use async_trait::async_trait;
use indicatif::ProgressBar;
use terminal_link::Link;

use pr_sweep::error::Result;
use pr_sweep::report::{PrAction, PrReport, RepoReport, RunReport, RunSummary};
use pr_sweep::sweep::RunObserver;

use crate::cli::style::{Stylize, bar_style};

/// One-column symbol for an outcome line
const fn action_symbol(action: PrAction) -> &'static str {
    match action {
        PrAction::Merged | PrAction::WouldMerge | PrAction::ReadyToMerge => "✓",
        PrAction::Rebased | PrAction::WouldRebase => "↻",
        PrAction::MergeFailed | PrAction::RebaseFailed => "✗",
        PrAction::Skip(_) => "⊘",
    }
}

fn styled_symbol(action: PrAction) -> String {
    let symbol = action_symbol(action);
    match action {
        PrAction::MergeFailed | PrAction::RebaseFailed => symbol.error(),
        PrAction::Rebased | PrAction::WouldRebase => symbol.warn(),
        PrAction::Skip(_) => symbol.muted(),
        _ => symbol.success(),
    }
}

/// `#number`, hyperlinked to the PR when the terminal supports it
fn pr_ref(pr: &PrReport) -> String {
    let label = format!("#{}", pr.number);
    if !pr.url.is_empty() && supports_hyperlinks::supports_hyperlinks() {
        Link::new(&label, &pr.url).to_string()
    } else {
        label
    }
}

fn pr_line(pr: &PrReport) -> String {
    format!(
        "  {} {} {}  {}",
        styled_symbol(pr.action),
        pr_ref(pr).accent(),
        pr.action.to_string().emphasis(),
        pr.reason.muted()
    )
}

/// Streams per-repository progress to stderr while the sweep runs
///
/// Default mode drives a progress bar; verbose mode streams one line per
/// repository and PR instead.
pub struct ConsoleObserver {
    bar: Option<ProgressBar>,
    quiet: bool,
}

impl ConsoleObserver {
    /// Line streaming when verbose, a progress bar otherwise
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        let bar = if verbose {
            None
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(bar_style());
            bar.set_message("scanning repositories");
            Some(bar)
        };
        Self { bar, quiet }
    }

    /// Clear the progress bar once the walk is done
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[async_trait]
impl RunObserver for ConsoleObserver {
    async fn on_repository(&self, index: usize, total: usize, repo: &RepoReport) {
        if let Some(bar) = &self.bar {
            if bar.length() != Some(total as u64) {
                bar.set_length(total as u64);
            }
            bar.set_message(repo.full_name.clone());
            bar.inc(1);
            return;
        }

        let prefix = format!("[{index}/{total}]").muted();
        if let Some(skip) = &repo.skip_reason {
            eprintln!(
                "{prefix} {}",
                format!("{} ─ skipped ({skip})", repo.full_name).muted()
            );
            return;
        }
        if repo.pull_requests.is_empty() {
            if !self.quiet {
                eprintln!(
                    "{prefix} {}",
                    format!("{} ─ no matching pull requests", repo.full_name).muted()
                );
            }
            return;
        }
        eprintln!("{prefix} {}", repo.full_name.emphasis());
        for pr in &repo.pull_requests {
            eprintln!("{}", pr_line(pr));
        }
    }

    async fn on_action(&self, repo_full_name: &str, pr: &PrReport) {
        eprintln!(
            "{} {}{} {}  {}",
            styled_symbol(pr.action),
            repo_full_name.accent(),
            format!("#{}", pr.number).accent(),
            pr.action.to_string().emphasis(),
            pr.reason.muted()
        );
    }
}

/// Lines describing every still-pending action in a scan report
pub fn pending_lines(report: &RunReport) -> Vec<String> {
    let mut lines = Vec::new();
    for repo in &report.repositories {
        for pr in &repo.pull_requests {
            if pr.action.is_pending() {
                lines.push(format!(
                    "  {} {}{} {}  {}",
                    styled_symbol(pr.action),
                    repo.full_name.accent(),
                    format!("#{}", pr.number).accent(),
                    pr.action.to_string().emphasis(),
                    pr.reason.muted()
                ));
            }
        }
    }
    lines
}

/// Render the final human report
pub fn render_report(report: &RunReport, quiet: bool) -> String {
    let mut lines = Vec::new();
    let meta = &report.metadata;

    let mut header = format!(
        "{} {}",
        meta.org.emphasis(),
        format!("· {} · branch pattern '{}'", meta.mode, meta.source_branch).muted()
    );
    if let Some(limit) = meta.repo_limit {
        header.push(' ');
        header.push_str(&format!("· {limit} repositories max").muted());
    }
    lines.push(header);

    for repo in &report.repositories {
        if let Some(skip) = &repo.skip_reason {
            lines.push(String::new());
            lines.push(format!("─ {} ─ skipped ({skip})", repo.full_name).muted());
            continue;
        }
        if repo.pull_requests.is_empty() {
            if !quiet {
                lines.push(String::new());
                lines.push(format!("─ {} ─ no matching pull requests", repo.full_name).muted());
            }
            continue;
        }
        lines.push(String::new());
        lines.push(repo.full_name.emphasis());
        for pr in &repo.pull_requests {
            lines.push(pr_line(pr));
        }
    }

    lines.push(String::new());
    lines.push(summary_line(&report.summary));
    if !report.summary.skipped_by_reason.is_empty() {
        let parts: Vec<String> = report
            .summary
            .skipped_by_reason
            .iter()
            .map(|(reason, count)| format!("{reason} {count}"))
            .collect();
        lines.push(format!("skipped by reason: {}", parts.join(", ")).muted());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn summary_line(summary: &RunSummary) -> String {
    let mut parts = vec![
        format!("{} repos scanned", summary.repos_processed),
        format!("{} PRs found", summary.candidates_found),
    ];
    if summary.merged_success > 0 {
        parts.push(format!("{} merged", summary.merged_success).success());
    }
    if summary.rebased_success > 0 {
        parts.push(format!("{} rebased", summary.rebased_success).warn());
    }
    if summary.would_merge > 0 {
        parts.push(format!("{} would merge", summary.would_merge));
    }
    if summary.would_rebase > 0 {
        parts.push(format!("{} would rebase", summary.would_rebase));
    }
    if summary.ready_to_merge > 0 {
        parts.push(format!("{} ready to merge", summary.ready_to_merge));
    }
    if summary.merge_failed > 0 {
        parts.push(format!("{} merge failed", summary.merge_failed).error());
    }
    if summary.rebase_failed > 0 {
        parts.push(format!("{} rebase failed", summary.rebase_failed).error());
    }
    if summary.repos_skipped > 0 {
        parts.push(format!("{} repos skipped", summary.repos_skipped));
    }
    if summary.skipped > 0 {
        parts.push(format!("{} skipped", summary.skipped).muted());
    }
    parts.join(" │ ")
}

/// Write the pretty-printed JSON report to stdout
pub fn write_json(report: &RunReport) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)?;
    writeln!(stdout)?;
    Ok(())
}
