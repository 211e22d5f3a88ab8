//! Command-line interface for prsweep

mod render;
mod run;
mod style;

pub use run::run;

use clap::Parser;

use pr_sweep::error::{Error, Result};

/// Bulk PR readiness evaluation and conditional merging across a GitHub
/// organization
#[derive(Debug, Parser)]
#[command(name = "prsweep", version, about)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// GitHub organization to scan (falls back to GITHUB_ORG)
    #[arg(long)]
    pub org: Option<String>,

    /// Substring matched against head branch names
    #[arg(long)]
    pub source_branch: Option<String>,

    /// Update out-of-date branches instead of merging
    #[arg(long)]
    pub rebase: bool,

    /// Merge pull requests that are in a valid state
    #[arg(long)]
    pub merge: bool,

    /// With --merge, merge even when the branch is behind its base
    #[arg(long)]
    pub skip_rebase: bool,

    /// Limit the sweep to specific repositories (repeatable)
    #[arg(long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Maximum repositories to process (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub repo_limit: usize,

    /// Scan first and ask before executing any action
    #[arg(long)]
    pub confirm: bool,

    /// Emit the machine-readable report on stdout
    #[arg(long)]
    pub json: bool,

    /// Hide repositories with no matching pull requests
    #[arg(long)]
    pub quiet: bool,

    /// Line-by-line progress and debug diagnostics
    #[arg(long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Install the global tracing subscriber, writing to stderr
pub fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Internal(format!("Failed to set tracing subscriber: {e}")))
}
