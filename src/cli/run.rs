//! Top-level command flow

use anstream::{eprintln, print};
use dialoguer::Confirm;
use tracing::debug;

use pr_sweep::auth;
use pr_sweep::config::Config;
use pr_sweep::error::{Error, Result};
use pr_sweep::github::RestClient;
use pr_sweep::sweep::{NullObserver, RunObserver, Sweeper};

use crate::cli::Cli;
use crate::cli::render::{self, ConsoleObserver};
use crate::cli::style::Stylize;

/// Run the sweep described by the parsed arguments
pub async fn run(args: Cli) -> Result<()> {
    if args.no_color {
        anstream::ColorChoice::Never.write_global();
    }

    let config = build_config(&args);
    config.validate()?;

    // =========================================================================
    // Phase 1: GATHER - Resolve auth and build the client
    // =========================================================================

    let auth = auth::resolve_token()?;
    debug!(source = ?auth.source, "resolved GitHub token");
    let client = RestClient::new(&auth.token)?;
    let sweeper = Sweeper::new(&client, &config);

    let console = if args.json {
        None
    } else {
        Some(ConsoleObserver::new(args.verbose, args.quiet))
    };
    let null = NullObserver;
    let observer: &dyn RunObserver = match &console {
        Some(c) => c,
        None => &null,
    };

    // =========================================================================
    // Phase 2: SCAN - Walk the organization once
    // =========================================================================

    let mut report = sweeper.run(observer).await?;
    if let Some(console) = &console {
        console.finish();
    }

    // =========================================================================
    // Phase 3: CONFIRM + EXECUTE - Replay the frozen plan
    // =========================================================================

    if config.confirm && report.pending_actions() > 0 {
        let pending = render::pending_lines(&report);
        eprintln!();
        eprintln!("{}", "Pending actions:".emphasis());
        for line in &pending {
            eprintln!("{line}");
        }
        if !Confirm::new()
            .with_prompt("Proceed with these actions?")
            .default(false)
            .interact()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
        {
            eprintln!("{}", "Operation cancelled by user.".muted());
            return Ok(());
        }
        eprintln!();
        sweeper.execute_planned(&mut report, observer).await;
    }

    // =========================================================================
    // Phase 4: REPORT - Final human or JSON output
    // =========================================================================

    if args.json {
        render::write_json(&report)?;
    } else {
        print!("{}", render::render_report(&report, args.quiet));
    }
    Ok(())
}

fn build_config(args: &Cli) -> Config {
    Config {
        org: args
            .org
            .clone()
            .or_else(|| std::env::var("GITHUB_ORG").ok())
            .unwrap_or_default(),
        source_branch: args.source_branch.clone().unwrap_or_default(),
        rebase: args.rebase,
        merge: args.merge,
        skip_rebase: args.skip_rebase,
        repos: args.repos.clone(),
        repo_limit: args.repo_limit,
        confirm: args.confirm,
    }
}
