//! CLI entry point for the xdcc-search tool.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};
use xdcc_search_core::{SearchOutcome, build_default_registry, configure_search_http_timeouts};

mod app_config;
mod cli;
mod output;

use cli::{Cli, Command, SearchArgs};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Results go to stdout; logs stay on stderr so output can be piped.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?cli, "CLI arguments parsed");

    match &cli.command {
        Command::Search(args) => run_search_command(args, cli.quiet).await,
    }
}

async fn run_search_command(args: &SearchArgs, quiet: bool) -> Result<()> {
    let loaded = app_config::load_default_file_config()?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), loaded = loaded.config.is_some(), "Config file");
    }

    let (settings, timeouts) = app_config::resolve_search_settings(args, loaded.config.as_ref());
    configure_search_http_timeouts(timeouts.connect_secs, timeouts.read_secs);

    let registry = build_default_registry(&settings);
    if registry.is_empty() {
        bail!("No search sources available. Check `xdcc_eu_url` in your config or --endpoint.");
    }
    debug!(?registry, "Search registry ready");

    let spinner = start_spinner(quiet, &args.keywords);
    let result = registry.search(&args.keywords).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let outcome = result?;

    report_failures(&outcome);
    output::print_outcome(&outcome, args.json)?;

    if outcome.all_failed() {
        bail!(
            "All {} search source(s) failed; results are unavailable",
            outcome.failures().len()
        );
    }
    Ok(())
}

fn start_spinner(quiet: bool, keywords: &[String]) -> Option<ProgressBar> {
    if quiet || !io::stderr().is_terminal() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Searching for '{}'", keywords.join(" ")));
    spinner.enable_steady_tick(Duration::from_millis(120));
    Some(spinner)
}

fn report_failures(outcome: &SearchOutcome) {
    for failure in outcome.failures() {
        warn!(source = %failure.source, error = %failure.error, "Search source failed");
    }
    if outcome.truncated() > 0 {
        warn!(
            dropped = outcome.truncated(),
            "Result limit reached; some packs were not listed"
        );
    }
    info!(
        results = outcome.results().len(),
        failed_sources = outcome.failures().len(),
        "Search finished"
    );
}
