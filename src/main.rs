mod check;
mod cli;
mod config;
mod list;
mod progress;
mod report;
mod run;
mod types;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "trinity_smoke=debug" } else { "trinity_smoke=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn validate_base_url(name: &str, url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url).with_context(|| format!("Invalid {name}: {url}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("Invalid {name}: {url} (expected http or https)");
    }
    Ok(())
}

async fn run_checks(cli: &Cli) -> Result<i32> {
    validate_base_url("API URL", &cli.api_url)?;
    validate_base_url("dashboard URL", &cli.dashboard_url)?;

    let catalog = config::resolve_catalog(cli.catalog.as_deref())?;
    let checker = check::Checker::new(
        &cli.api_url,
        &cli.dashboard_url,
        Duration::from_secs(cli.timeout_secs),
    )?;
    let targets = report::Targets {
        api_url: cli.api_url.clone(),
        dashboard_url: cli.dashboard_url.clone(),
    };

    let report = run::RunDriver::new(&checker, targets).run(&catalog).await;
    tracing::debug!(
        "executed {} of {} checks{}",
        report.executed.len(),
        catalog.checks().count(),
        if report.aborted { ", aborted on failed precondition" } else { "" }
    );
    Ok(report.exit_code())
}

fn list_checks(cli: &Cli, json: bool) -> Result<()> {
    let catalog = config::resolve_catalog(cli.catalog.as_deref())?;
    let entries = list::entries(&catalog, &cli.api_url, &cli.dashboard_url);
    if json {
        list::print_json(&entries);
    } else {
        list::print_table(&entries);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => match run_checks(&cli).await {
            Ok(code) => std::process::exit(code),
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(2);
            }
        },
        Commands::List { json } => match list_checks(&cli, json) {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("Error: {e:#}");
                std::process::exit(2);
            }
        },
    }
}
