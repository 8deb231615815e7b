use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "trinity-smoke",
    about = "Smoke tests for the TrinityChain API server and dashboard"
)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Base URL of the API server
    #[arg(long, global = true, env = "TRINITY_API_URL", default_value = "http://localhost:3000")]
    pub api_url: String,

    /// Base URL of the dashboard dev server
    #[arg(long, global = true, env = "TRINITY_DASHBOARD_URL", default_value = "http://localhost:5173")]
    pub dashboard_url: String,

    /// Check catalog (.toml, .yaml or .yml) replacing the built-in one
    #[arg(long, global = true, env = "TRINITY_SMOKE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, default_value_t = crate::check::DEFAULT_TIMEOUT.as_secs(), value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run every check in the catalog (default)
    Run,

    /// Print the check catalog without sending any requests
    List {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },
}
