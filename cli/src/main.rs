//! agentdeck CLI - run a multi-container agent platform on Docker

use clap::Parser;
use tracing_subscriber::EnvFilter;

use agentdeck_cli::cli::Cli;
use agentdeck_cli::infra::env::process_env;

/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "AGENTDECK_LOG";

#[tokio::main]
async fn main() {
    // A missing .env is the normal case.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run(process_env()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
