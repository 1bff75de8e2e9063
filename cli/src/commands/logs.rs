//! Logs command: show compose service logs.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::run_compose;
use crate::commands::{ProjectArgs, ensure_docker};

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only show logs for this service
    pub service: Option<String>,

    /// Follow log output
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show from the end of the logs
    #[arg(long, default_value_t = 100)]
    pub tail: u32,
}

/// Compose arguments for `logs`.
#[must_use]
pub fn logs_args(service: Option<&str>, follow: bool, tail: u32) -> Vec<String> {
    let mut args = vec!["logs".to_string(), format!("--tail={tail}")];
    if follow {
        args.push("--follow".to_string());
    }
    if let Some(service) = service {
        args.push(service.to_string());
    }
    args
}

/// Run the logs command.
///
/// # Errors
///
/// Returns an error if docker is missing or compose fails.
pub async fn run(_app: &AppContext, args: &LogsArgs) -> Result<()> {
    ensure_docker()?;
    run_compose(
        &args.project.compose(),
        &logs_args(args.service.as_deref(), args.follow, args.tail),
    )
    .await
}
