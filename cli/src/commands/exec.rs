//! Exec command: run a command inside a running service container.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::run_compose;
use crate::commands::{ProjectArgs, ensure_docker};

/// Arguments for the exec command.
#[derive(Args)]
pub struct ExecArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Service name (e.g. gateway, postgres)
    pub service: String,

    /// Command and arguments to run inside the container
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub cmd: Vec<String>,
}

/// Compose arguments for `exec`.
#[must_use]
pub fn exec_args(service: &str, cmd: &[String]) -> Vec<String> {
    let mut args = vec!["exec".to_string(), service.to_string()];
    args.extend(cmd.iter().cloned());
    args
}

/// Run the exec command.
///
/// # Errors
///
/// Returns an error if docker is missing or the command fails.
pub async fn run(_app: &AppContext, args: &ExecArgs) -> Result<()> {
    ensure_docker()?;
    run_compose(&args.project.compose(), &exec_args(&args.service, &args.cmd)).await
}
