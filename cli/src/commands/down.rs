//! Down command: stop the compose stack.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::run_compose;
use crate::commands::{ProjectArgs, ensure_docker};

/// Arguments for the down command.
#[derive(Args)]
pub struct DownArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Also remove named volumes (deletes data)
    #[arg(short, long)]
    pub volumes: bool,
}

/// Compose arguments for `down`.
#[must_use]
pub fn down_args(volumes: bool) -> Vec<String> {
    let mut args = vec!["down".to_string()];
    if volumes {
        args.push("-v".to_string());
    }
    args
}

/// Run the down command.
///
/// # Errors
///
/// Returns an error if docker is missing or compose fails.
pub async fn run(app: &AppContext, args: &DownArgs) -> Result<()> {
    ensure_docker()?;
    run_compose(&args.project.compose(), &down_args(args.volumes)).await?;
    app.output.success("Platform stopped");
    Ok(())
}
