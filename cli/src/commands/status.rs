//! Status command: list platform and agent containers.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::platform_status::collect_status;
use crate::commands::ensure_docker;
use crate::domain::error::PlatformError;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::docker::DockerCli;
use crate::output::{json, progress};

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Run the status command.
///
/// # Errors
///
/// Returns an error if docker is missing or containers cannot be listed.
pub async fn run(app: &AppContext, args: &StatusArgs) -> Result<()> {
    if args.json {
        return run_json().await;
    }
    ensure_docker()?;
    let runtime = DockerCli::new(TokioCommandRunner::new());
    let status = progress::while_waiting(
        &app.output,
        "collecting container status...",
        collect_status(&runtime),
    )
    .await?;
    app.renderer().render_status(&status);
    Ok(())
}

/// JSON mode prints an error object on stdout as well, so scripts always get JSON.
async fn run_json() -> Result<()> {
    let result = async {
        ensure_docker()?;
        collect_status(&DockerCli::new(TokioCommandRunner::new())).await
    }
    .await;
    match result {
        Ok(status) => json::print(&status),
        Err(e) => {
            println!("{}", json::format_error(&format!("{e:#}"), error_code(&e))?);
            Err(e)
        }
    }
}

fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<PlatformError>() {
        Some(PlatformError::RuntimeMissing) => "runtime_missing",
        _ => "status_failed",
    }
}
