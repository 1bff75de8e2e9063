//! Restart command: restart compose services.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::run_compose;
use crate::commands::{ProjectArgs, ensure_docker};

/// Arguments for the restart command.
#[derive(Args)]
pub struct RestartArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Only restart this service
    pub service: Option<String>,
}

/// Run the restart command.
///
/// # Errors
///
/// Returns an error if docker is missing or compose fails.
pub async fn run(app: &AppContext, args: &RestartArgs) -> Result<()> {
    ensure_docker()?;
    let mut compose_args = vec!["restart".to_string()];
    compose_args.extend(args.service.clone());
    run_compose(&args.project.compose(), &compose_args).await?;
    match &args.service {
        Some(service) => app.output.success(&format!("Restarted {service}")),
        None => app.output.success("Restarted all services"),
    }
    Ok(())
}
