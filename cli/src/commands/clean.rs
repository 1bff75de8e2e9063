//! Clean command: remove every platform container, volume, and network.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::platform_clean::clean_platform;
use crate::commands::{ProjectArgs, ensure_docker};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::compose::ComposeProject;
use crate::infra::docker::DockerCli;

/// Arguments for the clean command.
#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

/// Run the clean command.
///
/// # Errors
///
/// Returns an error if docker is missing or the prompt fails. Failures to
/// remove individual resources are reported as warnings.
pub async fn run(app: &AppContext, args: &CleanArgs) -> Result<()> {
    if !args.force {
        app.output.warn("This will remove ALL agentdeck resources:");
        app.output.info("all containers (core services and agents)");
        app.output.info("all volumes (databases, artifacts, ...)");
        app.output.info("the agents_net network");
        if !app.confirm("All data will be permanently deleted. Continue?", false)? {
            app.output.warn("Operation cancelled.");
            return Ok(());
        }
    }
    ensure_docker()?;

    let compose = ComposeProject::discover(&args.project.project_dir, !args.project.no_langfuse)
        .is_ok()
        .then(|| args.project.compose());
    let runtime = DockerCli::new(TokioCommandRunner::new());
    let report = clean_platform(compose.as_ref(), &runtime, &app.reporter()).await;
    app.renderer().render_clean(&report);
    Ok(())
}
