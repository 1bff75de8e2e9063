//! Update command: pull the latest core platform images.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::RuntimeProvider as _;
use crate::application::services::platform_update::{ensure_project, update_platform};
use crate::commands::ensure_docker;
use crate::infra::provider::DockerProvider;

/// Arguments for the update command.
#[derive(Args)]
pub struct UpdateArgs {
    /// Path to the deployment checkout
    #[arg(default_value = ".")]
    pub project_dir: PathBuf,
}

/// Run the update command.
///
/// # Errors
///
/// Returns an error if the project has no config file, docker is missing,
/// or an image pull fails.
pub async fn run(app: &AppContext, args: &UpdateArgs) -> Result<()> {
    ensure_project(&app.fs, &args.project_dir)?;
    ensure_docker()?;

    app.output.header("Updating core platform images");
    let session = DockerProvider::new(&args.project_dir, true).session("update")?;
    update_platform(&app.fs, &session.runtime, &app.reporter(), &args.project_dir).await?;
    app.output.success("Core platform images updated successfully");
    Ok(())
}
