//! Artifacts command: print the host path of a thread's artifacts.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::artifacts::{ArtifactsDir, artifacts_path};
use crate::commands::ensure_docker;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::docker::DockerCli;

/// Arguments for the artifacts-path command.
#[derive(Args)]
pub struct ArtifactsArgs {
    /// Thread ID to resolve
    pub thread_id: String,

    /// `in` holds uploaded files, `out` holds agent-generated files
    #[arg(long, value_enum, default_value = "in")]
    pub subdir: ArtifactsDir,
}

/// Run the artifacts-path command. Prints only the path, for scripting.
///
/// # Errors
///
/// Returns an error if docker is missing or the artifacts volume does not exist.
pub async fn run(_app: &AppContext, args: &ArtifactsArgs) -> Result<()> {
    ensure_docker()?;
    let runtime = DockerCli::new(TokioCommandRunner::new());
    let path = artifacts_path(&runtime, &args.thread_id, args.subdir).await?;
    println!("{}", path.display());
    Ok(())
}
