//! Up command: start the platform and set up agents.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, ensure};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::health_gate::HealthGate;
use crate::application::services::platform_up::{GATEWAY_URL, UpOptions, platform_up};
use crate::commands::ProjectArgs;
use crate::domain::reconcile::AgentStartMode;
use crate::infra::gateway::HttpGatewayProbe;
use crate::infra::provider::DockerProvider;

/// Arguments for the up command.
#[derive(Args)]
pub struct UpArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Run in the foreground instead of detaching
    #[arg(long)]
    pub foreground: bool,

    /// Remove existing containers and volumes first
    #[arg(long)]
    pub fresh: bool,

    /// Do not wait for the gateway after a detached start
    #[arg(long)]
    pub no_wait: bool,

    /// Agent startup mode
    #[arg(long, value_enum, default_value = "create")]
    pub agents: AgentStartMode,

    /// Custom env file passed to docker compose
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Seconds to wait for each started agent to become healthy
    #[arg(long, default_value_t = 120)]
    pub health_timeout: u64,

    /// Seconds to wait for the gateway to answer
    #[arg(long, default_value_t = 120)]
    pub ready_timeout: u64,

    /// Gateway readiness URL
    #[arg(long, default_value = GATEWAY_URL)]
    pub gateway_url: String,
}

impl UpArgs {
    fn options(&self) -> UpOptions {
        UpOptions {
            env_file: self.env_file.clone(),
            detach: !self.foreground,
            fresh: self.fresh,
            wait_ready: !self.no_wait,
            agents: self.agents,
            health: HealthGate::with_timeout(Duration::from_secs(self.health_timeout)),
            ready_timeout: Duration::from_secs(self.ready_timeout),
            gateway_url: self.gateway_url.clone(),
            ..UpOptions::new(&self.project.project_dir)
        }
    }
}

/// Run the up command.
///
/// # Errors
///
/// Returns an error on any fatal startup failure. Registry and agent
/// failures are shown in the summary and do not fail the command.
pub async fn run(app: &AppContext, args: &UpArgs) -> Result<()> {
    ensure!(
        args.project.project_dir.is_dir(),
        "Directory {} does not exist",
        args.project.project_dir.display()
    );
    if let Some(env_file) = &args.env_file {
        ensure!(env_file.is_file(), "env file {} does not exist", env_file.display());
    }

    app.output.header("agentdeck up");
    let provider = DockerProvider::new(&args.project.project_dir, !args.project.no_langfuse);
    let report = platform_up(
        &provider,
        &app.fs,
        &HttpGatewayProbe::default(),
        &app.reporter(),
        app.env.clone(),
        &args.options(),
    )
    .await?;
    app.renderer().render_up(&report);
    Ok(())
}
