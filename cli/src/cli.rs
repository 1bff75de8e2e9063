//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::domain::env::EnvSnapshot;

/// Run a multi-container agent platform on Docker
#[derive(Parser)]
#[command(
    name = "agentdeck",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Answer yes to confirmations and never prompt
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clone the deployment template and pull core images
    Init(commands::init::InitArgs),

    /// Start the platform and set up agents
    Up(commands::up::UpArgs),

    /// Stop the platform
    Down(commands::down::DownArgs),

    /// Show platform and agent containers
    Status(commands::status::StatusArgs),

    /// Show service logs
    Logs(commands::logs::LogsArgs),

    /// Restart the platform
    Restart(commands::restart::RestartArgs),

    /// Run a command inside a service container
    Exec(commands::exec::ExecArgs),

    /// Remove every platform container, volume, and network
    Clean(commands::clean::CleanArgs),

    /// Print the host path of a thread's artifacts directory
    #[command(name = "artifacts-path")]
    ArtifactsPath(commands::artifacts::ArtifactsArgs),

    /// Pull the latest core platform images
    Update(commands::update::UpdateArgs),

    /// Show version
    Version(commands::version::VersionArgs),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self, env: EnvSnapshot) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags { no_color, quiet },
            behaviour: BehaviourFlags { yes },
        };
        let app = AppContext::new(&flags, env);

        match command {
            Command::Init(args) => commands::init::run(&app, args).await,
            Command::Up(args) => commands::up::run(&app, &args).await,
            Command::Down(args) => commands::down::run(&app, &args).await,
            Command::Status(args) => commands::status::run(&app, &args).await,
            Command::Logs(args) => commands::logs::run(&app, &args).await,
            Command::Restart(args) => commands::restart::run(&app, &args).await,
            Command::Exec(args) => commands::exec::run(&app, &args).await,
            Command::Clean(args) => commands::clean::run(&app, &args).await,
            Command::ArtifactsPath(args) => commands::artifacts::run(&app, &args).await,
            Command::Update(args) => commands::update::run(&app, &args).await,
            Command::Version(args) => commands::version::run(&app, &args),
        }
    }
}
