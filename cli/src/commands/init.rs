//! Init command: bootstrap a deployment directory from the template.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::{CommandRunner, RegistryClient, RuntimeProvider as _};
use crate::application::services::platform_init::{
    CORE_IMAGES, DEFAULT_BRANCH, DEFAULT_PROJECT_DIR, TEMPLATE_REPO_URL, authenticated_url,
    clone_template, ensure_empty_target, hub_org_login, pull_image,
};
use crate::commands::ensure_docker;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::provider::DockerProvider;

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Directory to create (prompted for when omitted on a terminal)
    pub dir: Option<PathBuf>,

    /// Template branch to clone
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,

    /// GitHub token for cloning a private template
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub gh_token: Option<String>,

    /// Docker Hub org access token for pulling private images
    #[arg(long, env = "DOCKER_OAT", hide_env_values = true)]
    pub docker_token: Option<String>,

    #[arg(long, default_value = TEMPLATE_REPO_URL, hide = true)]
    pub repo: String,
}

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the target is not empty, the clone fails, or a core
/// image cannot be pulled.
pub async fn run(app: &AppContext, args: InitArgs) -> Result<()> {
    let target = match args.dir {
        Some(dir) => dir,
        None if app.can_prompt() => PathBuf::from(app.input("Directory to create", DEFAULT_PROJECT_DIR)?),
        None => bail!("TARGET_DIR argument required when running non-interactively."),
    };
    ensure_empty_target(&app.fs, &target)?;

    let mut gh_token = non_empty(args.gh_token);
    let mut docker_token = non_empty(args.docker_token);
    if app.can_prompt() {
        if gh_token.is_none() {
            gh_token = app.secret("GitHub token for private repos (leave blank to skip)")?;
        }
        if docker_token.is_none() {
            docker_token = app.secret("Docker org access token (leave blank to skip)")?;
        }
    }

    app.output.header("agentdeck init");
    let git = TokioCommandRunner::new();
    clone_with_retry(app, &git, &args.repo, &args.branch, &target, gh_token).await?;
    app.output.success(&format!("cloned template into {}", target.display()));

    ensure_docker()?;
    let session = DockerProvider::new(&target, true).session("init")?;
    if let Some(token) = &docker_token {
        hub_org_login(&session.runtime, token).await?;
        app.output.success("logged into Docker Hub");
    }

    for image in CORE_IMAGES {
        pull_with_retry(app, &session.runtime, image, &mut docker_token).await?;
        app.output.success(&format!("pulled {image}"));
    }

    app.output.success("Initialization complete.");
    app.output.info(&format!("next: cd {} && agentdeck up", target.display()));
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Clone once; on an anonymous failure ask for a token and retry once.
async fn clone_with_retry(
    app: &AppContext,
    git: &impl CommandRunner,
    repo: &str,
    branch: &str,
    target: &Path,
    token: Option<String>,
) -> Result<()> {
    let url = authenticated_url(repo, token.as_deref());
    let Err(err) = clone_template(git, &url, branch, target).await else {
        return Ok(());
    };
    if token.is_some() || !app.can_prompt() {
        return Err(err);
    }
    app.output.warn("clone failed; the repository may be private");
    let Some(token) = app.secret("GitHub token")? else {
        return Err(err);
    };
    clone_template(git, &authenticated_url(repo, Some(&token)), branch, target).await
}

/// Pull one image; on an anonymous failure ask for an org token, log in,
/// and retry once. A token obtained this way is kept for later images.
async fn pull_with_retry(
    app: &AppContext,
    client: &impl RegistryClient,
    image: &str,
    token: &mut Option<String>,
) -> Result<()> {
    app.output.info(&format!("pulling {image}..."));
    let Err(err) = pull_image(client, image).await else {
        return Ok(());
    };
    if token.is_some() || !app.can_prompt() {
        return Err(err);
    }
    app.output.warn(&format!("{err:#}"));
    let Some(fresh) = app.secret("Docker org access token")? else {
        return Err(err);
    };
    hub_org_login(client, &fresh).await?;
    *token = Some(fresh);
    pull_image(client, image).await
}
