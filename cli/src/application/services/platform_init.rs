//! Application service: project bootstrap and core image pulls.
//!
//! Building blocks for `init` and `update`. Prompting for tokens and retrying
//! is left to the command layer.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::application::ports::{CommandRunner, LocalFs, ProgressReporter, RegistryClient};
use crate::application::services::failure_detail;
use crate::domain::error::PlatformError;

/// Deployment template cloned by `init`.
pub const TEMPLATE_REPO_URL: &str = "https://github.com/agentsystems/agent-platform-deployments.git";
pub const DEFAULT_BRANCH: &str = "main";
/// Default directory name offered by the interactive prompt.
pub const DEFAULT_PROJECT_DIR: &str = "agent-platform-deployments";

/// Docker Hub organisation used for the org access token login.
pub const HUB_ORG: &str = "agentsystems";
pub const HUB_REGISTRY: &str = "docker.io";

/// Images every deployment needs before the first `up`.
pub const CORE_IMAGES: &[&str] = &[
    "agentsystems/agent-control-plane:latest",
    "agentsystems/hello-world-agent:latest",
];

/// `base` with `token` embedded as HTTPS user info.
#[must_use]
pub fn authenticated_url(base: &str, token: Option<&str>) -> String {
    match token.filter(|t| !t.is_empty()) {
        Some(token) => match base.strip_prefix("https://") {
            Some(rest) => format!("https://{token}@{rest}"),
            None => base.to_string(),
        },
        None => base.to_string(),
    }
}

/// Refuse to bootstrap into a directory that already has content.
///
/// # Errors
///
/// Returns [`PlatformError::TargetNotEmpty`] when `dir` exists and is not
/// empty, or an I/O error when it cannot be listed.
pub fn ensure_empty_target(fs: &impl LocalFs, dir: &Path) -> Result<()> {
    if fs.is_non_empty_dir(dir)? {
        return Err(PlatformError::TargetNotEmpty(dir.to_path_buf()).into());
    }
    Ok(())
}

/// `git clone --branch <branch> <url> <dir>` with inherited stdio.
///
/// # Errors
///
/// Returns an error when git cannot be spawned or exits non-zero. The URL
/// may carry a token and is never included in the error.
pub async fn clone_template(
    runner: &impl CommandRunner,
    url: &str,
    branch: &str,
    dir: &Path,
) -> Result<()> {
    let dir = dir.to_string_lossy();
    let status = runner
        .run_status("git", &["clone", "--branch", branch, url, &dir])
        .await
        .context("failed to run git")?;
    if !status.success() {
        return Err(PlatformError::CommandFailed {
            command: format!("git clone --branch {branch} {TEMPLATE_REPO_URL} {dir}"),
            code: status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(())
}

/// Log into Docker Hub as [`HUB_ORG`] with an org access token.
///
/// # Errors
///
/// Returns [`PlatformError::HubLoginFailed`] when the login is rejected.
pub async fn hub_org_login(client: &impl RegistryClient, token: &str) -> Result<()> {
    let output = client
        .login(HUB_REGISTRY, HUB_ORG, token)
        .await
        .context("running docker login")?;
    if !output.status.success() {
        tracing::warn!(detail = %failure_detail(&output), "docker hub org login failed");
        return Err(PlatformError::HubLoginFailed(HUB_REGISTRY.to_string()).into());
    }
    Ok(())
}

/// Pull one image.
///
/// # Errors
///
/// Returns an error naming the image when the pull fails.
pub async fn pull_image(client: &impl RegistryClient, image: &str) -> Result<()> {
    let output = client
        .pull(image)
        .await
        .with_context(|| format!("failed to run docker pull {image}"))?;
    if !output.status.success() {
        bail!("docker pull {image} failed: {}", failure_detail(&output));
    }
    Ok(())
}

/// Pull `images` in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the first pull failure.
pub async fn pull_images(
    client: &impl RegistryClient,
    images: &[&str],
    reporter: &impl ProgressReporter,
) -> Result<()> {
    for image in images {
        reporter.step(&format!("pulling {image}..."));
        pull_image(client, image).await?;
        reporter.success(&format!("pulled {image}"));
    }
    Ok(())
}
