//! Application service: registry authentication.
//!
//! Logs the container runtime into every enabled registry that has a
//! credential available. One registry failing never stops the others.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::application::ports::{CommandRunner, ProgressReporter, RegistryClient};
use crate::application::services::failure_detail;
use crate::domain::config::{DEFAULT_TOKEN_USERNAME, RegistryAuth, RegistryConfig};
use crate::domain::env::EnvSnapshot;

/// Placeholder replaced by the secret in `password_command` arguments.
pub const SECRET_PLACEHOLDER: &str = "{pat}";

/// Result of authenticating against one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum LoginOutcome {
    LoggedIn,
    Skipped(String),
    Failed(String),
}

/// Outcome for one registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryLogin {
    pub registry: String,
    pub url: String,
    #[serde(flatten)]
    pub outcome: LoginOutcome,
}

/// Username and raw secret for a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub secret: String,
}

/// Resolve the credential for `registry` from `env`.
///
/// # Errors
///
/// Returns the reason the registry is skipped when no usable credential is
/// available.
pub fn resolve_credential(registry: &RegistryConfig, env: &EnvSnapshot) -> Result<Credential, String> {
    let username = match &registry.auth {
        RegistryAuth::None => return Err("no authentication configured".to_string()),
        RegistryAuth::Basic { username_env, .. } => env
            .non_empty(username_env)
            .ok_or_else(|| format!("{username_env} is not set"))?
            .to_string(),
        RegistryAuth::Token { username, .. } => username
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_TOKEN_USERNAME)
            .to_string(),
    };
    let secret_env = registry.secret_env();
    let secret = env
        .non_empty(&secret_env)
        .ok_or_else(|| format!("{secret_env} is not set"))?
        .to_string();
    Ok(Credential { username, secret })
}

/// Expand a `password_command` template into argv, substituting the secret.
#[must_use]
pub fn expand_password_command(template: &str, secret: &str) -> Vec<String> {
    template
        .split_whitespace()
        .map(|arg| arg.replace(SECRET_PLACEHOLDER, secret))
        .collect()
}

/// Run the password derivation command and return its trimmed stdout.
async fn derive_password(runner: &impl CommandRunner, template: &str, secret: &str) -> Result<String> {
    let argv = expand_password_command(template, secret);
    let Some((program, args)) = argv.split_first() else {
        bail!("password_command is empty");
    };
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    // The argv carries the secret; only the program name goes into errors.
    let output = runner
        .run(program, &args)
        .await
        .with_context(|| format!("failed to run password command '{program}'"))?;
    if !output.status.success() {
        bail!("password command '{program}' failed: {}", failure_detail(&output));
    }
    let password = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if password.is_empty() {
        bail!("password command '{program}' printed nothing");
    }
    Ok(password)
}

async fn authenticate(
    registry: &RegistryConfig,
    env: &EnvSnapshot,
    client: &impl RegistryClient,
    runner: &impl CommandRunner,
) -> LoginOutcome {
    let credential = match resolve_credential(registry, env) {
        Ok(c) => c,
        Err(reason) => return LoginOutcome::Skipped(reason),
    };
    let password = match registry.password_command() {
        Some(template) => match derive_password(runner, template, &credential.secret).await {
            Ok(p) => p,
            Err(e) => return LoginOutcome::Failed(format!("{e:#}")),
        },
        None => credential.secret,
    };
    match client.login(registry.host(), &credential.username, &password).await {
        Ok(output) if output.status.success() => LoginOutcome::LoggedIn,
        Ok(output) => LoginOutcome::Failed(failure_detail(&output)),
        Err(e) => LoginOutcome::Failed(format!("{e:#}")),
    }
}

/// Log into each registry in order, reporting progress as it goes.
pub async fn authenticate_registries(
    registries: &[&RegistryConfig],
    env: &EnvSnapshot,
    client: &impl RegistryClient,
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
) -> Vec<RegistryLogin> {
    let mut logins = Vec::with_capacity(registries.len());
    for registry in registries {
        reporter.step(&format!("logging into {} ({})...", registry.name, registry.host()));
        let outcome = authenticate(registry, env, client, runner).await;
        match &outcome {
            LoginOutcome::LoggedIn => reporter.success(&format!("logged into {}", registry.name)),
            LoginOutcome::Skipped(reason) => {
                tracing::info!(registry = %registry.name, %reason, "registry login skipped");
                reporter.warn(&format!("skipping {}: {reason}", registry.name));
            }
            LoginOutcome::Failed(reason) => {
                tracing::warn!(registry = %registry.name, %reason, "registry login failed");
                reporter.failure(&format!("login to {} failed: {reason}", registry.name));
            }
        }
        logins.push(RegistryLogin {
            registry: registry.name.clone(),
            url: registry.url.clone(),
            outcome,
        });
    }
    logins
}
