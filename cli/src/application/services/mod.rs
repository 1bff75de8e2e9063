//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::ComposeDriver;
use crate::domain::error::PlatformError;

pub mod agent_reconcile;
pub mod artifacts;
pub mod config_store;
pub mod health_gate;
pub mod platform_clean;
pub mod platform_init;
pub mod platform_status;
pub mod platform_up;
pub mod platform_update;
pub mod registry_auth;

/// Short human-readable reason for a failed command: the last non-empty
/// stderr line, or the exit code when stderr is empty.
pub(crate) fn failure_detail(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr)
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map_or_else(
            || match output.status.code() {
                Some(code) => format!("exit code {code}"),
                None => "terminated by signal".to_string(),
            },
            str::to_string,
        )
}

/// Run `docker compose <args>` and turn a non-zero exit into
/// [`PlatformError::CommandFailed`].
///
/// # Errors
///
/// Returns an error if compose cannot be run or exits non-zero.
pub async fn run_compose<S: AsRef<str>>(compose: &impl ComposeDriver, args: &[S]) -> Result<()> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let command = format!("docker compose {}", args.join(" "));
    let status = compose
        .compose(&args)
        .await
        .with_context(|| format!("running {command}"))?;
    if !status.success() {
        return Err(PlatformError::CommandFailed {
            command,
            code: status.code().unwrap_or(-1),
        }
        .into());
    }
    Ok(())
}
