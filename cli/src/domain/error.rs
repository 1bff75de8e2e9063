//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while loading or validating `agentdeck-config.yml`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("invalid config YAML: {0}")]
    Parse(String),

    #[error("unsupported config_version {0} (only 1 is supported)")]
    UnsupportedVersion(i64),

    #[error("config must declare at least one registry under 'registries'")]
    NoRegistries,

    #[error("config must declare at least one agent under 'agents'")]
    NoAgents,

    #[error("agent entry #{index} is missing required key '{field}'")]
    MissingAgentField { index: usize, field: &'static str },

    #[error("invalid agent name '{0}': must match ^[a-zA-Z0-9][a-zA-Z0-9_.-]*$")]
    InvalidAgentName(String),

    #[error("agent '{0}' is declared more than once")]
    DuplicateAgent(String),

    #[error("agent '{agent}' references unknown registry '{registry}'")]
    UnknownRegistry { agent: String, registry: String },

    #[error("agent '{agent}': environment value for '{key}' must be a scalar")]
    NonScalarEnv { agent: String, key: String },
}

// ── Platform errors ───────────────────────────────────────────────────────────

/// Fatal errors that abort a platform command.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Docker CLI not found. Please install Docker and retry.")]
    RuntimeMissing,

    #[error(
        "Missing .env file in {0}. Run `cp .env.example .env` and populate it before 'agentdeck up'."
    )]
    EnvFileMissing(PathBuf),

    #[error("Docker login to {0} failed. Check DOCKERHUB_USER/DOCKERHUB_TOKEN.")]
    HubLoginFailed(String),

    #[error("Directory {0} is not empty. Aborting.")]
    TargetNotEmpty(PathBuf),

    #[error("No compose file found in {0}. Is this a deployment checkout?")]
    ComposeFileMissing(PathBuf),

    #[error("No agentdeck-config.yml found in {0}.")]
    ConfigMissing(PathBuf),

    #[error("Artifacts volume not found. Is the platform running?")]
    ArtifactsVolumeMissing,

    #[error("`{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },
}
