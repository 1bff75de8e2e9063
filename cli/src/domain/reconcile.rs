//! Agent reconciliation planning.
//!
//! The reconciler is additive: it creates missing containers and never
//! touches existing ones. Each decision here is a pure function of the agent,
//! the start mode, and what the runtime reported a moment ago.

use serde::Serialize;

use crate::domain::config::AgentConfig;
use crate::domain::health::HealthOutcome;

/// What `up` does with configured agents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum AgentStartMode {
    /// Skip agent setup entirely.
    None,
    /// Pull images and create containers, leaving them stopped.
    #[default]
    Create,
    /// Pull, create, start, and wait for health.
    All,
}

/// What the runtime currently has under the agent's container name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    Missing,
    Present,
}

/// Action to take after the image has been pulled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerPlan {
    /// Create the container; start it and gate on health when `start`.
    Create { start: bool },
    /// Container already exists; wait for its health.
    AwaitExisting,
    /// Container already exists; nothing to do.
    LeaveExisting,
}

/// Decide whether an agent is processed at all. `Some` short-circuits with
/// the final outcome before any runtime call.
#[must_use]
pub fn precheck(agent: &AgentConfig, mode: AgentStartMode) -> Option<AgentOutcome> {
    if mode == AgentStartMode::None {
        return Some(AgentOutcome::Skipped);
    }
    if agent.disabled {
        return Some(AgentOutcome::Disabled);
    }
    None
}

/// Decide the container action from the observed runtime state.
#[must_use]
pub fn plan(mode: AgentStartMode, observed: Observed) -> ContainerPlan {
    match (observed, mode) {
        (Observed::Missing, AgentStartMode::All) => ContainerPlan::Create { start: true },
        (Observed::Missing, _) => ContainerPlan::Create { start: false },
        (Observed::Present, AgentStartMode::All) => ContainerPlan::AwaitExisting,
        (Observed::Present, _) => ContainerPlan::LeaveExisting,
    }
}

/// Final outcome for one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AgentOutcome {
    /// Agent setup was skipped by `--agents none`.
    Skipped,
    Disabled,
    PullFailed(String),
    CreateFailed(String),
    StartFailed(String),
    /// Created and left stopped.
    Created,
    /// Container already existed and was left alone.
    AlreadyExists,
    Healthy,
    Unhealthy,
    TimedOut,
    NotFound,
}

impl AgentOutcome {
    /// Short lowercase label for reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skipped => "skipped",
            Self::Disabled => "disabled",
            Self::PullFailed(_) => "pull failed",
            Self::CreateFailed(_) => "create failed",
            Self::StartFailed(_) => "start failed",
            Self::Created => "created",
            Self::AlreadyExists => "already exists",
            Self::Healthy => "healthy",
            Self::Unhealthy => "unhealthy",
            Self::TimedOut => "timed out",
            Self::NotFound => "not found",
        }
    }

    /// `true` for outcomes that indicate something went wrong.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::PullFailed(_)
                | Self::CreateFailed(_)
                | Self::StartFailed(_)
                | Self::Unhealthy
                | Self::TimedOut
                | Self::NotFound
        )
    }
}

impl From<HealthOutcome> for AgentOutcome {
    fn from(outcome: HealthOutcome) -> Self {
        match outcome {
            HealthOutcome::Healthy => Self::Healthy,
            HealthOutcome::Unhealthy => Self::Unhealthy,
            HealthOutcome::TimedOut => Self::TimedOut,
            HealthOutcome::NotFound => Self::NotFound,
        }
    }
}

/// Outcome for one agent, with the container it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentReport {
    pub agent: String,
    pub container: String,
    #[serde(flatten)]
    pub outcome: AgentOutcome,
}
