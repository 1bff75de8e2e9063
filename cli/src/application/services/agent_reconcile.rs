//! Application service: agent container reconciliation.
//!
//! Agents are processed one at a time in declaration order. A failure for
//! one agent is recorded in its report and never stops the rest.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use crate::application::ports::{ContainerRuntime, ProgressReporter};
use crate::application::services::failure_detail;
use crate::application::services::health_gate::{HealthGate, await_healthy};
use crate::domain::agent::{build_container_spec, container_name};
use crate::domain::config::{AgentConfig, Config};
use crate::domain::env::EnvSnapshot;
use crate::domain::reconcile::{
    AgentOutcome, AgentReport, AgentStartMode, ContainerPlan, Observed, plan, precheck,
};

/// Reconcile every configured agent.
pub async fn reconcile_agents(
    config: &Config,
    mode: AgentStartMode,
    env: &EnvSnapshot,
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    gate: HealthGate,
) -> Vec<AgentReport> {
    let mut reports = Vec::with_capacity(config.agents.len());
    for agent in &config.agents {
        let outcome = reconcile_agent(config, agent, mode, env, runtime, reporter, gate).await;
        reports.push(AgentReport {
            agent: agent.name.clone(),
            container: container_name(&agent.name),
            outcome,
        });
    }
    reports
}

/// Reconcile a single agent and return its outcome.
pub async fn reconcile_agent(
    config: &Config,
    agent: &AgentConfig,
    mode: AgentStartMode,
    env: &EnvSnapshot,
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    gate: HealthGate,
) -> AgentOutcome {
    if let Some(outcome) = precheck(agent, mode) {
        if outcome == AgentOutcome::Disabled {
            reporter.step(&format!("skipping disabled agent {}", agent.name));
        }
        return outcome;
    }

    let image = config.qualified_image(agent);
    reporter.step(&format!("pulling {image}..."));
    match runtime.pull(&image).await {
        Ok(output) if output.status.success() => {}
        Ok(output) => return pull_failed(reporter, &agent.name, failure_detail(&output)),
        Err(e) => return pull_failed(reporter, &agent.name, format!("{e:#}")),
    }

    let name = container_name(&agent.name);
    let observed = match runtime.container_state(&name).await {
        Ok(Some(_)) => Observed::Present,
        Ok(None) => Observed::Missing,
        Err(e) => {
            let detail = format!("cannot inspect {name}: {e:#}");
            reporter.failure(&format!("{}: {detail}", agent.name));
            return AgentOutcome::CreateFailed(detail);
        }
    };

    match plan(mode, observed) {
        ContainerPlan::LeaveExisting => {
            reporter.success(&format!("{name} already exists"));
            AgentOutcome::AlreadyExists
        }
        ContainerPlan::AwaitExisting => {
            reporter.step(&format!("{name} already exists, waiting for health..."));
            gate_health(runtime, reporter, &name, gate).await
        }
        ContainerPlan::Create { start } => {
            reporter.step(&format!("creating {name}..."));
            let spec = build_container_spec(agent, &image, env);
            match runtime.create(&spec).await {
                Ok(output) if output.status.success() => {}
                Ok(output) => return create_failed(reporter, &name, failure_detail(&output)),
                Err(e) => return create_failed(reporter, &name, format!("{e:#}")),
            }
            if !start {
                reporter.success(&format!("created {name}"));
                return AgentOutcome::Created;
            }

            match runtime.start(&name).await {
                Ok(output) if output.status.success() => {}
                Ok(output) => return start_failed(reporter, &name, failure_detail(&output)),
                Err(e) => return start_failed(reporter, &name, format!("{e:#}")),
            }
            reporter.step(&format!("started {name}, waiting for health..."));
            gate_health(runtime, reporter, &name, gate).await
        }
    }
}

async fn gate_health(
    runtime: &impl ContainerRuntime,
    reporter: &impl ProgressReporter,
    name: &str,
    gate: HealthGate,
) -> AgentOutcome {
    let outcome = AgentOutcome::from(await_healthy(runtime, name, gate).await);
    if outcome.is_failure() {
        reporter.failure(&format!("{name} {}", outcome.label()));
    } else {
        reporter.success(&format!("{name} healthy"));
    }
    outcome
}

fn pull_failed(reporter: &impl ProgressReporter, agent: &str, detail: String) -> AgentOutcome {
    tracing::warn!(agent, %detail, "image pull failed");
    reporter.failure(&format!("pull failed for {agent}: {detail}"));
    AgentOutcome::PullFailed(detail)
}

fn create_failed(reporter: &impl ProgressReporter, name: &str, detail: String) -> AgentOutcome {
    tracing::warn!(container = name, %detail, "container create failed");
    reporter.failure(&format!("create failed for {name}: {detail}"));
    AgentOutcome::CreateFailed(detail)
}

fn start_failed(reporter: &impl ProgressReporter, name: &str, detail: String) -> AgentOutcome {
    tracing::warn!(container = name, %detail, "container start failed");
    reporter.failure(&format!("start failed for {name}: {detail}"));
    AgentOutcome::StartFailed(detail)
}
