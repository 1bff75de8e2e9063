//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::platform_clean::CleanReport;
use crate::application::services::platform_up::{Readiness, UpReport};
use crate::application::services::registry_auth::LoginOutcome;
use crate::domain::health::ContainerHealth;
use crate::domain::reconcile::AgentOutcome;
use crate::domain::status::{ContainerKind, PlatformStatus, StatusRow};
use crate::output::{OutputContext, Styles};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("agentdeck {version}");
    }

    /// Render the container table and running summary.
    pub fn render_status(&self, status: &PlatformStatus) {
        if status.containers.is_empty() {
            self.ctx.info("No agentdeck containers found. Start the platform: agentdeck up");
            return;
        }
        println!(
            "  {}",
            format!(
                "{:<32} {:<6} {:<12} {:<10} {}",
                "NAME", "KIND", "STATUS", "HEALTH", "PORTS"
            )
            .style(self.ctx.styles.bold)
        );
        for row in &status.containers {
            let line = format_status_row(row, &self.ctx.styles);
            if row.status == "running" {
                println!("  {line}");
            } else {
                println!("  {}", line.style(self.ctx.styles.dim));
            }
        }
        println!();
        self.ctx.kv(
            "Running:",
            &format!("{}/{} containers", status.running, status.total),
        );
    }

    /// Render the end-of-run summary for `up`.
    pub fn render_up(&self, report: &UpReport) {
        if self.ctx.quiet {
            return;
        }
        if !report.logins.is_empty() {
            println!();
            self.ctx.header("Registries:");
            for login in &report.logins {
                match &login.outcome {
                    LoginOutcome::LoggedIn => self.ctx.success(&format!("{} logged in", login.registry)),
                    LoginOutcome::Skipped(reason) => {
                        self.ctx.info(&format!("{} skipped ({reason})", login.registry));
                    }
                    LoginOutcome::Failed(reason) => {
                        self.ctx.warn(&format!("{} failed ({reason})", login.registry));
                    }
                }
            }
        }
        if !report.agents.is_empty() {
            println!();
            self.ctx.header("Agents:");
            for agent in &report.agents {
                let line = format!("{:<20} {}", agent.agent, agent_outcome_display(&agent.outcome));
                if agent.outcome.is_failure() {
                    self.ctx.warn(&line);
                } else {
                    self.ctx.success(&line);
                }
            }
        }
        println!();
        if !report.gateway_restarted {
            self.ctx.warn("Gateway restart failed; agent routes may be stale");
        }
        match report.readiness {
            Readiness::TimedOut => self.ctx.warn("Platform started, gateway not ready yet"),
            Readiness::Ready | Readiness::NotChecked => self.ctx.success("Platform is running!"),
        }
    }

    /// Render what `clean` removed.
    pub fn render_clean(&self, report: &CleanReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.kv("Containers removed:", &report.containers.len().to_string());
        self.ctx.kv("Volumes removed:", &report.volumes.len().to_string());
        self.ctx.kv(
            "Network removed:",
            if report.network_removed { "yes" } else { "no" },
        );
        if report.failures.is_empty() {
            self.ctx.success("Cleanup complete!");
        } else {
            self.ctx
                .warn(&format!("Cleanup finished with {} warning(s)", report.failures.len()));
        }
    }
}

/// One table row of `agentdeck status`. Only the health cell is styled.
#[must_use]
pub fn format_status_row(row: &StatusRow, styles: &Styles) -> String {
    let ports = if row.ports.is_empty() {
        "-".to_string()
    } else {
        row.ports.join(", ")
    };
    let health = format!("{:<10}", health_display(row.health));
    format!(
        "{:<32} {:<6} {:<12} {} {ports}",
        row.name,
        kind_display(row.kind),
        row.status,
        health.style(styles.for_health(row.health)),
    )
}

#[must_use]
pub fn kind_display(kind: ContainerKind) -> &'static str {
    match kind {
        ContainerKind::Agent => "agent",
        ContainerKind::Core => "core",
        ContainerKind::Other => "other",
    }
}

#[must_use]
pub fn health_display(health: Option<ContainerHealth>) -> &'static str {
    match health {
        None | Some(ContainerHealth::None) => "-",
        Some(ContainerHealth::Starting) => "starting",
        Some(ContainerHealth::Healthy) => "healthy",
        Some(ContainerHealth::Unhealthy) => "unhealthy",
    }
}

/// Outcome label with its failure detail, when there is one.
#[must_use]
pub fn agent_outcome_display(outcome: &AgentOutcome) -> String {
    match outcome {
        AgentOutcome::PullFailed(detail)
        | AgentOutcome::CreateFailed(detail)
        | AgentOutcome::StartFailed(detail) => format!("{} ({detail})", outcome.label()),
        _ => outcome.label().to_string(),
    }
}
