//! Application service: container health gate.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::time::Duration;

use tokio::time::Instant;

use crate::application::ports::ContainerInspector;
use crate::domain::health::{HealthOutcome, evaluate_probe};

/// Poll interval between health probes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default upper bound on waiting for a container to become healthy.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(120);
/// Lower bound for a single inspect call near the deadline.
const MIN_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Timing parameters for [`await_healthy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthGate {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for HealthGate {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_HEALTH_TIMEOUT,
            interval: POLL_INTERVAL,
        }
    }
}

impl HealthGate {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

/// Wait until `container` settles.
///
/// Probes once immediately, then every `gate.interval` until the runtime
/// reports a terminal state or `gate.timeout` elapses. A failed inspect call
/// counts as "still starting". Each inspect call is bounded by the time left.
pub async fn await_healthy(
    inspector: &impl ContainerInspector,
    container: &str,
    gate: HealthGate,
) -> HealthOutcome {
    let deadline = Instant::now() + gate.timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match inspector
            .container_state_within(container, remaining.max(MIN_PROBE_TIMEOUT))
            .await
        {
            Ok(state) => {
                if let Some(outcome) = evaluate_probe(state.as_ref()) {
                    tracing::debug!(container, ?outcome, "health gate settled");
                    return outcome;
                }
            }
            Err(e) => tracing::debug!(container, error = %e, "health probe failed"),
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            tracing::debug!(container, timeout = ?gate.timeout, "health gate timed out");
            return HealthOutcome::TimedOut;
        }
        tokio::time::sleep(gate.interval.min(remaining)).await;
    }
}
