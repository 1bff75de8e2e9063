//! Tests for the health gate, driven by tokio's paused clock.

use std::time::Duration;

use agentdeck_cli::application::services::health_gate::{HealthGate, POLL_INTERVAL, await_healthy};
use agentdeck_cli::domain::health::{ContainerHealth, HealthOutcome};
use tokio::time::Instant;

use crate::mocks::MockRuntime;

const NAME: &str = "agentdeck-hello-1";

fn gate(timeout_secs: u64) -> HealthGate {
    HealthGate::with_timeout(Duration::from_secs(timeout_secs))
}

#[tokio::test(start_paused = true)]
async fn test_no_healthcheck_settles_on_first_probe() {
    let runtime = MockRuntime::new().with_container(NAME, "running", ContainerHealth::None);
    let started = Instant::now();
    assert_eq!(await_healthy(&runtime, NAME, gate(30)).await, HealthOutcome::Healthy);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(runtime.calls_of("inspect").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_starting_then_healthy_polls_at_interval() {
    let runtime = MockRuntime::new()
        .with_container(NAME, "running", ContainerHealth::Starting)
        .with_health_script(
            NAME,
            &[
                ContainerHealth::Starting,
                ContainerHealth::Starting,
                ContainerHealth::Healthy,
            ],
        );
    let started = Instant::now();
    assert_eq!(await_healthy(&runtime, NAME, gate(30)).await, HealthOutcome::Healthy);
    assert_eq!(started.elapsed(), POLL_INTERVAL * 2);
    assert_eq!(runtime.calls_of("inspect").len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_unhealthy_settles_immediately() {
    let runtime = MockRuntime::new().with_container(NAME, "running", ContainerHealth::Unhealthy);
    assert_eq!(await_healthy(&runtime, NAME, gate(30)).await, HealthOutcome::Unhealthy);
}

#[tokio::test(start_paused = true)]
async fn test_missing_container_is_not_found() {
    let runtime = MockRuntime::new();
    assert_eq!(await_healthy(&runtime, NAME, gate(30)).await, HealthOutcome::NotFound);
}

#[tokio::test(start_paused = true)]
async fn test_container_removed_mid_poll_is_not_found() {
    let runtime = MockRuntime::new()
        .with_container(NAME, "running", ContainerHealth::Starting)
        .vanishing_after(NAME, 1);
    let started = Instant::now();
    assert_eq!(await_healthy(&runtime, NAME, gate(30)).await, HealthOutcome::NotFound);
    assert_eq!(started.elapsed(), POLL_INTERVAL);
    assert_eq!(runtime.calls_of("inspect").len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_stuck_starting_times_out_at_deadline() {
    let runtime = MockRuntime::new().with_container(NAME, "running", ContainerHealth::Starting);
    let started = Instant::now();
    assert_eq!(await_healthy(&runtime, NAME, gate(5)).await, HealthOutcome::TimedOut);
    assert_eq!(started.elapsed(), Duration::from_secs(5));
    // 0s, 2s, 4s, then a final probe at the 5s deadline.
    assert_eq!(runtime.calls_of("inspect").len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_inspect_errors_count_as_pending() {
    let runtime = MockRuntime::new().failing_inspect(NAME);
    assert_eq!(await_healthy(&runtime, NAME, gate(4)).await, HealthOutcome::TimedOut);
    assert!(runtime.calls_of("inspect").len() >= 2);
}
