//! Tests for `clean_platform`.

use std::collections::BTreeMap;

use agentdeck_cli::application::services::platform_clean::clean_platform;
use agentdeck_cli::domain::health::{ContainerHealth, ContainerState, ContainerSummary};

use crate::mocks::{MockCompose, MockRuntime, RecordingReporter};

pub fn summary(id: &str, name: &str, status: &str) -> ContainerSummary {
    ContainerSummary {
        id: id.to_string(),
        name: name.to_string(),
        labels: BTreeMap::new(),
        state: ContainerState {
            status: status.to_string(),
            running: status == "running",
            health: ContainerHealth::None,
        },
        ports: Vec::new(),
    }
}

#[tokio::test]
async fn test_clean_removes_everything_in_order() {
    let compose = MockCompose::default();
    let runtime = MockRuntime::new()
        .listing(vec![
            summary("1", "agentdeck-gateway-1", "running"),
            summary("2", "agentdeck-hello-1", "exited"),
        ])
        .with_volumes(&["agentdeck_artifacts", "agentdeck_postgres", "unrelated_data"])
        .with_network();
    let report = clean_platform(Some(&compose), &runtime, &RecordingReporter::default()).await;

    assert_eq!(compose.calls(), vec!["down -v --remove-orphans"]);
    assert!(report.compose_down);
    assert_eq!(report.containers, vec!["agentdeck-gateway-1", "agentdeck-hello-1"]);
    assert_eq!(report.volumes, vec!["agentdeck_artifacts", "agentdeck_postgres"]);
    assert!(report.network_removed);
    assert!(report.failures.is_empty());
    assert!(!runtime.calls().contains(&"volume-rm unrelated_data".to_string()));
    assert_eq!(runtime.calls().last().map(String::as_str), Some("network-rm agents_net"));
}

#[tokio::test]
async fn test_clean_without_compose_project_still_removes_resources() {
    let runtime = MockRuntime::new()
        .listing(vec![summary("1", "agentdeck-hello-1", "running")])
        .with_volumes(&["agentdeck_artifacts"]);
    let reporter = RecordingReporter::default();
    let report = clean_platform::<_, MockCompose>(None, &runtime, &reporter).await;

    assert!(!report.compose_down);
    assert_eq!(report.containers, vec!["agentdeck-hello-1"]);
    assert!(!report.network_removed);
    assert!(report.failures.is_empty());
    assert!(reporter.of_kind("warn").iter().any(|w| w.contains("no compose file")));
}

#[tokio::test]
async fn test_compose_down_failure_is_recorded_and_cleanup_continues() {
    let compose = MockCompose::default().failing("down");
    let runtime = MockRuntime::new().listing(vec![summary("1", "agentdeck-hello-1", "running")]);
    let report = clean_platform(Some(&compose), &runtime, &RecordingReporter::default()).await;

    assert!(!report.compose_down);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.containers, vec!["agentdeck-hello-1"]);
}
