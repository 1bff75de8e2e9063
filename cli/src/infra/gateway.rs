//! HTTP readiness probe for the gateway.

use std::time::Duration;

use crate::application::ports::GatewayProbe;

/// Per-request timeout for a readiness probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// `GatewayProbe` backed by `ureq` on a blocking task.
#[derive(Debug, Clone, Copy)]
pub struct HttpGatewayProbe {
    timeout: Duration,
}

impl Default for HttpGatewayProbe {
    fn default() -> Self {
        Self {
            timeout: PROBE_TIMEOUT,
        }
    }
}

impl GatewayProbe for HttpGatewayProbe {
    async fn is_ready(&self, url: &str) -> bool {
        let url = url.to_string();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || probe(&url, timeout))
            .await
            .unwrap_or(false)
    }
}

/// Any HTTP answer below 500 means the gateway is accepting requests.
fn probe(url: &str, timeout: Duration) -> bool {
    let agent = ureq::AgentBuilder::new().timeout(timeout).build();
    match agent.get(url).call() {
        Ok(_) => true,
        Err(ureq::Error::Status(code, _)) => code < 500,
        Err(e) => {
            tracing::trace!(url, error = %e, "gateway not reachable yet");
            false
        }
    }
}
