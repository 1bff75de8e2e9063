//! Pure agent-name validation.

use regex::Regex;
use std::sync::LazyLock;

/// Container-name rule enforced by the Docker daemon. Checked at config load
/// so a bad name fails before anything is pulled.
pub static AGENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_.-]*$").expect("valid regex")
});

/// Returns `true` if `name` can be embedded in a container name.
#[must_use]
pub fn is_valid_agent_name(name: &str) -> bool {
    AGENT_NAME_RE.is_match(name)
}
