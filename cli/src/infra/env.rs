//! Capture of the process environment.

use crate::domain::env::EnvSnapshot;

/// Snapshot of the current process environment. Non-UTF-8 entries are skipped.
#[must_use]
pub fn process_env() -> EnvSnapshot {
    std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect()
}
