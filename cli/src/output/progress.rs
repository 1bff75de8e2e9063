//! Spinners for the few waits that print nothing on their own.

#![allow(clippy::expect_used)] // Templates are compile-time constants

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::output::OutputContext;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Create a spinner for indeterminate progress.
///
/// # Panics
///
/// Never in practice: the template is a constant.
#[must_use]
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(TICKS)
            .template("  {spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Await `fut` behind a spinner that is cleared once it resolves.
///
/// No spinner is drawn when stdout is not a terminal or output is quiet.
pub async fn while_waiting<F: Future>(ctx: &OutputContext, msg: &str, fut: F) -> F::Output {
    let pb = ctx.show_progress().then(|| spinner(msg));
    let out = fut.await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    out
}
