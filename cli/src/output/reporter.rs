//! Service progress printed to the terminal.

use crate::application::ports::ProgressReporter;
use crate::output::{Mark, OutputContext};

/// `ProgressReporter` backed by an `OutputContext`; inherits its `quiet`
/// handling, so only failures survive `--quiet`.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.ctx.line(Mark::Step, message);
    }

    fn success(&self, message: &str) {
        self.ctx.line(Mark::Ok, message);
    }

    fn warn(&self, message: &str) {
        self.ctx.line(Mark::Warn, message);
    }

    fn failure(&self, message: &str) {
        self.ctx.line(Mark::Fail, message);
    }
}
