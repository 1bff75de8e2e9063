//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries the output context, the captured environment, and
//! the interactivity flags so command signatures stay small. Adding a new
//! cross-cutting concern requires only one field change here.

use anyhow::{Context, Result, ensure};
use console::Term;

use crate::domain::env::EnvSnapshot;
use crate::infra::fs::OsFs;
use crate::output::OutputContext;
use crate::output::human::HumanRenderer;
use crate::output::reporter::TerminalReporter;

/// Environment variables that switch off interactive prompts.
pub const NON_INTERACTIVE_ENV: &[&str] = &["CI", "AGENTDECK_YES"];

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Answer yes to confirmations and skip prompts.
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Process environment captured after `.env` loading.
    pub env: EnvSnapshot,
    pub fs: OsFs,
    /// `--yes` was passed: confirmations are accepted without asking.
    pub assume_yes: bool,
    /// Never prompt. Set by `--yes`, `CI`, or `AGENTDECK_YES`.
    pub non_interactive: bool,
}

impl AppContext {
    #[must_use]
    pub fn new(flags: &AppFlags, env: EnvSnapshot) -> Self {
        let env_says_batch = NON_INTERACTIVE_ENV.iter().any(|k| env.get(k).is_some());
        Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            assume_yes: flags.behaviour.yes,
            non_interactive: flags.behaviour.yes || env_says_batch,
            env,
            fs: OsFs,
        }
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Whether prompts can be shown.
    #[must_use]
    pub fn can_prompt(&self) -> bool {
        !self.non_interactive && Term::stderr().is_term()
    }

    /// Ask the user for confirmation.
    ///
    /// `--yes` answers `true`; other non-interactive modes return `default`
    /// without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        if !self.can_prompt() {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("reading confirmation")?;
        Ok(confirmed)
    }

    /// Prompt for a line of text with a default.
    ///
    /// # Errors
    ///
    /// Returns an error when prompting is not possible or the prompt fails.
    pub fn input(&self, prompt: &str, default: &str) -> Result<String> {
        ensure!(self.can_prompt(), "cannot prompt for '{prompt}' in non-interactive mode");
        dialoguer::Input::<String>::new()
            .with_prompt(prompt)
            .default(default.to_string())
            .interact_text()
            .context("reading input")
    }

    /// Prompt for a secret. An empty answer yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error when prompting is not possible or the prompt fails.
    pub fn secret(&self, prompt: &str) -> Result<Option<String>> {
        ensure!(self.can_prompt(), "cannot prompt for '{prompt}' in non-interactive mode");
        let value = dialoguer::Password::new()
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()
            .context("reading secret")?;
        Ok((!value.trim().is_empty()).then(|| value.trim().to_string()))
    }
}
