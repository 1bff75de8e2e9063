//! Terminal output: styling, human rendering, JSON, spinners and the
//! `ProgressReporter` used by services.

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
pub use styles::Styles;

/// Leading glyph of a one-line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Ok,
    Warn,
    Fail,
    Info,
    Step,
}

impl Mark {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Ok => "✓",
            Self::Warn => "!",
            Self::Fail => "✗",
            Self::Info => "·",
            Self::Step => "→",
        }
    }
}

pub struct OutputContext {
    pub styles: Styles,
    /// stdout is a terminal.
    pub is_tty: bool,
    /// Only failures are printed.
    pub quiet: bool,
}

impl OutputContext {
    /// `no_color` already includes `NO_COLOR`, which clap folds in.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let styles = if no_color || !is_tty {
            Styles::plain()
        } else {
            Styles::colored()
        };
        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Render `msg` behind its glyph, without printing.
    #[must_use]
    pub fn format_line(&self, mark: Mark, msg: &str) -> String {
        let style = match mark {
            Mark::Ok => self.styles.ok,
            Mark::Warn => self.styles.warning,
            Mark::Fail => self.styles.error,
            Mark::Info => self.styles.info,
            Mark::Step => self.styles.step,
        };
        format!("  {} {msg}", mark.glyph().style(style))
    }

    /// Print one marked line. Failures go to stderr and ignore `quiet`.
    pub fn line(&self, mark: Mark, msg: &str) {
        match mark {
            Mark::Fail => eprintln!("{}", self.format_line(mark, msg)),
            _ if self.quiet => {}
            _ => println!("{}", self.format_line(mark, msg)),
        }
    }

    pub fn success(&self, msg: &str) {
        self.line(Mark::Ok, msg);
    }

    pub fn warn(&self, msg: &str) {
        self.line(Mark::Warn, msg);
    }

    pub fn error(&self, msg: &str) {
        self.line(Mark::Fail, msg);
    }

    pub fn info(&self, msg: &str) {
        self.line(Mark::Info, msg);
    }

    /// Section title such as `Agents:`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.section));
        }
    }

    /// Summary row with the label padded to a common width.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {:<20}{value}", key.style(self.styles.dim));
        }
    }
}
