//! Color palette for terminal output.

use owo_colors::Style;

use crate::domain::health::ContainerHealth;

/// Styles used by the renderers. `Styles::plain()` carries no escapes at all.
#[derive(Default, Clone, Copy)]
pub struct Styles {
    pub ok: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub step: Style,
    pub dim: Style,
    pub bold: Style,
    pub section: Style,
    /// Health column of the status table.
    pub healthy: Style,
    pub starting: Style,
    pub unhealthy: Style,
}

impl Styles {
    #[must_use]
    pub fn plain() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn colored() -> Self {
        Self {
            ok: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().blue(),
            step: Style::new().cyan(),
            dim: Style::new().dimmed(),
            bold: Style::new().bold(),
            section: Style::new().bold().underline(),
            healthy: Style::new().green(),
            starting: Style::new().yellow(),
            unhealthy: Style::new().red(),
        }
    }

    /// Style for a health cell; `None` means the container has no healthcheck.
    #[must_use]
    pub fn for_health(&self, health: Option<ContainerHealth>) -> Style {
        match health {
            Some(ContainerHealth::Healthy) => self.healthy,
            Some(ContainerHealth::Starting) => self.starting,
            Some(ContainerHealth::Unhealthy) => self.unhealthy,
            None | Some(ContainerHealth::None) => self.dim,
        }
    }
}
