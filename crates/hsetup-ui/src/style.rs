//! Styling utilities for terminal output.

use console::{StyledObject, style};
use hsetup_core::env;

/// Style helper for consistent terminal output.
pub struct Style;

impl Style {
    /// Style text as an error (red).
    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red().bold()
    }

    /// Style text as a warning (yellow).
    pub fn warning<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).yellow()
    }

    /// Style text as success (green).
    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    /// Style text as a hint (cyan).
    pub fn info<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan()
    }

    /// Style a command the user can copy.
    pub fn command<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).cyan().bold()
    }

    pub fn dim<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }

    /// Format a duration as `350ms`, `4.2s` or `3.1m`.
    pub fn duration(duration: std::time::Duration) -> String {
        let secs = duration.as_secs_f64();
        if secs < 1.0 {
            format!("{}ms", duration.as_millis())
        } else if secs < 60.0 {
            format!("{secs:.1}s")
        } else {
            format!("{:.1}m", secs / 60.0)
        }
    }
}

/// Check if colors should be used based on environment.
pub fn colors_enabled() -> bool {
    if env::no_color() {
        return false;
    }
    console::Term::stderr().is_term()
}

/// Apply the environment's color preference to `console`.
pub fn init_colors() {
    let enabled = colors_enabled();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}
