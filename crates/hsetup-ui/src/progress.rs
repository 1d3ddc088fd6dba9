//! Download progress bars.

use crate::printer::Printer;
use indicatif::{ProgressBar, ProgressStyle};

fn style(template: &str, fallback: ProgressStyle) -> ProgressStyle {
    ProgressStyle::with_template(template).unwrap_or(fallback)
}

/// A byte-counting progress bar.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Create a progress bar drawn according to `printer`. A `total` of zero
    /// means the size is unknown and a spinner is shown instead of a bar.
    pub fn new(printer: Printer, total: u64, message: impl Into<String>) -> Self {
        let bar = if total > 0 {
            let bar = ProgressBar::with_draw_target(Some(total), printer.target());
            bar.set_style(
                style(
                    "{msg} [{bar:40.cyan/dim}] {bytes}/{total_bytes}",
                    ProgressStyle::default_bar(),
                )
                .progress_chars("━━─"),
            );
            bar
        } else {
            let bar = ProgressBar::with_draw_target(None, printer.target());
            bar.set_style(
                style("{spinner:.cyan} {msg} {bytes}", ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
            );
            bar
        };
        bar.set_message(message.into());
        Self { bar }
    }

    pub fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    /// Replace the bar with a completion line.
    pub fn finish(self, message: impl Into<String>) {
        self.bar
            .set_style(style("{msg}", ProgressStyle::default_spinner()));
        self.bar.finish_with_message(format!(
            "{} {}",
            console::style("✓").green(),
            message.into()
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_when_silent() {
        let progress = Progress::new(Printer::Silent, 10, "Downloading");
        assert!(progress.bar.is_hidden());
        progress.inc(10);
        progress.finish("done");
    }
}
