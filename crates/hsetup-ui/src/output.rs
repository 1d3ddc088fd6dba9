//! Human-facing output for the hsetup CLI.

use crate::printer::Printer;
use crate::style::Style;
use hsetup_core::error::{Error, Fix};

/// Output handler for consistent CLI output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    printer: Printer,
}

impl Output {
    pub fn new(printer: Printer) -> Self {
        Self { printer }
    }

    pub fn printer(&self) -> Printer {
        self.printer
    }

    pub fn warn(&self, message: &str) {
        if self.printer.stderr_enabled() {
            eprintln!("{}: {}", Style::warning("warning"), message);
        }
    }

    /// Print a structured error with fixes.
    pub fn print_error(&self, error: &Error) {
        if !self.printer.stderr_enabled() {
            return;
        }

        eprintln!();
        match error {
            Error::Inconsistent { violations, .. } => {
                eprintln!(
                    "{}: the action inputs are inconsistent",
                    Style::error("error")
                );
                for violation in violations {
                    eprintln!("  {} {}", Style::dim("-"), violation);
                }
            }
            _ => eprintln!("{}: {}", Style::error("error"), error),
        }

        match error {
            Error::InvalidInput { value, .. } => {
                eprintln!("  {} {:?}", Style::dim("got:"), value);
            }
            Error::Config { path: Some(p), .. } | Error::Io { path: Some(p), .. } => {
                eprintln!("  {} {}", Style::dim("-->"), p.display());
            }
            Error::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                for line in stderr.lines().take(20) {
                    eprintln!("  {} {}", Style::dim("|"), line);
                }
            }
            _ => {}
        }

        let fixes = error.fixes();
        if !fixes.is_empty() {
            eprintln!();
            for fix in fixes {
                self.print_fix(fix);
            }
        }
    }

    /// Print a fix suggestion.
    pub fn print_fix(&self, fix: &Fix) {
        if let Some(ref cmd) = fix.command {
            eprintln!("{}: Run `{}`", Style::info("fix"), Style::command(cmd));
            if fix.description != *cmd {
                eprintln!("      {}", Style::dim(&fix.description));
            }
        } else {
            eprintln!("{}: {}", Style::info("fix"), fix.description);
        }
    }

    /// Print a success summary with duration.
    pub fn success_summary(&self, action: &str, duration: std::time::Duration) {
        if !self.printer.is_quiet() {
            eprintln!(
                "{} {} {}",
                Style::success("✓"),
                action,
                Style::dim(format!("({})", Style::duration(duration)))
            );
        }
    }
}
