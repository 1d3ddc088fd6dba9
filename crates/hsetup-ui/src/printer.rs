//! Controls which kinds of terminal output are shown.

use indicatif::ProgressDrawTarget;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Printer {
    /// Suppress all output.
    Silent,
    /// Errors and the final result only.
    Quiet,
    #[default]
    Normal,
    /// Normal output without progress bars. Used inside CI logs, where
    /// redrawn bars only add noise.
    NoProgress,
    /// Verbose output including debug messages.
    Verbose,
}

impl Printer {
    /// Create a printer from quiet/verbose flags.
    pub fn from_flags(quiet: u8, verbose: bool, in_ci: bool) -> Self {
        if quiet >= 2 {
            Self::Silent
        } else if quiet == 1 {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else if in_ci {
            Self::NoProgress
        } else {
            Self::Normal
        }
    }

    /// Get the progress bar draw target for this printer.
    pub fn target(self) -> ProgressDrawTarget {
        if self.progress_enabled() {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        }
    }

    pub fn stderr_enabled(self) -> bool {
        !matches!(self, Self::Silent)
    }

    pub fn progress_enabled(self) -> bool {
        matches!(self, Self::Normal)
    }

    pub fn is_quiet(self) -> bool {
        matches!(self, Self::Quiet | Self::Silent)
    }
}
