//! Terminal UI helpers for hsetup.
//!
//! This crate provides consistent output formatting, download progress bars,
//! error display, and the [`RunnerChannel`] through which step output reaches
//! the CI runner.

pub mod output;
pub mod printer;
pub mod progress;
pub mod style;
pub mod workflow;

pub use output::Output;
pub use printer::Printer;
pub use progress::Progress;
pub use style::Style;
pub use workflow::{group, Event, GithubActions, RecordingChannel, RunnerChannel};
