//! Logging setup and timing for hsetup.
//!
//! Logs go to stderr so that stdout stays reserved for workflow commands.

use hsetup_core::{env, EnvVars};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose || env::is_runner_debug() {
        "hsetup=debug"
    } else {
        "hsetup=info"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. `HSETUP_LOG_JSON` switches to
/// JSON lines.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let subscriber = tracing_subscriber::registry().with(filter);

    if std::env::var_os(EnvVars::HSETUP_LOG_JSON).is_some() {
        let json_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);

        let _ = subscriber.with(json_layer).try_init();
    } else {
        let fmt_layer = fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(!env::no_color())
            .with_target(false)
            .without_time();

        let _ = subscriber.with(fmt_layer).try_init();
    }
}

/// Logs how long an operation took when dropped.
pub struct TimingGuard {
    name: String,
    start: std::time::Instant,
}

impl TimingGuard {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = %self.name,
            duration_ms = duration.as_millis() as u64,
            "Operation completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_directive() {
        assert_eq!(default_directive(true), "hsetup=debug");
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init(false);
        init(true);
        let _guard = TimingGuard::new("noop");
    }
}
