//! Environment variable constants for hsetup.
//!
//! This module defines all environment variables that hsetup recognizes,
//! providing a single source of truth for environment configuration.

/// Environment variable names used by hsetup.
pub struct EnvVars;

impl EnvVars {
    // ─── Global Settings ─────────────────────────────────────────────────────

    /// Path to the hsetup configuration file.
    pub const HSETUP_CONFIG_FILE: &'static str = "HSETUP_CONFIG_FILE";

    /// Enable verbose output.
    pub const HSETUP_VERBOSE: &'static str = "HSETUP_VERBOSE";

    /// Enable JSON log output.
    pub const HSETUP_LOG_JSON: &'static str = "HSETUP_LOG_JSON";

    // ─── Action Inputs ───────────────────────────────────────────────────────
    //
    // The runner exposes `with:` inputs as `INPUT_<NAME>` with the name
    // upper-cased and hyphens preserved.

    pub const INPUT_GHC_VERSION: &'static str = "INPUT_GHC-VERSION";
    pub const INPUT_CABAL_VERSION: &'static str = "INPUT_CABAL-VERSION";
    pub const INPUT_STACK_VERSION: &'static str = "INPUT_STACK-VERSION";
    pub const INPUT_ENABLE_STACK: &'static str = "INPUT_ENABLE-STACK";
    pub const INPUT_STACK_NO_GLOBAL: &'static str = "INPUT_STACK-NO-GLOBAL";
    pub const INPUT_STACK_SETUP_GHC: &'static str = "INPUT_STACK-SETUP-GHC";
    pub const INPUT_CABAL_UPDATE: &'static str = "INPUT_CABAL-UPDATE";
    pub const INPUT_GHCUP_RELEASE_CHANNELS: &'static str = "INPUT_GHCUP-RELEASE-CHANNELS";
    pub const INPUT_GHCUP_RELEASE_CHANNEL: &'static str = "INPUT_GHCUP-RELEASE-CHANNEL";
    pub const INPUT_ENABLE_MATCHER: &'static str = "INPUT_ENABLE-MATCHER";
    pub const INPUT_DISABLE_MATCHER: &'static str = "INPUT_DISABLE-MATCHER";

    // ─── Runner Files and Flags ──────────────────────────────────────────────

    /// File receiving `name=value` step outputs.
    pub const GITHUB_OUTPUT: &'static str = "GITHUB_OUTPUT";

    /// File receiving directories to prepend to PATH.
    pub const GITHUB_PATH: &'static str = "GITHUB_PATH";

    /// File receiving exported environment variables.
    pub const GITHUB_ENV: &'static str = "GITHUB_ENV";

    /// Set to `1` when step debug logging is enabled.
    pub const RUNNER_DEBUG: &'static str = "RUNNER_DEBUG";

    /// Root of the runner's tool cache.
    pub const RUNNER_TOOL_CACHE: &'static str = "RUNNER_TOOL_CACHE";

    /// Runner scratch directory.
    pub const RUNNER_TEMP: &'static str = "RUNNER_TEMP";

    // ─── Host Layout ─────────────────────────────────────────────────────────

    /// Standard HOME environment variable.
    pub const HOME: &'static str = "HOME";

    /// Windows system drive, e.g. `C:`.
    pub const SYSTEM_DRIVE: &'static str = "SystemDrive";

    /// Chocolatey installation root.
    pub const CHOCOLATEY_INSTALL: &'static str = "ChocolateyInstall";

    /// Chocolatey tools location (defaults to `<SystemDrive>\tools`).
    pub const CHOCOLATEY_TOOLS_LOCATION: &'static str = "ChocolateyToolsLocation";

    /// Stack root directory.
    pub const STACK_ROOT: &'static str = "STACK_ROOT";

    // ─── Standard Environment Variables ──────────────────────────────────────

    /// Standard NO_COLOR environment variable.
    pub const NO_COLOR: &'static str = "NO_COLOR";

    /// Standard CLICOLOR environment variable.
    pub const CLICOLOR: &'static str = "CLICOLOR";

    /// GitHub Actions indicator.
    pub const GITHUB_ACTIONS: &'static str = "GITHUB_ACTIONS";
}

/// Check if the runner requested debug logging.
pub fn is_runner_debug() -> bool {
    std::env::var(EnvVars::RUNNER_DEBUG)
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// Check if colors should be disabled based on environment.
pub fn no_color() -> bool {
    std::env::var(EnvVars::NO_COLOR).is_ok()
        || std::env::var(EnvVars::CLICOLOR)
            .map(|v| v == "0")
            .unwrap_or(false)
}
