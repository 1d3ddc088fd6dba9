//! Core types and process execution for hsetup.
//!
//! This crate provides the shared vocabulary used by every other hsetup
//! crate: the tools being installed, the host platform, version ordering,
//! the error taxonomy, and the command execution seam.

pub mod command;
pub mod env;
pub mod error;
pub mod platform;
pub mod tool;
pub mod version;

pub use command::{CommandOutput, CommandRunner, Exec};
pub use env::EnvVars;
pub use error::{Error, ErrorCode, Fix, Result};
pub use platform::{Arch, Os, Platform};
pub use tool::Tool;
pub use version::Version;

/// Exit codes for the hsetup CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    GeneralError = 1,
    /// Usage error (bad arguments)
    UsageError = 2,
    /// Configuration error
    ConfigError = 3,
    /// Toolchain installation error
    ToolchainError = 4,
}

impl ExitCode {
    /// Pick the exit code that corresponds to an error.
    pub fn for_error(error: &Error) -> Self {
        match error.code() {
            ErrorCode::InvalidInput | ErrorCode::ConfigError => ExitCode::ConfigError,
            ErrorCode::InstallFailed | ErrorCode::ToolchainMissing => ExitCode::ToolchainError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
