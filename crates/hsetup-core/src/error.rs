//! Error types for hsetup.

use crate::tool::Tool;
use std::path::PathBuf;

/// Result type alias using hsetup Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Error codes for categorizing failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// A single input value could not be parsed
    InvalidInput,
    /// Invalid or contradictory configuration
    ConfigError,
    /// Every install strategy for a tool was exhausted
    InstallFailed,
    /// Tool not found in PATH
    ToolchainMissing,
    /// Download failed
    DownloadFailed,
    /// I/O error
    IoError,
    /// Command execution failed
    CommandFailed,
}

/// A fix suggestion for an error.
#[derive(Debug, Clone)]
pub struct Fix {
    /// Description of what this fix does
    pub description: String,
    /// Command to run, if applicable
    pub command: Option<String>,
}

impl Fix {
    /// Create a fix with just a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: None,
        }
    }

    /// Create a fix with a command.
    pub fn with_command(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: Some(command.into()),
        }
    }
}

/// Structured error type for hsetup.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A malformed individual value (boolean literal, URL).
    #[error("Action input \"{input}\" {reason}")]
    InvalidInput {
        input: String,
        value: String,
        reason: String,
        fixes: Vec<Fix>,
    },

    /// Every violated cross-field constraint, reported together.
    #[error("{}", .violations.join("\n"))]
    Inconsistent {
        violations: Vec<String>,
        fixes: Vec<Fix>,
    },

    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        fixes: Vec<Fix>,
    },

    #[error("All install methods for {tool} {version} failed")]
    InstallFailed {
        tool: Tool,
        version: String,
        fixes: Vec<Fix>,
    },

    #[error("toolchain not found: {tool}")]
    ToolchainMissing {
        tool: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        fixes: Vec<Fix>,
    },

    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("command failed: {command}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        fixes: Vec<Fix>,
    },

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidInput { .. } => ErrorCode::InvalidInput,
            Error::Inconsistent { .. } | Error::Config { .. } => ErrorCode::ConfigError,
            Error::InstallFailed { .. } => ErrorCode::InstallFailed,
            Error::ToolchainMissing { .. } => ErrorCode::ToolchainMissing,
            Error::Download { .. } => ErrorCode::DownloadFailed,
            Error::CommandFailed { .. } => ErrorCode::CommandFailed,
            Error::Io { .. } | Error::Other(_) => ErrorCode::IoError,
        }
    }

    /// Get suggested fixes for this error.
    pub fn fixes(&self) -> &[Fix] {
        match self {
            Error::InvalidInput { fixes, .. }
            | Error::Inconsistent { fixes, .. }
            | Error::Config { fixes, .. }
            | Error::InstallFailed { fixes, .. }
            | Error::ToolchainMissing { fixes, .. }
            | Error::CommandFailed { fixes, .. } => fixes,
            Error::Download { .. } | Error::Io { .. } | Error::Other(_) => &[],
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            path: None,
            source: None,
            fixes: vec![],
        }
    }

    /// Create an I/O error with a path.
    pub fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            message: message.into(),
            path: Some(path.into()),
            source,
        }
    }

    /// The terminating error raised once every strategy for a tool is exhausted.
    pub fn install_failed(tool: Tool, version: impl Into<String>) -> Self {
        let version = version.into();
        Error::InstallFailed {
            tool,
            fixes: vec![Fix::with_command(
                format!("Check that {tool} {version} is available for this platform"),
                format!("hsetup versions --tool {tool}"),
            )],
            version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistent_lists_every_violation() {
        let err = Error::Inconsistent {
            violations: vec!["first".into(), "second".into()],
            fixes: vec![],
        };
        assert_eq!(err.to_string(), "first\nsecond");
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[test]
    fn test_install_failed_message() {
        let err = Error::install_failed(Tool::Cabal, "3.10.1.0");
        assert_eq!(
            err.to_string(),
            "All install methods for cabal 3.10.1.0 failed"
        );
        assert_eq!(err.fixes().len(), 1);
    }

    #[test]
    fn test_invalid_input_names_field() {
        let err = Error::InvalidInput {
            input: "cabal-update".into(),
            value: "yes".into(),
            reason: "is not a boolean".into(),
            fixes: vec![],
        };
        assert!(err.to_string().contains("cabal-update"));
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }
}
