//! Command execution utilities.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, instrument};

use crate::error::{Error, Fix};

/// Output from a command execution.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// How long the command took
    pub duration: Duration,
}

impl CommandOutput {
    /// Check if the command succeeded.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the installer and external processes.
///
/// Both methods only fail when the process could not be launched; a
/// non-zero exit is reported through the returned code.
#[async_trait]
pub trait Exec: Send + Sync {
    /// Run a command with its output forwarded to the console and return its exit code.
    async fn status(&self, program: &str, args: &[String]) -> Result<i32, Error>;

    /// Run a command and capture its output.
    async fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput, Error>;
}

/// Runs installer commands as child processes of hsetup.
///
/// Stdin is always closed: installers must never wait for a prompt on a
/// runner.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(program: &str, args: &[String]) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        cmd
    }

    /// Run a command and capture output.
    #[instrument(skip(self, args))]
    pub async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, Error> {
        debug!("Running command: {} {}", program, args.join(" "));

        let mut cmd = Self::command(program, args);
        cmd.stdout(Stdio::piped()).stderr(Stdio::piped());

        let start = Instant::now();
        let output = cmd.output().await.map_err(|e| launch_error(program, e))?;
        let duration = start.elapsed();
        let exit_code = output.status.code().unwrap_or(-1);

        debug!(
            exit_code = exit_code,
            duration_ms = duration.as_millis(),
            "Command completed"
        );

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration,
        })
    }

    /// Run a command with its output streamed into the step log.
    #[instrument(skip(self, args))]
    pub async fn run_inherited(&self, program: &str, args: &[String]) -> Result<i32, Error> {
        debug!("Running command: {} {}", program, args.join(" "));

        let mut cmd = Self::command(program, args);
        cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());

        let start = Instant::now();
        let status = cmd.status().await.map_err(|e| launch_error(program, e))?;
        let exit_code = status.code().unwrap_or(-1);

        debug!(
            exit_code = exit_code,
            duration_ms = start.elapsed().as_millis(),
            "Command completed"
        );

        Ok(exit_code)
    }
}

#[async_trait]
impl Exec for CommandRunner {
    async fn status(&self, program: &str, args: &[String]) -> Result<i32, Error> {
        self.run_inherited(program, args).await
    }

    async fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput, Error> {
        self.run(program, args).await
    }
}

/// A program that cannot be started is reported as missing when it does
/// not exist, and as an I/O failure otherwise.
fn launch_error(program: &str, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::ToolchainMissing {
            tool: program.to_string(),
            source: Some(Box::new(e)),
            fixes: vec![Fix::new(format!("Make sure `{program}` is on PATH"))],
        }
    } else {
        Error::Io {
            message: format!("failed to execute {program}"),
            path: None,
            source: e,
        }
    }
}
