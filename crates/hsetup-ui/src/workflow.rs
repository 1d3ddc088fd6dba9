//! Communication with the CI runner.
//!
//! Step output, outputs, PATH additions and exported variables all go
//! through [`RunnerChannel`]. [`GithubActions`] speaks the GitHub Actions
//! workflow-command protocol; [`RecordingChannel`] keeps everything in memory.

use hsetup_core::{EnvVars, Error, Result};
use std::fs::OpenOptions;
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Sink for everything the runner should see.
pub trait RunnerChannel: Send + Sync {
    /// Plain log line.
    fn info(&self, message: &str);

    /// Log line only shown when step debugging is on.
    fn debug(&self, message: &str);

    /// Warning annotation.
    fn warning(&self, message: &str);

    /// Error annotation. Does not fail the step by itself.
    fn error(&self, message: &str);

    /// Start a collapsible log group.
    fn start_group(&self, name: &str);

    fn end_group(&self);

    /// Set a step output.
    fn set_output(&self, name: &str, value: &str) -> Result<()>;

    /// Prepend a directory to PATH for later steps.
    fn add_path(&self, dir: &Path) -> Result<()>;

    /// Export an environment variable to later steps.
    fn export_variable(&self, name: &str, value: &str) -> Result<()>;

    /// Stop processing workflow commands until `resume_commands(token)`.
    fn stop_commands(&self, token: &str);

    fn resume_commands(&self, token: &str);

    /// Register a problem matcher file.
    fn add_matcher(&self, path: &Path);
}

/// Run `fut` inside a log group.
pub async fn group<T, F>(channel: &dyn RunnerChannel, name: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    channel.start_group(name);
    let result = fut.await;
    channel.end_group();
    result
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_property(value: &str) -> String {
    escape_data(value).replace(':', "%3A").replace(',', "%2C")
}

/// GitHub Actions runner.
///
/// File commands are used when the runner provides the files; otherwise the
/// legacy stdout commands are printed.
#[derive(Debug, Clone, Default)]
pub struct GithubActions {
    output_file: Option<PathBuf>,
    path_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
    debug: bool,
}

static DELIMITER_SEQ: AtomicU64 = AtomicU64::new(0);

impl GithubActions {
    /// Read the runner's file locations and debug flag from the environment.
    pub fn from_env() -> Self {
        let file = |name: &str| {
            std::env::var_os(name)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
        };
        Self {
            output_file: file(EnvVars::GITHUB_OUTPUT),
            path_file: file(EnvVars::GITHUB_PATH),
            env_file: file(EnvVars::GITHUB_ENV),
            debug: hsetup_core::env::is_runner_debug(),
        }
    }

    pub fn with_files(
        output_file: impl Into<PathBuf>,
        path_file: impl Into<PathBuf>,
        env_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            output_file: Some(output_file.into()),
            path_file: Some(path_file.into()),
            env_file: Some(env_file.into()),
            debug: false,
        }
    }

    fn command(&self, name: &str, properties: &[(&str, &str)], message: &str) {
        let props = properties
            .iter()
            .map(|(k, v)| format!("{k}={}", escape_property(v)))
            .collect::<Vec<_>>()
            .join(",");
        if props.is_empty() {
            println!("::{name}::{}", escape_data(message));
        } else {
            println!("::{name} {props}::{}", escape_data(message));
        }
    }

    fn append(file: &Path, content: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file)
            .map_err(|e| Error::io("failed to open runner file", file, e))?;
        f.write_all(content.as_bytes())
            .map_err(|e| Error::io("failed to write runner file", file, e))
    }

    /// `name<<delimiter` block, safe for multi-line values.
    fn key_value(name: &str, value: &str) -> Result<String> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let seq = DELIMITER_SEQ.fetch_add(1, Ordering::Relaxed);
        let delimiter = format!("ghadelimiter_{nanos}_{seq}");
        if name.contains(&delimiter) || value.contains(&delimiter) {
            return Err(Error::config(format!(
                "value for {name} contains the file command delimiter"
            )));
        }
        Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
    }
}

impl RunnerChannel for GithubActions {
    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn debug(&self, message: &str) {
        self.command("debug", &[], message);
    }

    fn warning(&self, message: &str) {
        self.command("warning", &[], message);
    }

    fn error(&self, message: &str) {
        self.command("error", &[], message);
    }

    fn start_group(&self, name: &str) {
        self.command("group", &[], name);
    }

    fn end_group(&self) {
        self.command("endgroup", &[], "");
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        match &self.output_file {
            Some(file) => Self::append(file, &Self::key_value(name, value)?),
            None => {
                println!();
                self.command("set-output", &[("name", name)], value);
                Ok(())
            }
        }
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        let dir = dir.display().to_string();
        match &self.path_file {
            Some(file) => Self::append(file, &format!("{dir}\n")),
            None => {
                self.command("add-path", &[], &dir);
                Ok(())
            }
        }
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        match &self.env_file {
            Some(file) => Self::append(file, &Self::key_value(name, value)?),
            None => {
                self.command("set-env", &[("name", name)], value);
                Ok(())
            }
        }
    }

    fn stop_commands(&self, token: &str) {
        println!("::stop-commands::{token}");
    }

    fn resume_commands(&self, token: &str) {
        println!("::{token}::");
    }

    fn add_matcher(&self, path: &Path) {
        self.command("add-matcher", &[], &path.display().to_string());
        if self.debug {
            self.command("debug", &[], &format!("matcher file: {}", path.display()));
        }
    }
}

/// Something sent to a [`RecordingChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Info(String),
    Debug(String),
    Warning(String),
    Error(String),
    StartGroup(String),
    EndGroup,
    Output(String, String),
    Path(PathBuf),
    Export(String, String),
    StopCommands(String),
    ResumeCommands(String),
    Matcher(PathBuf),
}

/// In-memory channel.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    events: Mutex<Vec<Event>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// The last value set for output `name`.
    pub fn output(&self, name: &str) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Output(n, v) if n == name => Some(v),
            _ => None,
        })
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Path(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    pub fn groups(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::StartGroup(name) => Some(name),
                _ => None,
            })
            .collect()
    }
}

impl RunnerChannel for RecordingChannel {
    fn info(&self, message: &str) {
        self.push(Event::Info(message.to_string()));
    }

    fn debug(&self, message: &str) {
        self.push(Event::Debug(message.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(Event::Warning(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Event::Error(message.to_string()));
    }

    fn start_group(&self, name: &str) {
        self.push(Event::StartGroup(name.to_string()));
    }

    fn end_group(&self) {
        self.push(Event::EndGroup);
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.push(Event::Output(name.to_string(), value.to_string()));
        Ok(())
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        self.push(Event::Path(dir.to_path_buf()));
        Ok(())
    }

    fn export_variable(&self, name: &str, value: &str) -> Result<()> {
        self.push(Event::Export(name.to_string(), value.to_string()));
        Ok(())
    }

    fn stop_commands(&self, token: &str) {
        self.push(Event::StopCommands(token.to_string()));
    }

    fn resume_commands(&self, token: &str) {
        self.push(Event::ResumeCommands(token.to_string()));
    }

    fn add_matcher(&self, path: &Path) {
        self.push(Event::Matcher(path.to_path_buf()));
    }
}
