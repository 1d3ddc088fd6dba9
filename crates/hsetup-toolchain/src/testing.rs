//! Recording fakes for installer tests.

use crate::fetch::Fetcher;
use crate::host::Host;
use crate::installer::Installer;
use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use hsetup_cache::ToolCache;
use hsetup_config::VersionTable;
use hsetup_core::{Arch, CommandOutput, Error, Exec, Os, Platform, Result};
use hsetup_ui::RecordingChannel;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Reply to a faked command.
pub struct Reply {
    pub code: i32,
    pub stdout: String,
}

impl From<i32> for Reply {
    fn from(code: i32) -> Self {
        Self {
            code,
            stdout: String::new(),
        }
    }
}

type Handler = Box<dyn Fn(&[String]) -> Reply + Send + Sync>;

/// Exec that records every call as `program-name arg...` and answers from a
/// handler. The program name is reduced to its file stem.
pub struct FakeExec {
    calls: Mutex<Vec<String>>,
    handler: Handler,
}

impl FakeExec {
    pub fn new(handler: impl Fn(&[String]) -> Reply + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            handler: Box::new(handler),
        }
    }

    /// Every command exits with `code`.
    pub fn always(code: i32) -> Self {
        Self::new(move |_| code.into())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose program is `name`.
    pub fn calls_to(&self, name: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split(' ').next() == Some(name))
            .collect()
    }

    fn call(&self, program: &str, args: &[String]) -> Reply {
        let name = Path::new(program)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string());
        let mut line = vec![name];
        line.extend(args.iter().cloned());
        self.calls.lock().unwrap().push(line.join(" "));
        (self.handler)(&line)
    }
}

#[async_trait]
impl Exec for FakeExec {
    async fn status(&self, program: &str, args: &[String]) -> Result<i32> {
        Ok(self.call(program, args).code)
    }

    async fn output(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let reply = self.call(program, args);
        Ok(CommandOutput {
            exit_code: reply.code,
            stdout: reply.stdout,
            stderr: String::new(),
            duration: Duration::ZERO,
        })
    }
}

/// Fetcher that records URLs. `.tar.gz` URLs produce an archive holding a
/// single `<archive stem>/stack` file; anything else produces a script.
#[derive(Default)]
pub struct FakeFetcher {
    urls: Mutex<Vec<String>>,
    fail: bool,
}

impl FakeFetcher {
    pub fn failing() -> Self {
        Self {
            urls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        if self.fail {
            return Err(Error::Download {
                url: url.to_string(),
                message: "HTTP 404 Not Found".to_string(),
            });
        }

        let file_name = url.rsplit('/').next().unwrap_or("download");
        if let Some(stem) = file_name.strip_suffix(".tar.gz") {
            let encoder = GzEncoder::new(File::create(dest).unwrap(), Compression::fast());
            let mut builder = tar::Builder::new(encoder);
            let body = b"#!/bin/sh\n";
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o755);
            header.set_cksum();
            builder
                .append_data(&mut header, format!("{stem}/stack"), &body[..])
                .unwrap();
            builder.into_inner().unwrap().finish().unwrap();
        } else {
            fs::write(dest, b"#!/bin/sh\n").unwrap();
        }
        Ok(())
    }
}

/// A throwaway host with its own home, cache and recording collaborators.
pub struct Fixture {
    pub dir: TempDir,
    pub host: Host,
    pub cache: ToolCache,
    pub exec: Arc<FakeExec>,
    pub fetcher: Arc<FakeFetcher>,
    pub channel: Arc<RecordingChannel>,
}

impl Fixture {
    pub fn new(os: Os, exec: FakeExec) -> Self {
        Self::with_fetcher(os, exec, FakeFetcher::default())
    }

    pub fn with_fetcher(os: Os, exec: FakeExec, fetcher: FakeFetcher) -> Self {
        let dir = TempDir::new().unwrap();
        let mut host = Host::new(Platform::new(os, Arch::X64), dir.path().join("home"));
        host.chocolatey_tools_location = Some(dir.path().join("tools"));
        host.chocolatey_install = Some(dir.path().join("choco"));
        fs::create_dir_all(&host.home).unwrap();

        let cache = ToolCache::new(dir.path().join("cache"), dir.path().join("tmp"), Arch::X64);

        Self {
            dir,
            host,
            cache,
            exec: Arc::new(exec),
            fetcher: Arc::new(fetcher),
            channel: Arc::new(RecordingChannel::new()),
        }
    }

    pub fn home(&self) -> PathBuf {
        self.host.home.clone()
    }

    pub fn installer(&self) -> Installer {
        Installer::new(
            self.host.clone(),
            self.cache.clone(),
            Arc::new(VersionTable::embedded().unwrap()),
            self.exec.clone(),
            self.fetcher.clone(),
            self.channel.clone(),
        )
    }

    /// Put a completed entry for `tool` in the tool cache.
    pub fn seed_cache(&self, tool: &str, version: &str) -> PathBuf {
        let src = self.dir.path().join(format!("seed-{tool}-{version}"));
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join(tool), b"").unwrap();
        self.cache.cache_dir(&src, tool, version).unwrap()
    }
}
