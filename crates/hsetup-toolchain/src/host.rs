//! Facts about the host captured once at startup.

use hsetup_core::{Arch, EnvVars, Error, Os, Platform, Result};
use std::path::PathBuf;

/// Host layout and runner flags.
///
/// Everything the installer reads from the process environment lives here so
/// that tests can describe a host without touching real variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub platform: Platform,
    pub home: PathBuf,
    pub system_drive: Option<String>,
    pub chocolatey_install: Option<PathBuf>,
    pub chocolatey_tools_location: Option<PathBuf>,
    pub stack_root: Option<String>,
    pub runner_debug: bool,
}

impl Host {
    /// A host with only a platform and home directory.
    pub fn new(platform: Platform, home: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            home: home.into(),
            system_drive: None,
            chocolatey_install: None,
            chocolatey_tools_location: None,
            stack_root: None,
            runner_debug: false,
        }
    }

    /// Capture the current host.
    pub fn from_env() -> Result<Self> {
        let platform = Platform::current().ok_or_else(|| {
            Error::config(format!(
                "unsupported platform {}-{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            ))
        })?;

        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

        let home = var(EnvVars::HOME)
            .map(PathBuf::from)
            .or_else(|| hsetup_cache::home_dir().ok())
            .ok_or_else(|| Error::config("could not determine home directory"))?;

        Ok(Self {
            platform,
            home,
            system_drive: var(EnvVars::SYSTEM_DRIVE),
            chocolatey_install: var(EnvVars::CHOCOLATEY_INSTALL).map(PathBuf::from),
            chocolatey_tools_location: var(EnvVars::CHOCOLATEY_TOOLS_LOCATION).map(PathBuf::from),
            stack_root: var(EnvVars::STACK_ROOT),
            runner_debug: hsetup_core::env::is_runner_debug(),
        })
    }

    pub fn os(&self) -> Os {
        self.platform.os
    }

    pub fn arch(&self) -> Arch {
        self.platform.arch
    }

    /// Directory where ghcup places the binaries it manages.
    pub fn ghcup_bin_dir(&self) -> PathBuf {
        match self.os() {
            Os::Windows => PathBuf::from("C:/ghcup/bin"),
            _ => self.home.join(".ghcup").join("bin"),
        }
    }

    /// Chocolatey's tools directory, `<SystemDrive>\tools` unless overridden.
    pub fn chocolatey_tools(&self) -> PathBuf {
        self.chocolatey_tools_location.clone().unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}\\",
                self.system_drive.as_deref().unwrap_or("C:")
            ))
            .join("tools")
        })
    }

    /// Value for the `stack-root` output.
    pub fn stack_root(&self) -> String {
        match (&self.stack_root, self.os()) {
            (Some(root), _) => root.clone(),
            (None, Os::Windows) => "C:\\sr".to_string(),
            (None, _) => self.home.join(".stack").display().to_string(),
        }
    }

    /// Value for cabal's `store-dir`.
    pub fn cabal_store_dir(&self) -> String {
        match self.os() {
            Os::Windows => "C:\\sr".to_string(),
            _ => self.home.join(".cabal").join("store").display().to_string(),
        }
    }

    /// `~/.cabal/bin`, where `cabal install` puts executables.
    pub fn cabal_bin_dir(&self) -> PathBuf {
        self.home.join(".cabal").join("bin")
    }

    /// File name of an executable on this host.
    pub fn exe_name(&self, name: &str) -> String {
        match self.os() {
            Os::Windows => format!("{name}.exe"),
            _ => name.to_string(),
        }
    }
}
