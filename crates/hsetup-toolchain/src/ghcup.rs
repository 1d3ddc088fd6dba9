//! The ghcup backend.

use crate::fetch::{self, Fetcher};
use crate::host::Host;
use crate::strategy::{StrategyOutcome, HEAD};
use hsetup_cache::ToolCache;
use hsetup_core::{Arch, Exec, Os, Result, Tool};
use tracing::{debug, info, warn};
use url::Url;

/// Nightly ghc build installed for `ghc-version: head` on linux.
pub const GHC_HEAD_URL: &str = "https://gitlab.haskell.org/ghc/ghc/-/jobs/artifacts/master/raw/ghc-x86_64-deb9-linux-integer-simple.tar.xz?job=validate-x86_64-linux-deb9-integer-simple";

/// Download location of the ghcup binary.
pub fn download_url(version: &str, os: Os, arch: Arch) -> String {
    let platform = match os {
        Os::Darwin => "apple-darwin",
        _ => "linux",
    };
    format!(
        "https://downloads.haskell.org/ghcup/{version}/{}-{platform}-ghcup-{version}",
        arch.triple_name()
    )
}

/// Rolling cabal head release for `os`.
pub fn cabal_head_url(os: Os) -> String {
    let tag = match os {
        Os::Linux => "Linux",
        Os::Darwin => "macOS",
        Os::Windows => "Windows",
    };
    format!(
        "https://github.com/haskell/cabal/releases/download/cabal-head/cabal-head-{tag}-x86_64.tar.gz"
    )
}

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A ghcup executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ghcup {
    bin: String,
}

impl Ghcup {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Program name or path used to invoke ghcup.
    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// Locate or download the pinned ghcup.
    ///
    /// Windows runners ship ghcup on PATH. Elsewhere the binary is taken from
    /// the tool cache, or downloaded and cached.
    pub async fn provision(
        host: &Host,
        cache: &ToolCache,
        fetcher: &dyn Fetcher,
        version: &str,
    ) -> Result<Self> {
        if host.os() == Os::Windows {
            return Ok(Self::new("ghcup"));
        }

        if let Some(dir) = cache.find("ghcup", version) {
            return Ok(Self::new(dir.join("ghcup").display().to_string()));
        }

        let url = download_url(version, host.os(), host.arch());
        info!("Downloading ghcup {} from {}", version, url);
        let slot = cache.allocate_slot()?;
        let downloaded = slot.path().join("ghcup");
        fetcher.download(&url, &downloaded).await?;
        fetch::make_executable(&downloaded)?;

        let dir = cache.cache_file(&downloaded, "ghcup", "ghcup", version)?;
        Ok(Self::new(dir.join("ghcup").display().to_string()))
    }

    async fn run(&self, exec: &dyn Exec, argv: &[&str]) -> Result<i32> {
        exec.status(&self.bin, &args(argv)).await
    }

    pub async fn add_release_channel(&self, exec: &dyn Exec, channel: &Url) -> Result<i32> {
        self.run(exec, &["config", "add-release-channel", channel.as_str()])
            .await
    }

    /// Install and select `version`. cabal head comes from its rolling release.
    pub async fn install(&self, exec: &dyn Exec, tool: Tool, version: &str, os: Os) -> StrategyOutcome {
        if tool == Tool::Cabal && version == HEAD {
            return self.install_from(exec, tool, &cabal_head_url(os)).await;
        }
        self.install_and_set(exec, tool, &["install", tool.as_str(), version], version)
            .await
    }

    /// Install `tool` head from a custom artifact URL.
    pub async fn install_from(&self, exec: &dyn Exec, tool: Tool, url: &str) -> StrategyOutcome {
        self.install_and_set(exec, tool, &["install", tool.as_str(), "-u", url, HEAD], HEAD)
            .await
    }

    async fn install_and_set(
        &self,
        exec: &dyn Exec,
        tool: Tool,
        install: &[&str],
        version: &str,
    ) -> StrategyOutcome {
        match self.run(exec, install).await {
            Ok(0) => {
                if let Err(e) = self.run(exec, &["set", tool.as_str(), version]).await {
                    warn!("ghcup set {} {} could not run: {}", tool, version, e);
                }
                StrategyOutcome::Succeeded
            }
            Ok(code) => StrategyOutcome::Errored(format!("ghcup exited with code {code}")),
            Err(e) => StrategyOutcome::Errored(e.to_string()),
        }
    }

    /// Make `version` the active one. `false` if ghcup refused or could not run.
    pub async fn set(&self, exec: &dyn Exec, tool: Tool, version: &str) -> bool {
        match self.run(exec, &["set", tool.as_str(), version]).await {
            Ok(code) => code == 0,
            Err(e) => {
                debug!("ghcup set failed to run: {}", e);
                false
            }
        }
    }

    /// Clear the active version of `tool`.
    pub async fn unset(&self, exec: &dyn Exec, tool: Tool) {
        if let Err(e) = self.run(exec, &["unset", tool.as_str()]).await {
            warn!("ghcup unset {} could not run: {}", tool, e);
        }
    }

    /// Print where ghcup would put `version`. Diagnostics only.
    pub async fn whereis(&self, exec: &dyn Exec, tool: Tool, version: &str) {
        match self.run(exec, &["whereis", tool.as_str(), version]).await {
            Ok(code) => debug!("ghcup whereis exited with {}", code),
            Err(e) => debug!("ghcup whereis failed to run: {}", e),
        }
    }
}
