//! Installer orchestration.
//!
//! Per tool: check whether the requested version is already usable, and if
//! not, run the selected strategies in order until a check succeeds.
//! Strategy failures are never surfaced on their own; only exhausting every
//! strategy is an error.

use crate::fetch::Fetcher;
use crate::ghcup::{self, Ghcup};
use crate::host::Host;
use crate::probe::{self, ProbeKind};
use crate::strategy::{self, Requirement, Strategy, StrategyKind, StrategyOutcome};
use crate::{apt, chocolatey, stack};
use hsetup_cache::ToolCache;
use hsetup_config::VersionTable;
use hsetup_core::{Arch, Error, Exec, Os, Result, Tool};
use hsetup_ui::RunnerChannel;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use url::Url;

/// Record of a single strategy run. Logged, then dropped.
struct InstallAttempt<'a> {
    tool: Tool,
    version: &'a str,
    os: Os,
    arch: Arch,
    strategy: StrategyKind,
    outcome: StrategyOutcome,
}

/// Installs tools on one host.
pub struct Installer {
    host: Host,
    cache: ToolCache,
    table: Arc<VersionTable>,
    exec: Arc<dyn Exec>,
    fetcher: Arc<dyn Fetcher>,
    channel: Arc<dyn RunnerChannel>,
    ghcup: OnceCell<Ghcup>,
    executables: Mutex<HashMap<Tool, PathBuf>>,
}

impl Installer {
    pub fn new(
        host: Host,
        cache: ToolCache,
        table: Arc<VersionTable>,
        exec: Arc<dyn Exec>,
        fetcher: Arc<dyn Fetcher>,
        channel: Arc<dyn RunnerChannel>,
    ) -> Self {
        Self {
            host,
            cache,
            table,
            exec,
            fetcher,
            channel,
            ghcup: OnceCell::new(),
            executables: Mutex::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn exec(&self) -> &dyn Exec {
        self.exec.as_ref()
    }

    pub fn channel(&self) -> &dyn RunnerChannel {
        self.channel.as_ref()
    }

    /// Program to invoke for an installed tool: the path found when it was
    /// verified, or the bare name.
    pub fn executable(&self, tool: Tool) -> String {
        self.executables
            .lock()
            .ok()
            .and_then(|exes| exes.get(&tool).cloned())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| self.host.exe_name(tool.as_str()))
    }

    /// The pinned ghcup, provisioned on first use.
    pub async fn ghcup(&self) -> Result<&Ghcup> {
        self.ghcup
            .get_or_try_init(|| {
                Ghcup::provision(
                    &self.host,
                    &self.cache,
                    self.fetcher.as_ref(),
                    self.table.ghcup_version(),
                )
            })
            .await
    }

    /// Register extra ghcup release channels, in order.
    pub async fn add_release_channels(&self, channels: &[Url]) -> Result<()> {
        for channel in channels {
            self.channel
                .info(&format!("Adding ghcup release channel: {channel}"));
            let ghcup = self.ghcup().await?;
            let code = ghcup.add_release_channel(self.exec(), channel).await?;
            debug!("add-release-channel exited with {}", code);
        }
        Ok(())
    }

    /// Clear any active ghcup default for `tool` so that a stale version is
    /// never picked up. Only applies to ghcup-managed tools on linux and darwin.
    pub async fn reset_tool(&self, tool: Tool) -> Result<()> {
        if tool == Tool::Stack || self.host.os() == Os::Windows {
            return Ok(());
        }
        let ghcup = self.ghcup().await?;
        ghcup.unset(self.exec(), tool).await;
        Ok(())
    }

    /// Install `tool` at `version` unless it is already usable.
    pub async fn install_tool(&self, tool: Tool, version: &str) -> Result<()> {
        if self.check_installed(tool, version).await? {
            return Ok(());
        }
        self.note_not_cached(tool, version);

        for strategy in strategy::select(self.host.os(), tool, version) {
            let outcome = self.attempt(strategy, tool, version).await;
            let attempt = InstallAttempt {
                tool,
                version,
                os: self.host.os(),
                arch: self.host.arch(),
                strategy: strategy.kind,
                outcome,
            };
            debug!(
                tool = %attempt.tool,
                version = attempt.version,
                os = %attempt.os,
                arch = attempt.arch.as_str(),
                strategy = ?attempt.strategy,
                outcome = ?attempt.outcome,
                "strategy finished"
            );

            if self.check_installed(tool, version).await? {
                return Ok(());
            }
        }

        Err(Error::install_failed(tool, version))
    }

    /// Check whether `version` of `tool` is usable, wiring it up if so.
    pub async fn check_installed(&self, tool: Tool, version: &str) -> Result<bool> {
        if let Some(path) = self.cache.find(tool.as_str(), version) {
            self.success(tool, version, &path)?;
            return Ok(true);
        }

        let revision = self
            .table
            .release_revision(version, tool, self.host.os());
        let probes = probe::probes(&self.host, tool, version, &revision);
        if probes.is_empty() {
            return Ok(false);
        }
        debug!("Probing {} {} at {:?}", tool, version, probes);

        let ghcup = self.ghcup().await?;
        ghcup.whereis(self.exec(), tool, version).await;

        for probe in probes {
            let location = probe.path.display();
            if !probe.path.exists() {
                self.channel.info(&format!(
                    "Failed to access tool {tool} at location {location}"
                ));
                continue;
            }
            self.channel.info(&format!(
                "Succeeded accessing tool {tool} at location {location}"
            ));

            match probe.kind {
                ProbeKind::Unambiguous => {
                    self.success(tool, version, &probe.path)?;
                    return Ok(true);
                }
                ProbeKind::MultiVersion => {
                    if ghcup.set(self.exec(), tool, version).await {
                        self.success(tool, version, &probe.path)?;
                        return Ok(true);
                    }
                    // The wanted version is absent; do not leave another one active.
                    ghcup.unset(self.exec(), tool).await;
                }
            }
        }

        Ok(false)
    }

    async fn attempt(&self, strategy: &Strategy, tool: Tool, version: &str) -> StrategyOutcome {
        if let Some((prerequisite, requirement)) = strategy.prerequisite {
            let ok = apt::install(self.exec(), self.channel(), prerequisite).await;
            if !ok && requirement == Requirement::Required {
                return StrategyOutcome::Declined(format!("{prerequisite:?} could not be installed"));
            }
        }

        match strategy.kind {
            StrategyKind::Ghcup | StrategyKind::GhcupGhcHead => {
                let ghcup = match self.ghcup().await {
                    Ok(ghcup) => ghcup,
                    Err(e) => return StrategyOutcome::Errored(e.to_string()),
                };
                if strategy.kind == StrategyKind::GhcupGhcHead {
                    self.channel
                        .info("Attempting to install ghc head using ghcup");
                    ghcup
                        .install_from(self.exec(), Tool::Ghc, ghcup::GHC_HEAD_URL)
                        .await
                } else {
                    self.channel.info(&format!(
                        "Attempting to install {tool} {version} using ghcup"
                    ));
                    ghcup
                        .install(self.exec(), tool, version, self.host.os())
                        .await
                }
            }
            StrategyKind::Chocolatey => {
                let revision = self.table.release_revision(version, tool, Os::Windows);
                chocolatey::install(
                    self.exec(),
                    self.channel(),
                    &self.host,
                    tool,
                    version,
                    &revision,
                )
                .await
            }
            StrategyKind::StackRelease => {
                match stack::install(
                    self.fetcher.as_ref(),
                    &self.cache,
                    version,
                    self.host.os(),
                    self.host.arch(),
                )
                .await
                {
                    Ok(()) => StrategyOutcome::Succeeded,
                    Err(e) => StrategyOutcome::Errored(e.to_string()),
                }
            }
        }
    }

    fn success(&self, tool: Tool, version: &str, path: &Path) -> Result<()> {
        self.channel.add_path(path)?;

        let name = self.host.exe_name(tool.as_str());
        let exe = which::which_in(&name, Some(path.as_os_str()), path)
            .or_else(|_| which::which(&name))
            .unwrap_or_else(|_| path.join(&name));

        self.channel
            .set_output(&format!("{tool}-path"), &path.display().to_string())?;
        self.channel
            .set_output(&format!("{tool}-exe"), &exe.display().to_string())?;
        if tool == Tool::Stack {
            let root = self.host.stack_root();
            self.channel.set_output("stack-root", &root)?;
            if self.host.os() == Os::Windows {
                self.channel.export_variable("STACK_ROOT", &root)?;
            }
        }
        self.channel
            .set_output(&format!("{tool}-version"), version)?;

        if let Ok(mut exes) = self.executables.lock() {
            exes.insert(tool, exe);
        }

        info!("{} {} ready at {}", tool, version, path.display());
        self.channel.info(&format!(
            "Found {tool} {version} in cache at path {}. Setup successful.",
            path.display()
        ));
        Ok(())
    }

    fn note_not_cached(&self, tool: Tool, version: &str) {
        self.channel.debug(&format!(
            "{tool} {version} was not found in the cache. It will be downloaded.\n\
             If this is unexpected, please check if version {version} is pre-installed.\n\
             The list of pre-installed versions is available from here: \
             https://github.com/actions/runner-images#available-images\n\
             If the list is outdated, please file an issue here: \
             https://github.com/actions/runner-images/issues"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeExec, FakeFetcher, Fixture, Reply};
    use hsetup_ui::Event;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[tokio::test]
    async fn test_cache_hit_short_circuits() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(1));
        let path = fx.seed_cache("ghc", "9.4.8");
        let installer = fx.installer();

        assert!(installer.check_installed(Tool::Ghc, "9.4.8").await.unwrap());
        installer.install_tool(Tool::Ghc, "9.4.8").await.unwrap();

        assert!(fx.exec.calls().is_empty());
        assert!(fx.fetcher.urls().is_empty());
        assert_eq!(fx.channel.paths(), vec![path.clone(), path.clone()]);
        assert_eq!(
            fx.channel.output("ghc-path"),
            Some(path.display().to_string())
        );
        assert_eq!(fx.channel.output("ghc-version").as_deref(), Some("9.4.8"));
    }

    #[tokio::test]
    async fn test_stack_install_is_idempotent() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(0));
        let installer = fx.installer();

        installer.install_tool(Tool::Stack, "2.15.7").await.unwrap();
        installer.install_tool(Tool::Stack, "2.15.7").await.unwrap();

        assert_eq!(
            fx.fetcher.urls(),
            vec![crate::stack::release_url("2.15.7", Os::Linux, Arch::X64)]
        );
        assert!(fx.exec.calls().is_empty());
        assert!(fx.cache.find("stack", "2.15.7").is_some());
        assert_eq!(
            fx.channel.output("stack-root"),
            Some(fx.home().join(".stack").display().to_string())
        );
        assert!(fx.channel.output("stack-exe").unwrap().ends_with("stack"));
    }

    fn scratch_entries(fx: &Fixture) -> usize {
        std::fs::read_dir(fx.dir.path().join("tmp"))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_stack_install_leaves_no_scratch_dirs() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(0));
        fx.installer().install_tool(Tool::Stack, "2.15.7").await.unwrap();

        assert!(fx.cache.find("stack", "2.15.7").is_some());
        assert_eq!(scratch_entries(&fx), 0);
    }

    #[tokio::test]
    async fn test_failed_stack_download_is_install_failure() {
        let fx = Fixture::with_fetcher(Os::Darwin, FakeExec::always(0), FakeFetcher::failing());
        let err = fx
            .installer()
            .install_tool(Tool::Stack, "2.15.7")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All install methods for stack 2.15.7 failed");
        assert_eq!(scratch_entries(&fx), 0);
    }

    #[tokio::test]
    async fn test_ghcup_install_then_verify() {
        let dir = tempfile::TempDir::new().unwrap();
        let home = dir.path().to_path_buf();
        let bin = home.join(".ghcup").join("bin");
        let installed = Arc::new(AtomicBool::new(false));

        let exec = {
            let installed = installed.clone();
            let bin = bin.clone();
            FakeExec::new(move |call| match call.join(" ").as_str() {
                "ghcup install ghc 9.4.8" => {
                    std::fs::create_dir_all(&bin).unwrap();
                    installed.store(true, Ordering::SeqCst);
                    0.into()
                }
                "ghcup set ghc 9.4.8" => Reply::from(if installed.load(Ordering::SeqCst) { 0 } else { 1 }),
                _ => 0.into(),
            })
        };
        let mut fx = Fixture::new(Os::Linux, exec);
        fx.host.home = home;
        let installer = fx.installer();

        installer.install_tool(Tool::Ghc, "9.4.8").await.unwrap();

        assert_eq!(
            fx.exec.calls_to("ghcup"),
            vec![
                "ghcup whereis ghc 9.4.8",
                "ghcup install ghc 9.4.8",
                "ghcup set ghc 9.4.8",
                "ghcup whereis ghc 9.4.8",
                "ghcup set ghc 9.4.8",
            ]
        );
        // ghcup itself is downloaded once and reused.
        assert_eq!(fx.fetcher.urls().len(), 1);
        assert!(fx.fetcher.urls()[0].starts_with("https://downloads.haskell.org/ghcup/"));
        assert_eq!(fx.channel.paths(), vec![bin]);
    }

    #[tokio::test]
    async fn test_stale_ghcup_default_is_unset() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(1));
        std::fs::create_dir_all(fx.host.ghcup_bin_dir()).unwrap();

        let err = fx
            .installer()
            .install_tool(Tool::Cabal, "3.10.3.0")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InstallFailed { tool: Tool::Cabal, .. }));
        let calls = fx.exec.calls_to("ghcup");
        assert_eq!(
            calls
                .iter()
                .filter(|c| *c == "ghcup unset cabal")
                .count(),
            2
        );
        assert!(calls.contains(&"ghcup install cabal 3.10.3.0".to_string()));
        assert!(fx.channel.paths().is_empty());
    }

    #[tokio::test]
    async fn test_windows_tries_chocolatey_then_ghcup() {
        let fx = Fixture::new(Os::Windows, FakeExec::always(1));
        let err = fx
            .installer()
            .install_tool(Tool::Ghc, "7.10.3")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All install methods for ghc 7.10.3 failed");

        let choco = fx.exec.calls_to("powershell");
        assert_eq!(choco.len(), 2);
        assert!(choco[0].contains("--version 7.10.3.1"));
        assert!(!choco[0].ends_with("--pre"));
        assert!(choco[1].ends_with("--pre"));

        let calls = fx.exec.calls();
        let last_choco = calls.iter().rposition(|c| c.starts_with("powershell")).unwrap();
        let ghcup_install = calls
            .iter()
            .position(|c| c == "ghcup install ghc 7.10.3")
            .unwrap();
        assert!(last_choco < ghcup_install);

        let events = fx.channel.events();
        assert!(events.contains(&Event::StopCommands(chocolatey::STOP_TOKEN.to_string())));
        assert!(events.contains(&Event::ResumeCommands(chocolatey::STOP_TOKEN.to_string())));
        // Windows ghcup comes from PATH.
        assert!(fx.fetcher.urls().is_empty());
    }

    #[tokio::test]
    async fn test_windows_chocolatey_install_is_found() {
        let tools = Arc::new(Mutex::new(PathBuf::new()));
        let exec = {
            let tools = tools.clone();
            FakeExec::new(move |call| {
                if call[0] == "powershell" {
                    let bin = tools.lock().unwrap().join("ghc-9.4.8").join("bin");
                    std::fs::create_dir_all(&bin).unwrap();
                    std::fs::write(bin.join("ghc.exe"), b"").unwrap();
                    0.into()
                } else {
                    1.into()
                }
            })
        };
        let fx = Fixture::new(Os::Windows, exec);
        *tools.lock().unwrap() = fx.host.chocolatey_tools();

        fx.installer().install_tool(Tool::Ghc, "9.4.8").await.unwrap();

        let bin = fx.host.chocolatey_tools().join("ghc-9.4.8").join("bin");
        assert_eq!(fx.exec.calls_to("powershell").len(), 1);
        assert!(fx.exec.calls_to("ghcup").iter().all(|c| !c.starts_with("ghcup install")));
        // Added once by the strategy and once on verification.
        assert_eq!(fx.channel.paths(), vec![bin.clone(), bin]);
    }

    #[tokio::test]
    async fn test_head_requires_build_essential() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(1));
        let err = fx
            .installer()
            .install_tool(Tool::Ghc, "head")
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InstallFailed { .. }));
        assert_eq!(fx.exec.calls_to("sudo").len(), 1);
        assert!(fx
            .exec
            .calls_to("ghcup")
            .iter()
            .all(|c| !c.starts_with("ghcup install")));
    }

    #[tokio::test]
    async fn test_ghc_head_uses_nightly_artifact() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(0));
        let _ = fx.installer().install_tool(Tool::Ghc, "head").await;
        assert!(fx
            .exec
            .calls()
            .contains(&format!("ghcup install ghc -u {} head", ghcup::GHC_HEAD_URL)));
    }

    #[tokio::test]
    async fn test_legacy_curses_failure_is_ignored() {
        let exec = FakeExec::new(|call| if call[0] == "sudo" { 1.into() } else { 0.into() });
        let fx = Fixture::new(Os::Linux, exec);
        let _ = fx.installer().install_tool(Tool::Ghc, "8.2.2").await;

        assert_eq!(fx.exec.calls_to("sudo").len(), 2);
        assert!(fx
            .exec
            .calls()
            .contains(&"ghcup install ghc 8.2.2".to_string()));
    }

    #[tokio::test]
    async fn test_reset_tool() {
        let fx = Fixture::new(Os::Darwin, FakeExec::always(0));
        let installer = fx.installer();
        installer.reset_tool(Tool::Ghc).await.unwrap();
        installer.reset_tool(Tool::Stack).await.unwrap();
        assert_eq!(fx.exec.calls_to("ghcup"), vec!["ghcup unset ghc"]);

        let fx = Fixture::new(Os::Windows, FakeExec::always(0));
        fx.installer().reset_tool(Tool::Cabal).await.unwrap();
        assert!(fx.exec.calls().is_empty());
    }

    #[tokio::test]
    async fn test_release_channels_registered_in_order() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(0));
        let channels = vec![
            Url::parse("https://a.example/one.yaml").unwrap(),
            Url::parse("https://b.example/two.yaml").unwrap(),
        ];
        fx.installer().add_release_channels(&channels).await.unwrap();
        assert_eq!(
            fx.exec.calls_to("ghcup"),
            vec![
                "ghcup config add-release-channel https://a.example/one.yaml",
                "ghcup config add-release-channel https://b.example/two.yaml",
            ]
        );
    }
}
