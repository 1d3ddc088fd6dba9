//! The complete setup run.

use crate::configure;
use crate::installer::Installer;
use hsetup_config::Options;
use hsetup_core::Result;
use hsetup_ui::group;
use std::path::{Path, PathBuf};
use tracing::info;

/// Install every enabled tool, configure the result and announce the
/// problem matcher. Returns the matcher path.
///
/// Stops at the first tool that cannot be installed.
pub async fn run(installer: &Installer, options: &Options, state_dir: &Path) -> Result<PathBuf> {
    let channel = installer.channel();
    channel.info("Preparing to setup a Haskell environment");

    let channels = &options.ghcup.release_channels;
    if !channels.is_empty() {
        group(
            channel,
            "Preparing ghcup environment",
            installer.add_release_channels(channels),
        )
        .await?;
    }

    for tool in options.enabled_tools() {
        let resolved = &options.program(tool).resolved;
        group(
            channel,
            &format!("Preparing {tool} environment"),
            installer.reset_tool(tool),
        )
        .await?;
        group(
            channel,
            &format!("Installing {tool} version {resolved}"),
            installer.install_tool(tool, resolved),
        )
        .await?;
    }

    if options.stack.setup {
        group(
            channel,
            "Pre-installing GHC with stack",
            configure::stack_setup(installer, &options.ghc.resolved),
        )
        .await?;
    }

    if options.cabal.program.enable {
        group(
            channel,
            "Setting up cabal",
            configure::configure_cabal(installer, options),
        )
        .await?;
    }

    let matcher = configure::write_matcher(state_dir)?;
    channel.add_matcher(&matcher);
    info!("Setup complete");
    Ok(matcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeExec, Fixture, Reply};
    use hsetup_config::{build_config, Defaults, DefaultTokens, RawInputs, VersionTable};
    use hsetup_core::{Error, Os};
    use hsetup_ui::Event;
    use std::sync::{Arc, Mutex};

    fn options(os: Os, pairs: &[(&str, &str)]) -> Options {
        let table = VersionTable::embedded().unwrap();
        let defaults = Defaults::new(&table, os, &DefaultTokens::default());
        build_config(&defaults, os, &RawInputs::from_pairs(pairs.iter().copied()))
            .unwrap()
            .options
    }

    /// Exec answering `cabal --help` with `config` on the last line.
    fn cabal_exec(config: Arc<Mutex<PathBuf>>) -> FakeExec {
        FakeExec::new(move |call| {
            if call[0] == "cabal" && call.get(1).map(String::as_str) == Some("--help") {
                Reply {
                    code: 0,
                    stdout: format!(
                        "Usage: cabal [GLOBAL FLAGS]\n\nYou can edit the cabal configuration file to set defaults:\n  {}\n",
                        config.lock().unwrap().display()
                    ),
                }
            } else {
                0.into()
            }
        })
    }

    #[tokio::test]
    async fn test_full_run_with_cached_tools() {
        let config = Arc::new(Mutex::new(PathBuf::new()));
        let fx = Fixture::new(Os::Linux, cabal_exec(config.clone()));
        let config_file = fx.home().join(".cabal").join("config");
        *config.lock().unwrap() = config_file.clone();

        let opts = options(Os::Linux, &[("ghc-version", "7.10.3")]);
        fx.seed_cache("ghc", &opts.ghc.resolved);
        fx.seed_cache("cabal", &opts.cabal.program.resolved);

        let state = fx.dir.path().join("state");
        let matcher = run(&fx.installer(), &opts, &state).await.unwrap();

        let groups = fx.channel.groups();
        assert_eq!(
            groups,
            vec![
                "Preparing ghc environment".to_string(),
                "Installing ghc version 7.10.3".to_string(),
                "Preparing cabal environment".to_string(),
                format!("Installing cabal version {}", opts.cabal.program.resolved),
                "Setting up cabal".to_string(),
            ]
        );

        let store = fx.home().join(".cabal").join("store");
        let content = std::fs::read_to_string(&config_file).unwrap();
        assert_eq!(
            content,
            format!(
                "store-dir: {}\nprogram-default-options\n  ghc-options: -optl-no-pie\n",
                store.display()
            )
        );
        assert_eq!(
            fx.channel.output("cabal-store"),
            Some(store.display().to_string())
        );
        assert!(fx.home().join(".cabal").join("bin").is_dir());
        assert!(fx.channel.paths().contains(&fx.home().join(".cabal").join("bin")));

        let cabal_calls = fx.exec.calls_to("cabal");
        assert_eq!(cabal_calls[0], "cabal user-config init");
        assert_eq!(cabal_calls.last().map(String::as_str), Some("cabal update"));

        assert_eq!(
            fx.channel.events().last(),
            Some(&Event::Matcher(matcher.clone()))
        );
        assert!(matcher.starts_with(&state));
    }

    #[tokio::test]
    async fn test_stack_only_run_skips_cabal() {
        let fx = Fixture::new(Os::Linux, FakeExec::always(0));
        let opts = options(Os::Linux, &[("stack-no-global", "true"), ("stack-setup-ghc", "true")]);
        fx.seed_cache("stack", &opts.stack.program.resolved);

        run(&fx.installer(), &opts, &fx.dir.path().join("state"))
            .await
            .unwrap();

        assert_eq!(
            fx.channel.groups(),
            vec![
                "Preparing stack environment".to_string(),
                format!("Installing stack version {}", opts.stack.program.resolved),
                "Pre-installing GHC with stack".to_string(),
            ]
        );
        assert_eq!(
            fx.exec.calls(),
            vec![format!("stack setup {}", opts.ghc.resolved)]
        );
    }

    #[tokio::test]
    async fn test_first_failed_tool_aborts_run() {
        let fx = Fixture::new(Os::Windows, FakeExec::always(1));
        let opts = options(Os::Windows, &[]);

        let err = run(&fx.installer(), &opts, &fx.dir.path().join("state"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InstallFailed { .. }));
        assert!(fx.exec.calls().iter().all(|c| !c.contains("install cabal")));
        assert!(!fx
            .channel
            .events()
            .iter()
            .any(|e| matches!(e, Event::Matcher(_))));
    }
}
