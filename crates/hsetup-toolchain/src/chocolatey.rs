//! The Chocolatey backend (windows only).

use crate::host::Host;
use crate::probe;
use crate::strategy::StrategyOutcome;
use hsetup_core::{Exec, Tool};
use hsetup_ui::RunnerChannel;
use tracing::warn;

/// Token used to suspend workflow commands while choco runs.
///
/// Old ghc packages emit the removed `add-path` command, which would fail the
/// step.
pub const STOP_TOKEN: &str = "SetupHaskellStopCommands";

/// Arguments passed to powershell for `choco install`.
pub fn install_args(tool: Tool, revision: &str, debug: bool) -> Vec<String> {
    let mut args = vec![
        "choco".to_string(),
        "install".to_string(),
        tool.to_string(),
        "--version".to_string(),
        revision.to_string(),
        "--allow-multiple-versions".to_string(),
    ];
    // ghc packages would otherwise pull in a cabal of their choosing.
    if tool == Tool::Ghc {
        args.push("--ignore-dependencies".to_string());
    }
    args.push("--no-progress".to_string());
    args.push(if debug { "--debug" } else { "--limit-output" }.to_string());
    args
}

/// Install `tool` at `revision`, retrying once with `--pre`.
pub async fn install(
    exec: &dyn Exec,
    channel: &dyn RunnerChannel,
    host: &Host,
    tool: Tool,
    version: &str,
    revision: &str,
) -> StrategyOutcome {
    channel.info(&format!(
        "Attempting to install {tool} {version} using chocolatey"
    ));

    let args = install_args(tool, revision, host.runner_debug);

    channel.stop_commands(STOP_TOKEN);
    let mut result = exec.status("powershell", &args).await;
    if !matches!(result, Ok(0)) {
        let mut pre = args.clone();
        pre.push("--pre".to_string());
        result = exec.status("powershell", &pre).await;
    }
    channel.resume_commands(STOP_TOKEN);

    // ghc has to be on PATH before the probes run.
    if tool == Tool::Ghc {
        if let Some(dir) = probe::chocolatey_path(host, tool, version, revision) {
            if let Err(e) = channel.add_path(&dir) {
                warn!("could not add {} to PATH: {}", dir.display(), e);
            }
        }
    }

    match result {
        Ok(0) => StrategyOutcome::Succeeded,
        Ok(code) => StrategyOutcome::Errored(format!("choco exited with code {code}")),
        Err(e) => StrategyOutcome::Errored(e.to_string()),
    }
}
