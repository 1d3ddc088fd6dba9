//! `hsetup setup`: the default command.

use crate::cli::InputArgs;
use anyhow::Result;
use hsetup_cache::{ToolCache, state_dir, temp_root};
use hsetup_config::{Defaults, Resolved, VersionTable, build_config, load_settings};
use hsetup_core::{CommandRunner, Error, ExitCode, env};
use hsetup_telemetry::TimingGuard;
use hsetup_toolchain::{Host, HttpFetcher, Installer};
use hsetup_ui::{GithubActions, Output, RunnerChannel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Run the setup and apply the exit contract.
///
/// With `RUNNER_DEBUG=1` a failure only sets the `failed` output and the
/// process exits successfully, so test workflows can assert on it.
pub async fn run(inputs: &InputArgs, config_file: Option<&Path>, output: &Output) -> Result<i32> {
    let channel = Arc::new(GithubActions::from_env());
    let start = Instant::now();
    let _timer = TimingGuard::new("setup");

    match setup(inputs, config_file, channel.clone(), output).await {
        Ok(matcher) => {
            debug!("Problem matcher at {}", matcher.display());
            output.success_summary("Haskell toolchain ready", start.elapsed());
            Ok(ExitCode::Success.into())
        }
        Err(err) => report_failure(&err, channel.as_ref(), output),
    }
}

fn report_failure(err: &Error, channel: &dyn RunnerChannel, output: &Output) -> Result<i32> {
    if env::is_runner_debug() {
        channel.set_output("failed", "true")?;
        channel.debug(&err.to_string());
        debug!("setup failed: {err}");
        return Ok(ExitCode::Success.into());
    }

    channel.error(&err.to_string());
    output.print_error(err);
    Ok(ExitCode::for_error(err).into())
}

async fn setup(
    inputs: &InputArgs,
    config_file: Option<&Path>,
    channel: Arc<GithubActions>,
    output: &Output,
) -> hsetup_core::Result<PathBuf> {
    let settings = load_settings(config_file)?;
    let table = Arc::new(VersionTable::embedded()?);
    let host = Host::from_env()?;
    let os = host.os();

    let defaults = Defaults::new(&table, os, &settings.defaults);
    let Resolved { options, notices } = build_config(&defaults, os, &inputs.raw_inputs())?;
    for notice in &notices {
        channel.warning(&notice.to_string());
    }

    let cache = match settings.cache.tool_cache {
        Some(root) => ToolCache::new(root, temp_root(), host.arch()),
        None => ToolCache::from_env(host.arch())?,
    };
    info!("Setting up on {}", host.platform);

    let installer = Installer::new(
        host,
        cache,
        table,
        Arc::new(CommandRunner::new()),
        Arc::new(HttpFetcher::new(output.printer())?),
        channel,
    );

    hsetup_toolchain::setup::run(&installer, &options, &state_dir()?).await
}
