//! Command implementations.

mod resolve;
mod setup;
mod versions;

use crate::cli::{Cli, Commands};
use anyhow::Result;
use hsetup_ui::{Output, Printer};

/// Run the CLI command.
pub async fn run(cli: Cli) -> Result<i32> {
    hsetup_ui::style::init_colors();

    let in_ci = std::env::var_os(hsetup_core::EnvVars::GITHUB_ACTIONS).is_some();
    let printer = Printer::from_flags(cli.global.quiet, cli.global.verbose, in_ci);
    let output = Output::new(printer);

    match cli.command {
        None | Some(Commands::Setup) => {
            setup::run(&cli.inputs, cli.global.config_file.as_deref(), &output).await
        }
        Some(Commands::Versions { tool }) => versions::run(tool),
        Some(Commands::Resolve { tool, token, os }) => resolve::run(tool, &token, os, &output),
    }
}
