//! hsetup - Haskell toolchain setup for CI runners
//!
//! Installs ghc, cabal and stack at the requested versions and prepares the
//! runner's environment for them.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod styles;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize telemetry
    hsetup_telemetry::init(cli.global.verbose);

    let exit_code = commands::run(cli).await?;

    std::process::exit(exit_code);
}
