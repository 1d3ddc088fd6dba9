//! CLI argument parsing.
//!
//! Every action input can be given as a flag or through the `INPUT_<NAME>`
//! variable the runner sets for a workflow step's `with:` block.

use clap::{Args, Parser, Subcommand};
use hsetup_config::RawInputs;
use hsetup_config::inputs::names;
use hsetup_core::{EnvVars, Os, Tool};
use std::path::PathBuf;

use crate::styles::STYLES;

/// hsetup - set up a Haskell toolchain on a CI runner
#[derive(Parser, Debug)]
#[command(name = "hsetup")]
#[command(author, version, about = "Set up a Haskell toolchain on a CI runner")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(styles = STYLES)]
#[command(after_help = "Without a command, `hsetup` runs `setup`.")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true, env = EnvVars::HSETUP_VERBOSE)]
    pub verbose: bool,

    /// Suppress output (use twice for complete silence)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub quiet: u8,

    /// Path to the settings file
    #[arg(long, global = true, env = EnvVars::HSETUP_CONFIG_FILE)]
    pub config_file: Option<PathBuf>,
}

/// Action inputs. Values are validated by `setup`, not by the parser.
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Action inputs")]
pub struct InputArgs {
    /// Version of ghc to install
    #[arg(long, value_name = "VERSION", env = EnvVars::INPUT_GHC_VERSION)]
    pub ghc_version: Option<String>,

    /// Version of cabal to install
    #[arg(long, value_name = "VERSION", env = EnvVars::INPUT_CABAL_VERSION)]
    pub cabal_version: Option<String>,

    /// Version of stack to install
    #[arg(long, value_name = "VERSION", env = EnvVars::INPUT_STACK_VERSION)]
    pub stack_version: Option<String>,

    /// Install stack
    #[arg(long, value_name = "BOOL", env = EnvVars::INPUT_ENABLE_STACK)]
    pub enable_stack: Option<String>,

    /// Install stack only, without a global ghc or cabal
    #[arg(long, value_name = "BOOL", env = EnvVars::INPUT_STACK_NO_GLOBAL)]
    pub stack_no_global: Option<String>,

    /// Pre-install ghc with `stack setup`
    #[arg(long, value_name = "BOOL", env = EnvVars::INPUT_STACK_SETUP_GHC)]
    pub stack_setup_ghc: Option<String>,

    /// Run `cabal update` after installing cabal
    #[arg(long, value_name = "BOOL", env = EnvVars::INPUT_CABAL_UPDATE)]
    pub cabal_update: Option<String>,

    /// Additional ghcup release channels, one URL per line
    #[arg(long, value_name = "URLS", env = EnvVars::INPUT_GHCUP_RELEASE_CHANNELS)]
    pub ghcup_release_channels: Option<String>,

    /// Deprecated single ghcup release channel
    #[arg(long, value_name = "URL", env = EnvVars::INPUT_GHCUP_RELEASE_CHANNEL)]
    pub ghcup_release_channel: Option<String>,

    /// Announce the ghc problem matcher
    #[arg(long, value_name = "BOOL", env = EnvVars::INPUT_ENABLE_MATCHER)]
    pub enable_matcher: Option<String>,

    /// Do not announce the ghc problem matcher
    #[arg(long, value_name = "BOOL", env = EnvVars::INPUT_DISABLE_MATCHER)]
    pub disable_matcher: Option<String>,
}

impl InputArgs {
    /// Collect the given inputs under their workflow names.
    pub fn raw_inputs(&self) -> RawInputs {
        let pairs = [
            (names::GHC_VERSION, &self.ghc_version),
            (names::CABAL_VERSION, &self.cabal_version),
            (names::STACK_VERSION, &self.stack_version),
            (names::ENABLE_STACK, &self.enable_stack),
            (names::STACK_NO_GLOBAL, &self.stack_no_global),
            (names::STACK_SETUP_GHC, &self.stack_setup_ghc),
            (names::CABAL_UPDATE, &self.cabal_update),
            (names::GHCUP_RELEASE_CHANNELS, &self.ghcup_release_channels),
            (names::GHCUP_RELEASE_CHANNEL, &self.ghcup_release_channel),
            (names::ENABLE_MATCHER, &self.enable_matcher),
            (names::DISABLE_MATCHER, &self.disable_matcher),
        ];
        RawInputs::from_pairs(
            pairs
                .iter()
                .filter_map(|&(name, value)| value.as_deref().map(|v| (name, v))),
        )
        .normalized()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install and configure the requested toolchain (default)
    Setup,

    /// List the supported versions
    Versions {
        /// Only list versions of this tool
        #[arg(long)]
        tool: Option<Tool>,
    },

    /// Show what a version token resolves to
    Resolve {
        /// Tool the token is for (ghc, cabal, stack)
        tool: Tool,

        /// Version token, e.g. `latest` or `9.4`
        token: String,

        /// Operating system to resolve for (defaults to the host)
        #[arg(long)]
        os: Option<Os>,
    },
}
