//! The resolved configuration consumed by the installer.

use hsetup_core::Tool;
use serde::Serialize;
use url::Url;

/// Version request for a single tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgramOpt {
    /// Whether the tool is installed at all.
    pub enable: bool,
    /// The user's literal request, or the default token.
    pub raw: String,
    /// Outcome of version resolution. Never empty.
    pub resolved: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CabalOpt {
    #[serde(flatten)]
    pub program: ProgramOpt,
    /// Run `cabal update` after installation.
    pub update: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackOpt {
    #[serde(flatten)]
    pub program: ProgramOpt,
    /// Pre-install ghc through `stack setup`.
    pub setup: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GhcupOpt {
    /// Extra release channels, registered in order.
    pub release_channels: Vec<Url>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatcherOpt {
    pub enable: bool,
}

/// Fully resolved and cross-validated configuration.
///
/// Built once by [`build_config`](crate::build_config) and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    pub ghc: ProgramOpt,
    pub cabal: CabalOpt,
    pub stack: StackOpt,
    pub ghcup: GhcupOpt,
    pub matcher: MatcherOpt,
}

impl Options {
    /// The version request for `tool`.
    pub fn program(&self, tool: Tool) -> &ProgramOpt {
        match tool {
            Tool::Ghc => &self.ghc,
            Tool::Cabal => &self.cabal.program,
            Tool::Stack => &self.stack.program,
        }
    }

    /// Enabled tools in installation order.
    pub fn enabled_tools(&self) -> impl Iterator<Item = Tool> + '_ {
        Tool::ALL
            .into_iter()
            .filter(move |tool| self.program(*tool).enable)
    }
}
