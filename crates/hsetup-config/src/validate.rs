//! Configuration validation.
//!
//! Turns defaults and raw inputs into [`Options`]. Malformed values fail
//! immediately; cross-field contradictions are collected and reported in a
//! single [`Error::Inconsistent`].

use crate::inputs::{self, names, RawInputs};
use crate::options::{CabalOpt, GhcupOpt, MatcherOpt, Options, ProgramOpt, StackOpt};
use crate::resolve::resolve;
use crate::settings::DefaultTokens;
use crate::versions::VersionTable;
use hsetup_core::{Error, Fix, Os, Result, Tool};
use tracing::{debug, warn};
use url::Url;

/// Default version for a tool together with its supported list.
#[derive(Debug, Clone)]
pub struct DefaultVersion {
    pub version: String,
    pub supported: Vec<String>,
}

/// Per-tool defaults used when an input is absent.
#[derive(Debug, Clone)]
pub struct Defaults {
    pub ghc: DefaultVersion,
    pub cabal: DefaultVersion,
    pub stack: DefaultVersion,
}

impl Defaults {
    /// Resolve the default tokens against the table.
    pub fn new(table: &VersionTable, os: Os, tokens: &DefaultTokens) -> Self {
        let make = |tool: Tool| {
            let token = tokens.get(tool);
            DefaultVersion {
                version: resolve(token, table.supported(tool), tool, os, false),
                supported: table.supported(tool).to_vec(),
            }
        };
        Self {
            ghc: make(Tool::Ghc),
            cabal: make(Tool::Cabal),
            stack: make(Tool::Stack),
        }
    }

    fn get(&self, tool: Tool) -> &DefaultVersion {
        match tool {
            Tool::Ghc => &self.ghc,
            Tool::Cabal => &self.cabal,
            Tool::Stack => &self.stack,
        }
    }
}

/// Something the caller should surface to the user without failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Deprecated {
        input: &'static str,
        replacement: &'static str,
    },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::Deprecated { input, replacement } => write!(
                f,
                "Action input `{input}` is deprecated, use `{replacement}` instead"
            ),
        }
    }
}

/// Outcome of [`build_config`].
#[derive(Debug, Clone)]
pub struct Resolved {
    pub options: Options,
    pub notices: Vec<Notice>,
}

/// Validate `inputs` and resolve every tool's version.
pub fn build_config(defaults: &Defaults, os: Os, inputs: &RawInputs) -> Result<Resolved> {
    debug!("Inputs are: {:?}", inputs);

    let ghc_version = inputs.ghc_version.as_deref();
    let cabal_version = inputs.cabal_version.as_deref();
    let stack_version = inputs.stack_version.as_deref();

    let stack_no_global = inputs::parse_boolean_input(
        names::STACK_NO_GLOBAL,
        inputs.stack_no_global.as_deref(),
        false,
    )?;
    let stack_setup_ghc = inputs::parse_boolean_input(
        names::STACK_SETUP_GHC,
        inputs.stack_setup_ghc.as_deref(),
        false,
    )?;
    let stack_default = stack_no_global || stack_setup_ghc || stack_version.is_some();
    let stack_enable = inputs::parse_boolean_input(
        names::ENABLE_STACK,
        inputs.enable_stack.as_deref(),
        stack_default,
    )?;
    let ghc_enable = !stack_no_global;
    let cabal_enable = !stack_no_global;
    let cabal_update = inputs::parse_boolean_input(
        names::CABAL_UPDATE,
        inputs.cabal_update.as_deref(),
        cabal_enable,
    )?;
    let matcher_enable = inputs::parse_opposite_booleans(
        (names::ENABLE_MATCHER, inputs.enable_matcher.as_deref()),
        (names::DISABLE_MATCHER, inputs.disable_matcher.as_deref()),
    )?;

    let mut release_channels = inputs
        .ghcup_release_channels
        .iter()
        .map(|raw| inputs::parse_url(names::GHCUP_RELEASE_CHANNELS, raw))
        .collect::<Result<Vec<Url>>>()?;
    let legacy_channel = inputs
        .ghcup_release_channel
        .as_deref()
        .map(|raw| inputs::parse_url(names::GHCUP_RELEASE_CHANNEL, raw))
        .transpose()?;

    let mut violations = Vec::new();
    if !stack_enable {
        if stack_no_global {
            violations
                .push("Action input `enable-stack: false` contradicts `stack-no-global: true`".to_string());
        }
        if stack_setup_ghc {
            violations
                .push("Action input `enable-stack: false` contradicts `stack-setup-ghc: true`".to_string());
        }
        if stack_version.is_some() {
            violations.push(
                "Action input `enable-stack: false` contradicts setting `stack-version`".to_string(),
            );
        }
    }
    if stack_no_global {
        if ghc_version.is_some() {
            violations.push(
                "Action input `stack-no-global: true` contradicts setting `ghc-version`".to_string(),
            );
        }
        if cabal_version.is_some() {
            violations.push(
                "Action input `stack-no-global: true` contradicts setting `cabal-version`"
                    .to_string(),
            );
        }
    }
    if !violations.is_empty() {
        return Err(Error::Inconsistent {
            violations,
            fixes: vec![Fix::new(
                "Remove the conflicting inputs from the workflow step's `with:` block",
            )],
        });
    }

    let program = |tool: Tool, requested: Option<&str>, enable: bool| {
        let default = defaults.get(tool);
        let raw = requested.unwrap_or(&default.version).to_string();
        let resolved = resolve(&raw, &default.supported, tool, os, enable);
        ProgramOpt {
            enable,
            raw,
            resolved,
        }
    };

    let mut notices = Vec::new();
    if let Some(channel) = legacy_channel {
        warn!(
            "Action input `{}` is deprecated, use `{}` instead",
            names::GHCUP_RELEASE_CHANNEL,
            names::GHCUP_RELEASE_CHANNELS
        );
        notices.push(Notice::Deprecated {
            input: names::GHCUP_RELEASE_CHANNEL,
            replacement: names::GHCUP_RELEASE_CHANNELS,
        });
        release_channels.push(channel);
    }

    let options = Options {
        ghc: program(Tool::Ghc, ghc_version, ghc_enable),
        cabal: CabalOpt {
            program: program(Tool::Cabal, cabal_version, cabal_enable),
            update: cabal_update,
        },
        stack: StackOpt {
            program: program(Tool::Stack, stack_version, stack_enable),
            setup: stack_setup_ghc,
        },
        ghcup: GhcupOpt { release_channels },
        matcher: MatcherOpt {
            enable: matcher_enable,
        },
    };

    match serde_json::to_string(&options) {
        Ok(json) => debug!("Options are: {json}"),
        Err(e) => debug!("Options could not be serialized: {e}"),
    }

    Ok(Resolved { options, notices })
}
