//! Raw action inputs and value parsers.

use hsetup_core::{Error, Fix, Result};
use url::Url;

/// Input names as they appear in a workflow's `with:` block.
pub mod names {
    pub const GHC_VERSION: &str = "ghc-version";
    pub const CABAL_VERSION: &str = "cabal-version";
    pub const STACK_VERSION: &str = "stack-version";
    pub const ENABLE_STACK: &str = "enable-stack";
    pub const STACK_NO_GLOBAL: &str = "stack-no-global";
    pub const STACK_SETUP_GHC: &str = "stack-setup-ghc";
    pub const CABAL_UPDATE: &str = "cabal-update";
    pub const GHCUP_RELEASE_CHANNELS: &str = "ghcup-release-channels";
    pub const GHCUP_RELEASE_CHANNEL: &str = "ghcup-release-channel";
    pub const ENABLE_MATCHER: &str = "enable-matcher";
    pub const DISABLE_MATCHER: &str = "disable-matcher";
}

const TRUE_VALUES: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_VALUES: [&str; 3] = ["false", "False", "FALSE"];

/// Unparsed inputs. `None` means the input was not given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawInputs {
    pub ghc_version: Option<String>,
    pub cabal_version: Option<String>,
    pub stack_version: Option<String>,
    pub enable_stack: Option<String>,
    pub stack_no_global: Option<String>,
    pub stack_setup_ghc: Option<String>,
    pub cabal_update: Option<String>,
    pub ghcup_release_channels: Vec<String>,
    pub ghcup_release_channel: Option<String>,
    pub enable_matcher: Option<String>,
    pub disable_matcher: Option<String>,
}

impl RawInputs {
    /// Build inputs from `(name, value)` pairs using the workflow input names.
    ///
    /// Unknown names are ignored. `ghcup-release-channels` is split on newlines.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut inputs = Self::default();
        for (name, value) in pairs {
            let value = Some(value.to_string());
            match name {
                names::GHC_VERSION => inputs.ghc_version = value,
                names::CABAL_VERSION => inputs.cabal_version = value,
                names::STACK_VERSION => inputs.stack_version = value,
                names::ENABLE_STACK => inputs.enable_stack = value,
                names::STACK_NO_GLOBAL => inputs.stack_no_global = value,
                names::STACK_SETUP_GHC => inputs.stack_setup_ghc = value,
                names::CABAL_UPDATE => inputs.cabal_update = value,
                names::GHCUP_RELEASE_CHANNEL => inputs.ghcup_release_channel = value,
                names::ENABLE_MATCHER => inputs.enable_matcher = value,
                names::DISABLE_MATCHER => inputs.disable_matcher = value,
                names::GHCUP_RELEASE_CHANNELS => inputs
                    .ghcup_release_channels
                    .extend(value.iter().flat_map(|v| v.lines()).map(str::to_string)),
                _ => {}
            }
        }
        inputs.normalized()
    }

    /// Trim every value and drop empty ones.
    pub fn normalized(self) -> Self {
        fn clean(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            ghc_version: clean(self.ghc_version),
            cabal_version: clean(self.cabal_version),
            stack_version: clean(self.stack_version),
            enable_stack: clean(self.enable_stack),
            stack_no_global: clean(self.stack_no_global),
            stack_setup_ghc: clean(self.stack_setup_ghc),
            cabal_update: clean(self.cabal_update),
            ghcup_release_channels: self
                .ghcup_release_channels
                .into_iter()
                .flat_map(|v| v.lines().map(str::to_string).collect::<Vec<_>>())
                .filter_map(|v| clean(Some(v)))
                .collect(),
            ghcup_release_channel: clean(self.ghcup_release_channel),
            enable_matcher: clean(self.enable_matcher),
            disable_matcher: clean(self.disable_matcher),
        }
    }
}

/// Parse a boolean following the YAML 1.2 core schema.
///
/// Only `true | True | TRUE | false | False | FALSE` are accepted.
pub fn parse_yaml_boolean(name: &str, value: &str) -> Result<bool> {
    if TRUE_VALUES.contains(&value) {
        return Ok(true);
    }
    if FALSE_VALUES.contains(&value) {
        return Ok(false);
    }
    Err(Error::InvalidInput {
        input: name.to_string(),
        value: value.to_string(),
        reason: format!(
            "does not meet YAML 1.2 \"Core Schema\" specification: got \"{value}\"\n\
             Supported boolean values: `true | True | TRUE | false | False | FALSE`"
        ),
        fixes: vec![Fix::new(format!("Set `{name}` to `true` or `false`"))],
    })
}

/// Parse an optional boolean input, falling back to `default` when unset.
pub fn parse_boolean_input(name: &str, value: Option<&str>, default: bool) -> Result<bool> {
    match value {
        Some(v) => parse_yaml_boolean(name, v),
        None => Ok(default),
    }
}

/// Reconcile a positive option (default `true`) with its legacy negative
/// alias (default `false`) and return the positive value.
pub fn parse_opposite_booleans(
    positive: (&str, Option<&str>),
    negative: (&str, Option<&str>),
) -> Result<bool> {
    let (pos_name, pos_value) = positive;
    let (neg_name, neg_value) = negative;

    match (pos_value, neg_value) {
        (_, None) => parse_boolean_input(pos_name, pos_value, true),
        (None, Some(neg)) => Ok(!parse_yaml_boolean(neg_name, neg)?),
        (Some(pos), Some(neg)) => {
            let pos = parse_yaml_boolean(pos_name, pos)?;
            let neg = parse_yaml_boolean(neg_name, neg)?;
            if pos != neg {
                Ok(pos)
            } else {
                Err(Error::config(format!(
                    "Action input {pos_name}: {pos} contradicts {neg_name}: {neg}"
                )))
            }
        }
    }
}

/// Parse an absolute URL.
pub fn parse_url(name: &str, value: &str) -> Result<Url> {
    Url::parse(value).map_err(|e| Error::InvalidInput {
        input: name.to_string(),
        value: value.to_string(),
        reason: format!("is not a valid URL: \"{value}\" ({e})"),
        fixes: vec![],
    })
}
