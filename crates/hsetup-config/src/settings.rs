//! Optional settings file.
//!
//! Stored at `~/.config/hsetup/config.toml` (or the platform equivalent) or
//! at the path given with `--config-file`. It supplies default version tokens
//! and an alternative tool cache location. Explicit inputs always win.
//!
//! ```toml
//! [defaults]
//! ghc = "9.6"
//! cabal = "latest"
//!
//! [cache]
//! tool-cache = "/opt/hostedtoolcache"
//! ```

use crate::combine::Combine;
use crate::resolve::LATEST;
use hsetup_core::{Error, Result, Tool};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Version tokens used when a version input is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefaultTokens {
    pub ghc: Option<String>,
    pub cabal: Option<String>,
    pub stack: Option<String>,
}

impl DefaultTokens {
    /// Token for `tool`, `latest` when unset.
    pub fn get(&self, tool: Tool) -> &str {
        let token = match tool {
            Tool::Ghc => &self.ghc,
            Tool::Cabal => &self.cabal,
            Tool::Stack => &self.stack,
        };
        token.as_deref().unwrap_or(LATEST)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CacheSettings {
    pub tool_cache: Option<PathBuf>,
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub defaults: DefaultTokens,
    pub cache: CacheSettings,
}

impl Settings {
    /// Built-in settings: every tool defaults to `latest`.
    pub fn builtin() -> Self {
        Self {
            defaults: DefaultTokens {
                ghc: Some(LATEST.to_string()),
                cabal: Some(LATEST.to_string()),
                stack: Some(LATEST.to_string()),
            },
            cache: CacheSettings::default(),
        }
    }

    /// Parse settings from a TOML string.
    pub fn parse(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Parse settings from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::io("failed to read settings file", path, e))?;
        Self::parse(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}", path.display()),
            path: Some(path.to_path_buf()),
            source: Some(Box::new(e)),
            fixes: vec![],
        })
    }
}

/// Load settings and merge them over the built-in defaults.
///
/// An explicit `path` must exist. Without one, the global settings file is
/// read when present.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let file = match path {
        Some(path) => Some(Settings::from_file(path)?),
        None => match hsetup_cache::global_config_file() {
            Ok(global) if global.exists() => {
                debug!("Loading settings from {}", global.display());
                Some(Settings::from_file(&global)?)
            }
            Ok(global) => {
                debug!("Settings file does not exist: {}", global.display());
                None
            }
            Err(_) => {
                debug!("Could not determine settings path");
                None
            }
        },
    };

    Ok(file.combine(Some(Settings::builtin())).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_settings() {
        let settings = Settings::parse(
            r#"
[defaults]
ghc = "9.6"

[cache]
tool-cache = "/opt/hostedtoolcache"
"#,
        )
        .unwrap();
        assert_eq!(settings.defaults.get(Tool::Ghc), "9.6");
        assert_eq!(settings.defaults.get(Tool::Cabal), LATEST);
        assert_eq!(
            settings.cache.tool_cache,
            Some(PathBuf::from("/opt/hostedtoolcache"))
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(Settings::parse("[defaults]\nhls = \"2.9\"\n").is_err());
    }

    #[test]
    fn test_load_explicit_file_merges_builtin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults]\nstack = \"2.15\"\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.defaults.stack.as_deref(), Some("2.15"));
        assert_eq!(settings.defaults.ghc.as_deref(), Some(LATEST));
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = load_settings(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[defaults\n").unwrap();
        let err = load_settings(Some(&path)).unwrap_err();
        assert!(matches!(err, Error::Config { path: Some(_), .. }));
    }
}
