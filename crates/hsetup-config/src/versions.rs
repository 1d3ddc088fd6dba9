//! The version table.
//!
//! Supported versions per tool (newest first) and the per-OS release
//! revisions used by package managers that number builds more finely than
//! upstream releases. The table is embedded at build time and read-only
//! afterwards.

use hsetup_core::{Error, Os, Result, Tool};
use serde::Deserialize;
use std::collections::HashMap;

static EMBEDDED_VERSIONS: &str = include_str!("../data/versions.json");
static EMBEDDED_REVISIONS: &str = include_str!("../data/release-revisions.json");

/// A packaging revision mapping, e.g. `7.10.3` → `7.10.3.1`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Revision {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SupportedVersions {
    ghc: Vec<String>,
    cabal: Vec<String>,
    stack: Vec<String>,
    ghcup: Vec<String>,
}

type Revisions = HashMap<Os, HashMap<Tool, Vec<Revision>>>;

/// Immutable table of supported versions and release revisions.
#[derive(Debug, Clone)]
pub struct VersionTable {
    supported: SupportedVersions,
    revisions: Revisions,
}

impl VersionTable {
    /// Load the table shipped with hsetup.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_VERSIONS, EMBEDDED_REVISIONS)
    }

    /// Parse a table from its two JSON documents.
    pub fn from_json(versions: &str, revisions: &str) -> Result<Self> {
        let supported: SupportedVersions = serde_json::from_str(versions)
            .map_err(|e| Error::config(format!("invalid version table: {e}")))?;
        let revisions: Revisions = serde_json::from_str(revisions)
            .map_err(|e| Error::config(format!("invalid release revision table: {e}")))?;

        let table = Self {
            supported,
            revisions,
        };

        for tool in Tool::ALL {
            if table.supported(tool).is_empty() {
                return Err(Error::config(format!(
                    "version table lists no supported versions for {tool}"
                )));
            }
        }
        if table.supported.ghcup.is_empty() {
            return Err(Error::config("version table does not pin a ghcup version"));
        }

        Ok(table)
    }

    /// Supported versions of a tool, newest first.
    pub fn supported(&self, tool: Tool) -> &[String] {
        match tool {
            Tool::Ghc => &self.supported.ghc,
            Tool::Cabal => &self.supported.cabal,
            Tool::Stack => &self.supported.stack,
        }
    }

    /// The ghcup version hsetup downloads when none is cached.
    pub fn ghcup_version(&self) -> &str {
        &self.supported.ghcup[0]
    }

    /// Look up the packaging revision for a version.
    ///
    /// Falls back to the version itself when the table has no entry.
    pub fn release_revision(&self, version: &str, tool: Tool, os: Os) -> String {
        self.revisions
            .get(&os)
            .and_then(|by_tool| by_tool.get(&tool))
            .and_then(|revs| revs.iter().find(|r| r.from == version))
            .map(|r| r.to.clone())
            .unwrap_or_else(|| version.to_string())
    }
}
