//! Version parsing and comparison.
//!
//! Version strings in the version table are dotted numeric sequences of
//! varying length (`9.4.8`, `3.10.3.0`). Tokens such as `head` or
//! `latest-nightly` do not parse; callers use that to skip numeric
//! thresholds for them.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted numeric version with an optional pre-release suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub components: Vec<u32>,
    pub pre: Option<String>,
}

impl Version {
    /// Create a three-component version.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            components: vec![major, minor, patch],
            pre: None,
        }
    }

    fn component(&self, idx: usize) -> u32 {
        self.components.get(idx).copied().unwrap_or(0)
    }

    /// Check whether `version` parses and is strictly lower than `threshold`.
    ///
    /// Unparseable inputs are never considered older.
    pub fn is_older_than(version: &str, threshold: &str) -> bool {
        match (version.parse::<Version>(), threshold.parse::<Version>()) {
            (Ok(v), Ok(t)) => v < t,
            _ => false,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u32::to_string).collect();
        f.write_str(&parts.join("."))?;
        if let Some(ref pre) = self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        // Split off pre-release suffix
        let (version_part, pre) = match s.split_once('-') {
            Some((v, pre)) => (v, Some(pre.to_string())),
            None => (s, None),
        };

        let parts: Vec<&str> = version_part.split('.').collect();
        if version_part.is_empty() || parts.len() > 4 {
            return Err(VersionParseError::InvalidFormat(s.to_string()));
        }

        let components = parts
            .iter()
            .map(|p| {
                p.parse::<u32>()
                    .map_err(|_| VersionParseError::InvalidNumber(p.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Version { components, pre })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for idx in 0..len {
            match self.component(idx).cmp(&other.component(idx)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        // Pre-release versions are less than release versions
        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

/// Error parsing a version string.
#[derive(Debug, thiserror::Error)]
pub enum VersionParseError {
    #[error("invalid version format: {0}")]
    InvalidFormat(String),
    #[error("invalid version number: {0}")]
    InvalidNumber(String),
}
