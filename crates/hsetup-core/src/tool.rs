//! The tools hsetup knows how to install.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three installable tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// The GHC compiler
    Ghc,
    /// The cabal package manager
    Cabal,
    /// The stack project builder
    Stack,
}

impl Tool {
    /// All tools, in installation order.
    pub const ALL: [Tool; 3] = [Tool::Ghc, Tool::Cabal, Tool::Stack];

    /// The executable / package name of the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Ghc => "ghc",
            Tool::Cabal => "cabal",
            Tool::Stack => "stack",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ghc" => Ok(Tool::Ghc),
            "cabal" => Ok(Tool::Cabal),
            "stack" => Ok(Tool::Stack),
            other => Err(format!(
                "unknown tool `{other}` (expected one of: ghc, cabal, stack)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_order() {
        assert_eq!(Tool::ALL, [Tool::Ghc, Tool::Cabal, Tool::Stack]);
    }

    #[test]
    fn test_parse_tool() {
        assert_eq!("cabal".parse::<Tool>().unwrap(), Tool::Cabal);
        assert!("hls".parse::<Tool>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Tool::Stack).unwrap();
        assert_eq!(json, "\"stack\"");
    }
}
