//! Which install strategies apply to a (os, tool, version).
//!
//! The selection is a table of rules; the first rule that matches decides
//! the ordered list of strategies. Strategies only cause side effects.
//! Whether a tool ended up installed is always decided by the probes.

use hsetup_core::{Os, Tool, Version};

/// The unstable-build version token.
pub const HEAD: &str = "head";

/// ghc versions below this need the legacy ncurses runtime on linux.
pub const LEGACY_CURSES_BELOW: &str = "8.3";

/// A way of putting a tool on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// `ghcup install` from its registry (or the custom cabal head URL).
    Ghcup,
    /// `ghcup install -u <nightly artifact> head` for ghc.
    GhcupGhcHead,
    /// `choco install` with the release revision.
    Chocolatey,
    /// Download a stack release archive into the tool cache.
    StackRelease,
}

/// OS packages a strategy needs first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    /// `build-essential`, for ghc head.
    BuildEssential,
    /// `libncurses5` and `libtinfo5`, for old ghc.
    LegacyCurses,
}

/// What to do when a prerequisite cannot be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Skip the strategy.
    Required,
    /// Run the strategy anyway.
    BestEffort,
}

/// One entry in a strategy list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub kind: StrategyKind,
    pub prerequisite: Option<(Prerequisite, Requirement)>,
}

impl Strategy {
    const fn plain(kind: StrategyKind) -> Self {
        Self {
            kind,
            prerequisite: None,
        }
    }

    const fn after(kind: StrategyKind, prerequisite: Prerequisite, req: Requirement) -> Self {
        Self {
            kind,
            prerequisite: Some((prerequisite, req)),
        }
    }
}

/// Result of running one strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// The installer reported success.
    Succeeded,
    /// The strategy chose not to run, e.g. a required prerequisite failed.
    Declined(String),
    /// The installer ran and failed.
    Errored(String),
}

#[derive(Debug, Clone, Copy)]
enum VersionMatch {
    Any,
    Head,
    Below(&'static str),
}

impl VersionMatch {
    fn matches(self, version: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Head => version == HEAD,
            Self::Below(threshold) => Version::is_older_than(version, threshold),
        }
    }
}

struct Rule {
    os: Option<Os>,
    tool: Option<Tool>,
    version: VersionMatch,
    strategies: &'static [Strategy],
}

const RULES: &[Rule] = &[
    Rule {
        os: None,
        tool: Some(Tool::Stack),
        version: VersionMatch::Any,
        strategies: &[Strategy::plain(StrategyKind::StackRelease)],
    },
    Rule {
        os: Some(Os::Linux),
        tool: Some(Tool::Ghc),
        version: VersionMatch::Head,
        strategies: &[Strategy::after(
            StrategyKind::GhcupGhcHead,
            Prerequisite::BuildEssential,
            Requirement::Required,
        )],
    },
    Rule {
        os: Some(Os::Linux),
        tool: Some(Tool::Ghc),
        version: VersionMatch::Below(LEGACY_CURSES_BELOW),
        strategies: &[Strategy::after(
            StrategyKind::Ghcup,
            Prerequisite::LegacyCurses,
            Requirement::BestEffort,
        )],
    },
    Rule {
        os: Some(Os::Windows),
        tool: None,
        version: VersionMatch::Any,
        strategies: &[
            Strategy::plain(StrategyKind::Chocolatey),
            Strategy::plain(StrategyKind::Ghcup),
        ],
    },
    Rule {
        os: None,
        tool: None,
        version: VersionMatch::Any,
        strategies: &[Strategy::plain(StrategyKind::Ghcup)],
    },
];

/// Ordered strategies for installing `tool` at `version` on `os`.
pub fn select(os: Os, tool: Tool, version: &str) -> &'static [Strategy] {
    RULES
        .iter()
        .find(|rule| {
            rule.os.is_none_or(|o| o == os)
                && rule.tool.is_none_or(|t| t == tool)
                && rule.version.matches(version)
        })
        .map(|rule| rule.strategies)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(os: Os, tool: Tool, version: &str) -> Vec<StrategyKind> {
        select(os, tool, version).iter().map(|s| s.kind).collect()
    }

    #[test]
    fn test_stack_always_downloads_release() {
        for os in [Os::Linux, Os::Darwin, Os::Windows] {
            assert_eq!(kinds(os, Tool::Stack, "2.15.7"), vec![StrategyKind::StackRelease]);
        }
    }

    #[test]
    fn test_linux_ghc_head_requires_build_essential() {
        let strategies = select(Os::Linux, Tool::Ghc, HEAD);
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].kind, StrategyKind::GhcupGhcHead);
        assert_eq!(
            strategies[0].prerequisite,
            Some((Prerequisite::BuildEssential, Requirement::Required))
        );
    }

    #[test]
    fn test_linux_old_ghc_gets_legacy_curses_best_effort() {
        let strategies = select(Os::Linux, Tool::Ghc, "8.2.2");
        assert_eq!(
            strategies[0].prerequisite,
            Some((Prerequisite::LegacyCurses, Requirement::BestEffort))
        );
        assert_eq!(strategies[0].kind, StrategyKind::Ghcup);

        assert_eq!(select(Os::Linux, Tool::Ghc, "8.4.4")[0].prerequisite, None);
        assert_eq!(select(Os::Linux, Tool::Ghc, "latest-nightly")[0].prerequisite, None);
        assert_eq!(select(Os::Darwin, Tool::Ghc, "8.2.2")[0].prerequisite, None);
    }

    #[test]
    fn test_windows_tries_chocolatey_first() {
        for tool in [Tool::Ghc, Tool::Cabal] {
            assert_eq!(
                kinds(Os::Windows, tool, "9.4.8"),
                vec![StrategyKind::Chocolatey, StrategyKind::Ghcup]
            );
        }
    }

    #[test]
    fn test_default_is_ghcup() {
        assert_eq!(kinds(Os::Darwin, Tool::Ghc, "9.4.8"), vec![StrategyKind::Ghcup]);
        assert_eq!(kinds(Os::Linux, Tool::Cabal, HEAD), vec![StrategyKind::Ghcup]);
        assert_eq!(kinds(Os::Darwin, Tool::Ghc, HEAD), vec![StrategyKind::Ghcup]);
    }
}
