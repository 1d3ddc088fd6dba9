//! Settings merging.
//!
//! - `Option<T>`: first `Some` value wins
//! - scalars: `self` wins

use crate::settings::{CacheSettings, DefaultTokens, Settings};

/// Trait for combining configuration values.
///
/// The convention is that `self` has higher precedence than `other`.
pub trait Combine {
    /// Combine two values, preferring values in `self`.
    #[must_use]
    fn combine(self, other: Self) -> Self;
}

impl<T: Combine> Combine for Option<T> {
    fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Some(a), Some(b)) => Some(a.combine(b)),
            (a, b) => a.or(b),
        }
    }
}

impl Combine for String {
    fn combine(self, _other: Self) -> Self {
        self
    }
}

impl Combine for std::path::PathBuf {
    fn combine(self, _other: Self) -> Self {
        self
    }
}

impl Combine for Settings {
    fn combine(self, other: Self) -> Self {
        Self {
            defaults: self.defaults.combine(other.defaults),
            cache: self.cache.combine(other.cache),
        }
    }
}

impl Combine for DefaultTokens {
    fn combine(self, other: Self) -> Self {
        Self {
            ghc: self.ghc.combine(other.ghc),
            cabal: self.cabal.combine(other.cabal),
            stack: self.stack.combine(other.stack),
        }
    }
}

impl Combine for CacheSettings {
    fn combine(self, other: Self) -> Self {
        Self {
            tool_cache: self.tool_cache.combine(other.tool_cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_option_combine() {
        let s = |v: &str| Some(v.to_string());
        assert_eq!(s("a").combine(s("b")), s("a"));
        assert_eq!(None.combine(s("b")), s("b"));
        assert_eq!(s("a").combine(None), s("a"));
        assert_eq!(None::<String>.combine(None), None);
    }

    #[test]
    fn test_settings_combine() {
        let file = Settings {
            defaults: DefaultTokens {
                ghc: Some("9.6".to_string()),
                cabal: None,
                stack: None,
            },
            cache: CacheSettings {
                tool_cache: Some(PathBuf::from("/cache")),
            },
        };
        let combined = file.combine(Settings::builtin());
        assert_eq!(combined.defaults.ghc.as_deref(), Some("9.6"));
        assert_eq!(combined.defaults.cabal.as_deref(), Some("latest"));
        assert_eq!(combined.cache.tool_cache, Some(PathBuf::from("/cache")));
    }
}
