//! Version table, version resolution and input validation for hsetup.
//!
//! This crate handles:
//! - The embedded table of supported versions and release revisions
//! - Resolving `latest`, exact and partial version tokens
//! - Parsing action inputs (YAML booleans, URLs)
//! - Cross-validating inputs into a resolved [`Options`]
//! - The optional settings file

pub mod combine;
pub mod inputs;
pub mod options;
pub mod resolve;
pub mod settings;
pub mod validate;
pub mod versions;

pub use combine::Combine;
pub use inputs::RawInputs;
pub use options::{CabalOpt, GhcupOpt, MatcherOpt, Options, ProgramOpt, StackOpt};
pub use resolve::{resolve, resolve_in, LATEST};
pub use settings::{load_settings, CacheSettings, DefaultTokens, Settings};
pub use validate::{build_config, DefaultVersion, Defaults, Notice, Resolved};
pub use versions::{Revision, VersionTable};
