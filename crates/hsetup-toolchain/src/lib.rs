//! Toolchain installation for hsetup.
//!
//! This crate handles:
//! - Selecting install strategies per (os, tool, version)
//! - The ghcup, Chocolatey, apt and stack release backends
//! - Verifying installs through the tool cache and well-known locations
//! - Post-install configuration of cabal and stack

pub mod apt;
pub mod chocolatey;
pub mod configure;
pub mod fetch;
pub mod ghcup;
pub mod host;
pub mod installer;
pub mod probe;
pub mod setup;
pub mod stack;
pub mod strategy;

#[cfg(test)]
mod testing;

pub use fetch::{Fetcher, HttpFetcher};
pub use ghcup::Ghcup;
pub use host::Host;
pub use installer::Installer;
pub use probe::{Probe, ProbeKind};
pub use strategy::{Strategy, StrategyKind, StrategyOutcome};
