//! Cache management for hsetup.
//!
//! This crate handles:
//! - Global cache, config and state directories
//! - The runner tool cache, keyed by (tool, version, arch)
//! - Scratch slots for downloads and extraction

pub mod tool_cache;

pub use tool_cache::ToolCache;

use directories::{BaseDirs, ProjectDirs};
use hsetup_core::EnvVars;
use hsetup_core::error::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "raskell", "hsetup")
        .ok_or_else(|| Error::config("could not determine home directory"))
}

/// The user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| Error::config("could not determine home directory"))
}

/// Get the global cache directory.
///
/// - Linux: `~/.cache/hsetup`
/// - macOS: `~/Library/Caches/io.raskell.hsetup`
/// - Windows: `%LOCALAPPDATA%\raskell\hsetup\cache`
pub fn global_cache_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.cache_dir().to_path_buf())
}

/// Get the global config directory.
pub fn global_config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Get the default settings file path.
pub fn global_config_file() -> Result<PathBuf> {
    Ok(global_config_dir()?.join("config.toml"))
}

/// Directory for files that must outlive the run, such as the problem matcher.
pub fn state_dir() -> Result<PathBuf> {
    Ok(global_cache_dir()?.join("state"))
}

/// Root of the tool cache.
///
/// Uses the runner's tool cache when available so pre-installed tools are
/// found, and falls back to a directory inside the global cache.
pub fn tool_cache_root() -> Result<PathBuf> {
    match std::env::var_os(EnvVars::RUNNER_TOOL_CACHE) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => Ok(global_cache_dir()?.join("tool-cache")),
    }
}

/// Scratch directory for downloads.
pub fn temp_root() -> PathBuf {
    match std::env::var_os(EnvVars::RUNNER_TEMP) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir().join("hsetup"),
    }
}

/// Ensure a directory exists.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        debug!("Creating directory: {}", path.display());
        std::fs::create_dir_all(path).map_err(|e| {
            Error::io(
                format!("failed to create directory: {}", path.display()),
                path,
                e,
            )
        })?;
    }
    Ok(())
}
