//! The tool cache.
//!
//! Layout follows the runner convention so that tools pre-installed on a
//! hosted image are picked up:
//!
//! ```text
//! <root>/<tool>/<version>/<arch>/...        cached contents
//! <root>/<tool>/<version>/<arch>.complete   marker written last
//! ```
//!
//! An entry without its marker is treated as absent.

use crate::ensure_dir;
use hsetup_core::Arch;
use hsetup_core::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};
use walkdir::WalkDir;

/// Local cache of installed tools keyed by (tool, version, arch).
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: PathBuf,
    temp: PathBuf,
    arch: Arch,
}

impl ToolCache {
    /// Create a cache rooted at `root`, using `temp` for scratch slots.
    pub fn new(root: impl Into<PathBuf>, temp: impl Into<PathBuf>, arch: Arch) -> Self {
        Self {
            root: root.into(),
            temp: temp.into(),
            arch,
        }
    }

    /// Create a cache at the default locations for this host.
    pub fn from_env(arch: Arch) -> Result<Self> {
        Ok(Self::new(crate::tool_cache_root()?, crate::temp_root(), arch))
    }

    /// Root directory of the cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_dir(&self, tool: &str, version: &str) -> PathBuf {
        self.root.join(tool).join(version).join(self.arch.as_str())
    }

    fn marker(&self, tool: &str, version: &str) -> PathBuf {
        self.root
            .join(tool)
            .join(version)
            .join(format!("{}.complete", self.arch.as_str()))
    }

    /// Look up a completed cache entry.
    pub fn find(&self, tool: &str, version: &str) -> Option<PathBuf> {
        let dir = self.entry_dir(tool, version);
        if self.marker(tool, version).is_file() && dir.is_dir() {
            debug!("Tool cache hit: {} {} at {}", tool, version, dir.display());
            Some(dir)
        } else {
            debug!("Tool cache miss: {} {}", tool, version);
            None
        }
    }

    /// Copy a directory tree into the cache and mark it complete.
    pub fn cache_dir(&self, source: &Path, tool: &str, version: &str) -> Result<PathBuf> {
        let dest = self.prepare_entry(tool, version)?;

        for entry in WalkDir::new(source) {
            let entry = entry.map_err(|e| {
                Error::config(format!("failed to walk {}: {}", source.display(), e))
            })?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| Error::config(format!("unexpected path in cache source: {e}")))?;
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                ensure_dir(&target)?;
            } else {
                fs::copy(entry.path(), &target).map_err(|e| {
                    Error::io(format!("failed to copy {}", entry.path().display()), &target, e)
                })?;
            }
        }

        self.complete(tool, version)?;
        info!("Cached {} {} at {}", tool, version, dest.display());
        Ok(dest)
    }

    /// Copy a single file into the cache under `target_name` and mark it complete.
    pub fn cache_file(
        &self,
        source: &Path,
        target_name: &str,
        tool: &str,
        version: &str,
    ) -> Result<PathBuf> {
        let dest = self.prepare_entry(tool, version)?;
        let target = dest.join(target_name);
        fs::copy(source, &target)
            .map_err(|e| Error::io(format!("failed to copy {}", source.display()), &target, e))?;

        self.complete(tool, version)?;
        info!("Cached {} {} at {}", tool, version, dest.display());
        Ok(dest)
    }

    /// Allocate a fresh, empty scratch directory under the temp root.
    ///
    /// The directory is removed when the returned handle is dropped.
    pub fn allocate_slot(&self) -> Result<TempDir> {
        ensure_dir(&self.temp)?;
        tempfile::Builder::new()
            .prefix("slot-")
            .tempdir_in(&self.temp)
            .map_err(|e| Error::io("failed to allocate scratch directory", &self.temp, e))
    }

    fn prepare_entry(&self, tool: &str, version: &str) -> Result<PathBuf> {
        let dest = self.entry_dir(tool, version);
        let marker = self.marker(tool, version);

        if marker.exists() {
            fs::remove_file(&marker)
                .map_err(|e| Error::io("failed to remove stale cache marker", &marker, e))?;
        }
        if dest.exists() {
            fs::remove_dir_all(&dest)
                .map_err(|e| Error::io("failed to clear cache entry", &dest, e))?;
        }
        ensure_dir(&dest)?;
        Ok(dest)
    }

    fn complete(&self, tool: &str, version: &str) -> Result<()> {
        let marker = self.marker(tool, version);
        fs::write(&marker, b"").map_err(|e| Error::io("failed to write cache marker", &marker, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache(dir: &TempDir) -> ToolCache {
        ToolCache::new(dir.path().join("cache"), dir.path().join("tmp"), Arch::X64)
    }

    #[test]
    fn test_find_requires_marker() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        fs::create_dir_all(dir.path().join("cache/stack/2.15.7/x64")).unwrap();
        assert!(cache.find("stack", "2.15.7").is_none());

        fs::write(dir.path().join("cache/stack/2.15.7/x64.complete"), b"").unwrap();
        assert_eq!(
            cache.find("stack", "2.15.7").unwrap(),
            dir.path().join("cache/stack/2.15.7/x64")
        );
    }

    #[test]
    fn test_cache_dir_copies_tree() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("doc")).unwrap();
        fs::write(src.join("stack"), b"binary").unwrap();
        fs::write(src.join("doc/README"), b"docs").unwrap();

        let dest = cache.cache_dir(&src, "stack", "2.15.7").unwrap();
        assert_eq!(fs::read(dest.join("stack")).unwrap(), b"binary");
        assert_eq!(fs::read(dest.join("doc/README")).unwrap(), b"docs");
        assert_eq!(cache.find("stack", "2.15.7"), Some(dest));
    }

    #[test]
    fn test_cache_file_renames() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let src = dir.path().join("download.bin");
        fs::write(&src, b"ghcup").unwrap();

        let dest = cache.cache_file(&src, "ghcup", "ghcup", "0.1.50.2").unwrap();
        assert_eq!(fs::read(dest.join("ghcup")).unwrap(), b"ghcup");
    }

    #[test]
    fn test_allocate_slot_is_fresh() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let a = cache.allocate_slot().unwrap();
        let b = cache.allocate_slot().unwrap();
        assert_ne!(a.path(), b.path());
        assert!(a.path().is_dir());
        assert_eq!(fs::read_dir(a.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_dropped_slot_is_removed() {
        let dir = TempDir::new().unwrap();
        let cache = cache(&dir);
        let slot = cache.allocate_slot().unwrap();
        fs::write(slot.path().join("partial"), b"x").unwrap();
        let path = slot.path().to_path_buf();

        drop(slot);
        assert!(!path.exists());
    }
}
