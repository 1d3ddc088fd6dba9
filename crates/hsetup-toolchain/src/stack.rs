//! Stack release downloads.

use crate::fetch::{self, Fetcher};
use hsetup_cache::ToolCache;
use hsetup_core::{Arch, Error, Os, Result, Version};
use std::fs;
use tracing::{debug, info};

/// Linux releases before this version are published with a `-static` suffix.
const STATIC_SUFFIX_BELOW: &str = "2.3.1";

/// Build name in a stack release archive, e.g. `linux-x86_64`.
pub fn build_name(version: &str, os: Os, arch: Arch) -> String {
    match os {
        Os::Linux => {
            if version.parse::<Version>().is_err() {
                debug!(
                    "stack version {} does not parse; using the current linux build name",
                    version
                );
            }
            let suffix = if Version::is_older_than(version, STATIC_SUFFIX_BELOW) {
                "-static"
            } else {
                ""
            };
            format!("linux-{}{suffix}", arch.triple_name())
        }
        Os::Darwin => format!("osx-{}", arch.triple_name()),
        Os::Windows => "windows-x86_64".to_string(),
    }
}

pub fn release_url(version: &str, os: Os, arch: Arch) -> String {
    format!(
        "https://github.com/commercialhaskell/stack/releases/download/v{version}/stack-{version}-{}.tar.gz",
        build_name(version, os, arch)
    )
}

/// Download, extract and cache stack `version`.
pub async fn install(
    fetcher: &dyn Fetcher,
    cache: &ToolCache,
    version: &str,
    os: Os,
    arch: Arch,
) -> Result<()> {
    info!(
        "Attempting to install stack {} for arch {}",
        version,
        arch.triple_name()
    );
    let url = release_url(version, os, arch);

    let download_slot = cache.allocate_slot()?;
    let archive = download_slot.path().join("stack.tar.gz");
    fetcher.download(&url, &archive).await?;

    let extract_slot = cache.allocate_slot()?;
    fetch::extract_tar_gz(&archive, extract_slot.path())?;

    let mut entries = fs::read_dir(extract_slot.path())
        .map_err(|e| Error::io("failed to read extracted archive", extract_slot.path(), e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("stack"))
        .map(|e| e.path())
        .collect::<Vec<_>>();
    entries.sort();

    let stack_dir = entries
        .into_iter()
        .next()
        .ok_or_else(|| Error::Download {
            url: url.clone(),
            message: "archive does not contain a stack directory".to_string(),
        })?;

    cache.cache_dir(&stack_dir, "stack", version)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_names() {
        assert_eq!(build_name("2.15.7", Os::Linux, Arch::X64), "linux-x86_64");
        assert_eq!(build_name("2.1.3", Os::Linux, Arch::X64), "linux-x86_64-static");
        assert_eq!(build_name("2.3.1", Os::Linux, Arch::Arm64), "linux-aarch64");
        assert_eq!(build_name("2.15.7", Os::Darwin, Arch::Arm64), "osx-aarch64");
        assert_eq!(build_name("2.15.7", Os::Windows, Arch::X64), "windows-x86_64");
    }

    #[test]
    fn test_unparsed_linux_version_uses_current_build_name() {
        assert_eq!(build_name("nightly", Os::Linux, Arch::X64), "linux-x86_64");
    }

    #[test]
    fn test_release_url() {
        assert_eq!(
            release_url("2.15.7", Os::Linux, Arch::X64),
            "https://github.com/commercialhaskell/stack/releases/download/v2.15.7/stack-2.15.7-linux-x86_64.tar.gz"
        );
    }
}
