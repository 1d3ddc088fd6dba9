//! Well-known install locations checked by `CheckInstalled`.

use crate::host::Host;
use hsetup_core::{Os, Tool};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// How far a located directory can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// The path only exists when exactly this version is installed.
    Unambiguous,
    /// The path is shared between versions; the wanted one must be selected.
    MultiVersion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub path: PathBuf,
    pub kind: ProbeKind,
}

/// Locations to check for `tool`, in order.
///
/// Chocolatey locations come before ghcup's because a Chocolatey install
/// directory belongs to a single version.
pub fn probes(host: &Host, tool: Tool, version: &str, revision: &str) -> Vec<Probe> {
    if tool == Tool::Stack {
        return Vec::new();
    }

    let ghcup = Probe {
        path: host.ghcup_bin_dir(),
        kind: ProbeKind::MultiVersion,
    };

    match host.os() {
        Os::Windows => {
            let mut probes = Vec::with_capacity(2);
            if let Some(path) = chocolatey_path(host, tool, version, revision) {
                probes.push(Probe {
                    path,
                    kind: ProbeKind::Unambiguous,
                });
            }
            probes.push(ghcup);
            probes
        }
        Os::Linux | Os::Darwin => vec![ghcup],
    }
}

/// Directory holding `<tool>.exe` from a Chocolatey install.
///
/// Newer packages install to `<tools>/<tool>-<version>`, older ones to
/// `<ChocolateyInstall>/lib/<tool>.<revision>`.
pub fn chocolatey_path(host: &Host, tool: Tool, version: &str, revision: &str) -> Option<PathBuf> {
    let mut root = host.chocolatey_tools().join(format!("{tool}-{version}"));
    if !root.exists() {
        root = host
            .chocolatey_install
            .as_ref()?
            .join("lib")
            .join(format!("{tool}.{revision}"));
    }
    debug!("Chocolatey root for {} {}: {}", tool, version, root.display());

    let found = find_executable(&root, &format!("{tool}.exe"));
    if found.is_none() {
        debug!("Cannot find binary for {} under {}", tool, root.display());
    }
    found
}

fn find_executable(root: &Path, file_name: &str) -> Option<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == file_name)
        .and_then(|e| e.path().parent().map(Path::to_path_buf))
}
