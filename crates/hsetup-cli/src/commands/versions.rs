//! `hsetup versions`: list the supported versions.

use anyhow::Result;
use hsetup_config::VersionTable;
use hsetup_core::Tool;

/// Print supported versions, newest first, one per line.
///
/// With a tool filter only the bare versions are printed.
pub fn run(tool: Option<Tool>) -> Result<i32> {
    let table = VersionTable::embedded()?;

    match tool {
        Some(tool) => {
            for version in table.supported(tool) {
                println!("{version}");
            }
        }
        None => {
            for tool in Tool::ALL {
                for version in table.supported(tool) {
                    println!("{tool} {version}");
                }
            }
        }
    }

    Ok(0)
}
