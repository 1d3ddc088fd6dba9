//! `hsetup resolve`: show what a version token resolves to.

use anyhow::{Result, anyhow};
use hsetup_config::{LATEST, VersionTable, resolve_in};
use hsetup_core::{Os, Tool};
use hsetup_ui::Output;

/// Print the resolved version. With an explicit `--os`, also print the
/// release revision the platform package manager would be asked for.
pub fn run(tool: Tool, token: &str, os: Option<Os>, output: &Output) -> Result<i32> {
    let table = VersionTable::embedded()?;

    let Some(target) = os.or_else(Os::current) else {
        return Err(anyhow!("unsupported operating system, pass --os"));
    };
    let token = token.trim();
    let resolved = resolve_in(&table, token, tool, target, false);

    if token != LATEST && !table.supported(tool).contains(&resolved) {
        output.warn(&format!(
            "{tool} {token} is not a known version and is used unchanged"
        ));
    }
    println!("{resolved}");

    if let Some(os) = os {
        println!("revision {}", table.release_revision(&resolved, tool, os));
    }
    Ok(0)
}
