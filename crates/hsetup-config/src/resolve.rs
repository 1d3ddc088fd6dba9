//! Version resolution.
//!
//! Turns a requested version token into a concrete version:
//!
//! 1. `latest` resolves to the first (newest) supported version.
//! 2. An exact supported version resolves to itself.
//! 3. A prefix such as `8.10` resolves to the first supported version that
//!    starts with `8.10.`. List order wins, not numeric order, so an
//!    ambiguous prefix takes whichever entry the table lists first.
//! 4. Anything else is passed through unchanged.

use crate::versions::VersionTable;
use hsetup_core::{Os, Tool};
use tracing::{debug, info};

/// The sentinel token for the newest supported version.
pub const LATEST: &str = "latest";

/// Resolve a version token against a list of supported versions.
///
/// When `verbose` is set, a notice is emitted if the result differs from the
/// token.
pub fn resolve(token: &str, supported: &[String], tool: Tool, os: Os, verbose: bool) -> String {
    let found = if token == LATEST {
        supported.first()
    } else {
        // The trailing dot keeps stack "2.1" from matching "2.11.1".
        let prefix = format!("{token}.");
        supported
            .iter()
            .find(|v| v.as_str() == token)
            .or_else(|| supported.iter().find(|v| v.starts_with(&prefix)))
    };

    let result = found.cloned().unwrap_or_else(|| token.to_string());

    if result != token {
        if verbose {
            info!("Resolved {} {} to {}", tool, token, result);
        } else {
            debug!("Resolved {} {} to {} ({})", tool, token, result, os);
        }
    }

    result
}

/// Resolve a token for a tool using the table's supported list.
pub fn resolve_in(table: &VersionTable, token: &str, tool: Tool, os: Os, verbose: bool) -> String {
    resolve(token, table.supported(tool), tool, os, verbose)
}
