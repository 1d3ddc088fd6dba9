//! Post-install configuration.
//!
//! Runs after every enabled tool is verified: optional `stack setup`, cabal
//! user configuration, and the ghc problem matcher.

use crate::installer::Installer;
use hsetup_cache::ensure_dir;
use hsetup_config::Options;
use hsetup_core::{Error, Os, Result, Tool};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

static MATCHER: &str = include_str!("../data/matcher.json");

/// File name of the problem matcher in the state directory.
pub const MATCHER_FILE: &str = "matcher.json";

/// ghc version that needs `-no-pie` passed to the linker.
const NO_PIE_GHC: &str = "7.10.3";

fn line_ending(os: Os) -> &'static str {
    match os {
        Os::Windows => "\r\n",
        _ => "\n",
    }
}

async fn run_checked(installer: &Installer, program: &str, args: &[&str]) -> Result<()> {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let code = installer.exec().status(program, &args).await?;
    if code == 0 {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            command: format!("{program} {}", args.join(" ")),
            exit_code: Some(code),
            stdout: String::new(),
            stderr: String::new(),
            fixes: vec![],
        })
    }
}

/// Pre-install ghc through stack.
pub async fn stack_setup(installer: &Installer, ghc_version: &str) -> Result<()> {
    let stack = installer.executable(Tool::Stack);
    run_checked(installer, &stack, &["setup", ghc_version]).await
}

/// The config file named on the last line of `cabal --help`.
pub fn config_file_from_help(help: &str) -> Option<PathBuf> {
    help.trim()
        .lines()
        .last()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
}

fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| Error::io("failed to open cabal config", path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io("failed to append to cabal config", path, e))
}

/// Configure cabal's store location and install policy, then update the
/// package index if requested.
pub async fn configure_cabal(installer: &Installer, options: &Options) -> Result<()> {
    let host = installer.host();
    let os = host.os();
    let eol = line_ending(os);
    let cabal = installer.executable(Tool::Cabal);

    // An existing ~/.cabal/bin keeps cabal out of XDG mode.
    if os != Os::Windows {
        ensure_dir(&host.cabal_bin_dir())?;
    }

    let init = installer
        .exec()
        .output(&cabal, &["user-config".to_string(), "init".to_string()])
        .await?;
    debug!("cabal user-config init exited with {}", init.exit_code);

    let help = installer
        .exec()
        .output(&cabal, &["--help".to_string()])
        .await?;
    let config_file = config_file_from_help(&format!("{}{}", help.stdout, help.stderr))
        .ok_or_else(|| Error::config("could not find the cabal config file in `cabal --help`"))?;
    debug!("cabal config file: {}", config_file.display());

    // cabal takes the last occurrence of a field, so appending is enough.
    let store_dir = host.cabal_store_dir();
    append(&config_file, &format!("store-dir: {store_dir}{eol}"))?;
    installer.channel().set_output("cabal-store", &store_dir)?;

    if os == Os::Windows {
        append(&config_file, &format!("install-method: copy{eol}"))?;
        append(&config_file, &format!("overwrite-policy: always{eol}"))?;
    } else {
        let bin = host.cabal_bin_dir();
        installer
            .channel()
            .info(&format!("Adding {} to PATH", bin.display()));
        installer.channel().add_path(&bin)?;
    }

    if options.ghc.resolved == NO_PIE_GHC && os != Os::Windows {
        append(
            &config_file,
            &format!("program-default-options{eol}  ghc-options: -optl-no-pie{eol}"),
        )?;
    }

    if options.cabal.update && !options.stack.program.enable {
        run_checked(installer, &cabal, &["update"]).await?;
    }

    Ok(())
}

/// Write the problem matcher to `state_dir` and return its path.
pub fn write_matcher(state_dir: &Path) -> Result<PathBuf> {
    ensure_dir(state_dir)?;
    let path = state_dir.join(MATCHER_FILE);
    std::fs::write(&path, MATCHER).map_err(|e| Error::io("failed to write matcher", &path, e))?;
    Ok(path)
}
