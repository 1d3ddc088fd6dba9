//! Integration tests for the hsetup CLI.

#![allow(deprecated)] // cargo_bin is deprecated but the replacement requires macros

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const INPUT_VARS: [&str; 11] = [
    "INPUT_GHC-VERSION",
    "INPUT_CABAL-VERSION",
    "INPUT_STACK-VERSION",
    "INPUT_ENABLE-STACK",
    "INPUT_STACK-NO-GLOBAL",
    "INPUT_STACK-SETUP-GHC",
    "INPUT_CABAL-UPDATE",
    "INPUT_GHCUP-RELEASE-CHANNELS",
    "INPUT_GHCUP-RELEASE-CHANNEL",
    "INPUT_ENABLE-MATCHER",
    "INPUT_DISABLE-MATCHER",
];

/// An hsetup command isolated from the real runner and user settings.
fn hsetup(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hsetup").unwrap();
    for var in INPUT_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUNNER_DEBUG")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("GITHUB_PATH")
        .env_remove("GITHUB_ENV")
        .env_remove("HSETUP_CONFIG_FILE")
        .env_remove("RUST_LOG")
        .env("HOME", home.path())
        .env("XDG_CACHE_HOME", home.path().join(".cache"))
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("RUNNER_TOOL_CACHE", home.path().join("toolcache"))
        .env("RUNNER_TEMP", home.path().join("tmp"))
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Haskell toolchain"))
        .stdout(predicate::str::contains("versions"))
        .stdout(predicate::str::contains("--ghc-version"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hsetup"))
        .stdout(predicate::str::is_match(r"\d+\.\d+\.\d+").unwrap());
}

#[test]
fn test_invalid_boolean_fails_naming_the_input() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .env("INPUT_CABAL-UPDATE", "yes")
        .assert()
        .code(3)
        .stdout(predicate::str::contains("::error::"))
        .stdout(predicate::str::contains("cabal-update"))
        .stderr(predicate::str::contains("\"yes\""));
}

#[test]
fn test_contradictions_are_reported_together() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .args([
            "--stack-no-global",
            "true",
            "--ghc-version",
            "9.4.8",
            "--cabal-version",
            "3.10",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("contradicts setting `ghc-version`"))
        .stderr(predicate::str::contains("contradicts setting `cabal-version`"));
}

#[test]
fn test_runner_debug_records_failure_and_succeeds() {
    let home = TempDir::new().unwrap();
    let output_file = home.path().join("github_output");
    fs::write(&output_file, "").unwrap();

    hsetup(&home)
        .env("RUNNER_DEBUG", "1")
        .env("GITHUB_OUTPUT", &output_file)
        .env("INPUT_ENABLE-STACK", "maybe")
        .assert()
        .success()
        .stdout(predicate::str::contains("::debug::"))
        .stdout(predicate::str::contains("::error::").not());

    let outputs = fs::read_to_string(&output_file).unwrap();
    assert!(outputs.contains("failed<<"));
    assert!(outputs.lines().any(|line| line == "true"));
}

#[test]
fn test_missing_settings_file_fails() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .arg("--config-file")
        .arg(home.path().join("absent.toml"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("::error::"));
}

#[test]
fn test_versions_for_one_tool() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .args(["versions", "--tool", "stack"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("3.5.1\n"))
        .stdout(predicate::str::contains("2.1.3\n"));
}

#[test]
fn test_versions_for_all_tools() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .arg("versions")
        .assert()
        .success()
        .stdout(predicate::str::contains("ghc 9.4.8\n"))
        .stdout(predicate::str::contains("cabal 3.10.3.0\n"))
        .stdout(predicate::str::contains("stack 2.15.7\n"));
}

#[test]
fn test_resolve_partial_versions() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .args(["resolve", "ghc", "8.10"])
        .assert()
        .success()
        .stdout("8.10.7\n");

    hsetup(&home)
        .args(["resolve", "stack", "2.1"])
        .assert()
        .success()
        .stdout("2.1.3\n");

    hsetup(&home)
        .args(["resolve", "cabal", "latest"])
        .assert()
        .success()
        .stdout("3.14.2.0\n");
}

#[test]
fn test_resolve_unknown_token_passes_through() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .args(["resolve", "ghc", "8.1"])
        .assert()
        .success()
        .stdout("8.1\n")
        .stderr(predicate::str::contains("not a known version"));
}

#[test]
fn test_resolve_with_os_prints_revision() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .args(["resolve", "ghc", "7.10", "--os", "win32"])
        .assert()
        .success()
        .stdout("7.10.3\nrevision 7.10.3.1\n");

    hsetup(&home)
        .args(["resolve", "ghc", "9.4.8", "--os", "linux"])
        .assert()
        .success()
        .stdout("9.4.8\nrevision 9.4.8\n");
}

#[test]
fn test_resolve_rejects_unknown_tool() {
    let home = TempDir::new().unwrap();
    hsetup(&home)
        .args(["resolve", "hls", "latest"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown tool"));
}
