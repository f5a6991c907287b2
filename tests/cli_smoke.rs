#![allow(clippy::unwrap_used)]
//! CLI smoke tests: the binary starts, prints its listings and maps
//! configuration failures to the right exit code.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Runs the binary with an empty config home and working directory.
#[allow(deprecated)]
fn vntl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("vntl").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("NO_COLOR", "1")
        .current_dir(home.path());
    cmd
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    vntl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--from"))
        .stdout(predicate::str::contains("--mode"))
        .stdout(predicate::str::contains("--max-chunk-chars"))
        .stdout(predicate::str::contains("--glossary"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    vntl(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_list() {
    let home = TempDir::new().unwrap();
    vntl(&home)
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("zh"))
        .stdout(predicate::str::contains("hv"))
        .stdout(predicate::str::contains("Lao"));
}

#[test]
fn test_modes_list() {
    let home = TempDir::new().unwrap();
    vntl(&home)
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("smooth"))
        .stdout(predicate::str::contains("literal"));
}

#[test]
fn test_providers_list_without_config() {
    let home = TempDir::new().unwrap();
    vntl(&home)
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers configured"));
}

#[test]
fn test_invalid_language_exits_with_config_code() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("vntl")).unwrap();
    fs::write(
        home.path().join("vntl/config.toml"),
        "[vntl]\nprovider = \"local\"\nmodel = \"m\"\n\n\
         [providers.local]\nendpoint = \"http://127.0.0.1:9\"\n",
    )
    .unwrap();
    fs::write(home.path().join("in.txt"), "text").unwrap();

    vntl(&home)
        .args(["in.txt", "-f", "ja"])
        .assert()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("Invalid language code"));
}

#[test]
fn test_broken_config_file_exits_with_generic_code() {
    let home = TempDir::new().unwrap();
    fs::create_dir_all(home.path().join("vntl")).unwrap();
    fs::write(home.path().join("vntl/config.toml"), "[vntl\nprovider = ").unwrap();

    vntl(&home)
        .arg("providers")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_missing_provider_exits_with_config_code() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("in.txt"), "text").unwrap();

    vntl(&home)
        .arg("in.txt")
        .assert()
        .code(exitcode::CONFIG)
        .stderr(predicate::str::contains("provider"));
}

#[test]
fn test_prompts_check_reports_missing_templates() {
    let home = TempDir::new().unwrap();
    let prompts = home.path().join("prompts");
    fs::create_dir_all(&prompts).unwrap();
    fs::write(prompts.join("system_th_smooth.txt"), "s").unwrap();

    vntl(&home)
        .args(["prompts", "-f", "th", "--prompts", "prompts"])
        .assert()
        .code(exitcode::CONFIG)
        .stdout(predicate::str::contains("system_th_smooth"))
        .stdout(predicate::str::contains("assistant_th_smooth"))
        .stderr(predicate::str::contains("2 prompt template(s) missing"));
}

#[test]
fn test_prompts_check_passes_with_shipped_templates() {
    let home = TempDir::new().unwrap();
    let shipped = concat!(env!("CARGO_MANIFEST_DIR"), "/prompts");

    vntl(&home)
        .args(["prompts", "-f", "zh", "--mode", "literal", "--prompts", shipped])
        .assert()
        .success()
        .stdout(predicate::str::contains("intro_zh"));
}
