//! CLI end-to-end tests that invoke the compiled `medialink` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

fn medialink_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_medialink"));
    cmd.env_remove("MEDIALINK_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A library with two films and a config grouping them by year.
fn library() -> TempDir {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("All/Heat (1995)")).unwrap();
    fs::create_dir_all(dir.path().join("All/Casino (1995)")).unwrap();
    fs::create_dir_all(dir.path().join("All/Alien (1979)")).unwrap();
    fs::create_dir(dir.path().join("Years")).unwrap();
    fs::write(
        dir.path().join("medialink.toml"),
        r#"
[default_settings]
scan_mode = "directories"

[[sets]]
name = "movies"
source_dir = "All"
resolvers = ["filename"]

[[sets.output]]
dest = "Years"
group_by = "year"
"#,
    )
    .unwrap();
    dir
}

fn is_link(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

#[test]
fn test_help_output() {
    medialink_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("organize"))
        .stdout(predicate::str::contains("list-sets"));
}

#[test]
fn test_version_output() {
    medialink_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("medialink"));
}

#[test]
fn test_no_command_shows_help_hint() {
    medialink_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("medialink --help"));
}

#[test]
fn test_list_resolvers() {
    medialink_cmd()
        .arg("list-resolvers")
        .assert()
        .success()
        .stdout(predicate::str::contains("filename"))
        .stdout(predicate::str::contains("table"));
}

#[test]
fn test_list_sets() {
    let dir = library();
    medialink_cmd()
        .arg("list-sets")
        .arg("--config")
        .arg(dir.path().join("medialink.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("by year"));
}

#[test]
fn test_organize_builds_view() {
    let dir = library();
    medialink_cmd()
        .arg("organize")
        .arg("-c")
        .arg(dir.path().join("medialink.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("movies"))
        .stdout(predicate::str::contains("3 items"));

    assert!(is_link(&dir.path().join("Years/1995/Heat (1995)")));
    assert!(is_link(&dir.path().join("Years/1995/Casino (1995)")));
    assert!(is_link(&dir.path().join("Years/1979/Alien (1979)")));
    assert!(dir.path().join("All/.cache").is_dir());
}

#[test]
fn test_organize_reads_config_from_env() {
    let dir = library();
    medialink_cmd()
        .arg("organize")
        .env("MEDIALINK_CONFIG", dir.path().join("medialink.toml"))
        .assert()
        .success();

    assert!(is_link(&dir.path().join("Years/1979/Alien (1979)")));
}

#[test]
fn test_organize_removes_stale_view_entries() {
    let dir = library();
    let config = dir.path().join("medialink.toml");
    medialink_cmd().arg("organize").arg("-c").arg(&config).assert().success();

    fs::remove_dir(dir.path().join("All/Alien (1979)")).unwrap();
    medialink_cmd().arg("organize").arg("-c").arg(&config).assert().success();

    assert!(!dir.path().join("Years/1979").exists());
    assert!(is_link(&dir.path().join("Years/1995/Heat (1995)")));
}

#[test]
fn test_organize_unknown_set_fails() {
    let dir = library();
    medialink_cmd()
        .args(["organize", "--set", "tv", "-c"])
        .arg(dir.path().join("medialink.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("tv"));
}

#[test]
fn test_missing_config_fails() {
    let dir = tempdir().unwrap();
    medialink_cmd()
        .args(["organize", "-c"])
        .arg(dir.path().join("absent.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_missing_destination_is_reported() {
    let dir = library();
    fs::remove_dir(dir.path().join("Years")).unwrap();
    medialink_cmd()
        .args(["organize", "-c"])
        .arg(dir.path().join("medialink.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing an output directory"));
}
