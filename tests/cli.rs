// tests/cli.rs

mod common;

use assert_cmd::prelude::*;
use common::isolated_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_no_arguments_prints_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;

    isolated_cmd(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--check"));

    Ok(())
}

#[test]
fn test_version_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;

    isolated_cmd(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(format!("dirgrab version {}\n", env!("CARGO_PKG_VERSION")));

    Ok(())
}

#[test]
fn test_invalid_source_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;

    isolated_cmd(home.path())
        .arg("https://gitlab.com/owner/repo/tree/main/docs")
        .current_dir(home.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Error: url must start with https://github.com/ or github.com/",
        ));

    Ok(())
}

#[test]
fn test_invalid_format_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;

    isolated_cmd(home.path())
        .arg("github.com/owner/repo")
        .current_dir(home.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "url format must be: https://github.com/owner/repo/tree/branch/directory",
        ));

    // Nothing was written.
    assert_eq!(std::fs::read_dir(home.path())?.count(), 0);
    Ok(())
}

#[test]
fn test_conflicting_flags_exit_with_one() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;

    isolated_cmd(home.path())
        .args(["--check", "--auth"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be used with"));

    Ok(())
}

#[test]
fn test_zero_timeout_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;

    isolated_cmd(home.path())
        .args(["github.com/o/r/tree/main/docs", "--timeout", "0"])
        .current_dir(home.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--timeout must be greater than 0"));

    Ok(())
}

#[test]
fn test_set_and_unset_token() -> Result<(), Box<dyn std::error::Error>> {
    let home = tempdir()?;
    let token_file = home.path().join(".config").join("dirgrab").join("token");

    isolated_cmd(home.path())
        .arg("--set=ghp_example_token")
        .assert()
        .success()
        .stdout("Specified token was saved.\n");
    assert_eq!(std::fs::read_to_string(&token_file)?.trim(), "ghp_example_token");

    isolated_cmd(home.path())
        .arg("-u")
        .assert()
        .success()
        .stdout("Specified token was deleted.\n");
    assert!(!token_file.exists());

    Ok(())
}
