// tests/common.rs

use std::path::Path;
use std::process::Command;

// Helper function to get the binary command
#[allow(dead_code)] // This is used by many integration tests, but not all.
pub fn dirgrab_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("dirgrab"))
}

/// A `dirgrab` command isolated from the user's environment: no `GH_TOKEN`,
/// no API override, and a config directory (where tokens are stored) below
/// `home`.
#[allow(dead_code)]
pub fn isolated_cmd(home: &Path) -> Command {
    let mut cmd = dirgrab_cmd();
    cmd.env_remove("GH_TOKEN")
        .env_remove("DIRGRAB_API_URL")
        .env_remove("RUST_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"));
    cmd
}
