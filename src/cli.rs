// src/cli.rs

use crate::constants::{API_URL_ENV_KEY, DEFAULT_API_URL};
use clap::{Parser, Subcommand};

/// Download a single directory (or file) from a GitHub repository.
///
/// dirgrab lists the requested path through the GitHub contents API, walks every
/// subdirectory concurrently, and writes all files below the current directory
/// (or --output-dir), keeping their relative layout. The folder is created under
/// its own name: `.../tree/main/src/utils` lands in `./utils`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// GitHub URL of the directory or file, e.g. https://github.com/owner/repo/tree/main/docs
    #[arg(value_name = "URL")]
    pub url: Option<String>,

    // --- Account Options ---
    /// Show whether requests are authorized, the remaining rate limit, and when it resets.
    #[arg(short = 'c', long, action = clap::ArgAction::SetTrue, conflicts_with_all = ["url", "auth", "set", "unset"])]
    pub check: bool,

    /// Show the user the configured token belongs to.
    #[arg(short = 'a', long, action = clap::ArgAction::SetTrue, conflicts_with_all = ["url", "set", "unset"])]
    pub auth: bool,

    /// Store a GitHub token for later runs.
    #[arg(short = 's', long, value_name = "TOKEN", conflicts_with_all = ["url", "unset"])]
    pub set: Option<String>,

    /// Remove the stored GitHub token.
    #[arg(short = 'u', long, action = clap::ArgAction::SetTrue, conflicts_with = "url")]
    pub unset: bool,

    // --- Download Options ---
    /// Directory the downloaded folder is created in.
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    pub output_dir: String,

    /// Give up if the whole download takes longer than this many seconds.
    #[arg(short = 't', long, value_name = "SECS", default_value_t = 60)]
    pub timeout: u64,

    /// Keep downloading after a failure and report every error at the end.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub collect_errors: bool,

    /// Base URL of the GitHub REST API.
    #[arg(long, value_name = "URL", env = API_URL_ENV_KEY, default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,
}

/// Subcommands that run instead of a download.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the version of dirgrab.
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dirgrab", "github.com/o/r/tree/main/docs"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("github.com/o/r/tree/main/docs"));
        assert_eq!(cli.output_dir, ".");
        assert_eq!(cli.timeout, 60);
        assert!(!cli.collect_errors);
        assert!(!cli.check && !cli.auth && !cli.unset);
    }

    #[test]
    fn test_set_accepts_equals_syntax() {
        let cli = Cli::try_parse_from(["dirgrab", "--set=ghp_abc"]).unwrap();
        assert_eq!(cli.set.as_deref(), Some("ghp_abc"));
    }

    #[test]
    fn test_account_flags_conflict_with_url() {
        assert!(Cli::try_parse_from(["dirgrab", "-c", "github.com/o/r/tree/main/d"]).is_err());
        assert!(Cli::try_parse_from(["dirgrab", "-u", "-a"]).is_err());
        assert!(Cli::try_parse_from(["dirgrab", "-s", "tok", "-u"]).is_err());
    }
}
