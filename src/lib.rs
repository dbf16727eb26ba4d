//! `dirgrab` is a library and command-line tool for downloading a single
//! directory (or file) out of a GitHub repository, without cloning it.
//!
//! Given a URL such as `https://github.com/owner/repo/tree/main/docs`, it lists
//! the path through the GitHub contents API, walks every subdirectory
//! concurrently, and writes each file below a local `docs/` directory.
//!
//! As a library, it is split into small pieces that can be used on their own:
//! 1.  **Resolve**: [`git::resolve`] turns a URL into a [`RepoRef`].
//! 2.  **Talk to the host**: the [`RemoteClient`] trait, implemented by
//!     [`GitHubClient`] and by the in-memory [`MemoryClient`](git::MemoryClient).
//! 3.  **Download**: [`download::download_tree`] fans out one task per
//!     directory and file, bounded by a deadline and a [`CancellationToken`].
//!
//! # Example: Library Usage
//!
//! ```
//! use dirgrab::git::{resolve, MemoryClient};
//! use dirgrab::{download, CancellationToken, ConfigBuilder};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let out = tempfile::tempdir().unwrap();
//! let client = Arc::new(
//!     MemoryClient::new()
//!         .with_file("src/utils/strings.rs", "pub fn trim() {}")
//!         .with_file("src/utils/fs/walk.rs", "pub fn walk() {}"),
//! );
//!
//! let config = ConfigBuilder::new()
//!     .url("https://github.com/octo/widgets/tree/main/src/utils")
//!     .output_dir(out.path().to_str().unwrap())
//!     .build()
//!     .unwrap();
//! let repo = resolve("https://github.com/octo/widgets/tree/main/src/utils").unwrap();
//!
//! let summary = download(&repo, client, &config, &CancellationToken::new(), None)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(summary.files, 2);
//! assert!(out.path().join("utils/fs/walk.rs").exists());
//! # }
//! ```

pub mod cancellation;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core_types;
pub mod credentials;
pub mod download;
pub mod errors;
pub mod git;
pub mod output;
pub mod prelude;
pub mod progress;
pub mod signal;
pub mod status;

// Re-export key public types for easier use as a library
pub use cancellation::CancellationToken;
pub use config::{Action, Config, ConfigBuilder};
pub use core_types::{DownloadSummary, RepoRef};
pub use git::{GitHubClient, RemoteClient};

use crate::credentials::CredentialStore;
use crate::download::{download_tree, DownloadOptions};
use crate::errors::{io_error_with_path, Result};
use crate::progress::ProgressReporter;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

/// Downloads the tree behind `repo` as configured by `config`.
///
/// This is [`download_tree`] with its options taken from a [`Config`] and its
/// [`Outcome`](download::Outcome) turned into a `Result`.
///
/// # Errors
/// Returns the first download error (or [`Error::Multiple`](errors::Error::Multiple)
/// when collecting errors), [`Error::DeadlineExceeded`](errors::Error::DeadlineExceeded),
/// or [`Error::Cancelled`](errors::Error::Cancelled).
pub async fn download(
    repo: &RepoRef,
    client: Arc<dyn RemoteClient>,
    config: &Config,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
) -> Result<DownloadSummary> {
    let options = DownloadOptions::new(&config.output_dir)
        .deadline(config.timeout)
        .error_policy(config.error_policy)
        .progress(progress.clone());

    let result = download_tree(repo, client, options, token).await.into_result();

    if let Some(progress) = progress {
        let message = match &result {
            Ok(_) => "done".to_string(),
            Err(e) if e.is_cancelled() => "cancelled".to_string(),
            Err(_) => "failed".to_string(),
        };
        progress.finish_with_message(message);
    }
    result
}

/// Returns the one-line authorization and rate limit report for `--check`.
pub async fn check_status(client: &dyn RemoteClient, has_token: bool) -> Result<String> {
    let rate = client.rate_limit().await?;
    Ok(status::format_status(&rate, has_token))
}

/// Returns the `Authenticated as @login` line for `--auth`.
pub async fn authenticated_user(client: &dyn RemoteClient) -> Result<String> {
    let user = client.authenticated_user().await?;
    Ok(status::format_auth(&user))
}

/// Executes the action in `config` against an explicit remote client.
///
/// User-facing lines are written to `out`; diagnostics go through the logger.
/// [`Action::Help`] is a no-op here, printing usage is left to the caller.
pub async fn execute(
    config: &Config,
    client: Arc<dyn RemoteClient>,
    store: &dyn CredentialStore,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
    out: &mut dyn Write,
) -> Result<()> {
    let line = match &config.action {
        Action::Download { url } => {
            let repo = git::resolve(url)?;
            let started = Instant::now();
            print_line(out, &format!("Downloading: {}", repo.root_path))?;

            let summary = download(&repo, client, config, token, progress).await?;
            format!(
                "Download Completed: {} files, {} bytes in {:.2?}",
                summary.files,
                summary.bytes,
                started.elapsed()
            )
        }
        Action::Check => check_status(client.as_ref(), config.token.is_some()).await?,
        Action::Auth => authenticated_user(client.as_ref()).await?,
        Action::SetToken(value) => {
            store.set(value)?;
            "Specified token was saved.".to_string()
        }
        Action::UnsetToken => {
            store.unset()?;
            "Specified token was deleted.".to_string()
        }
        Action::Help => {
            log::debug!("Nothing to execute.");
            return Ok(());
        }
    };
    print_line(out, &line)
}

/// Executes the action in `config` against the GitHub API at `config.api_url`.
///
/// This is the entry point used by the `dirgrab` binary.
pub async fn run(
    config: &Config,
    store: &dyn CredentialStore,
    token: &CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
    out: &mut dyn Write,
) -> Result<()> {
    let client = GitHubClient::new(&config.api_url, config.token.as_deref())?;
    execute(config, Arc::new(client), store, token, progress, out).await
}

fn print_line(out: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(out, "{}", line).map_err(|e| io_error_with_path(e, "<stdout>"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::FileCredentialStore;
    use crate::errors::Error;
    use crate::git::MemoryClient;
    use tempfile::tempdir;

    fn download_config(url: &str, output_dir: &std::path::Path) -> Config {
        ConfigBuilder::new()
            .url(url)
            .output_dir(output_dir.to_string_lossy())
            .build()
            .unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_execute_download_reports_completion() {
        let out_dir = tempdir().unwrap();
        let store_dir = tempdir().unwrap();
        let store = FileCredentialStore::with_path(store_dir.path().join("token"));
        let client = Arc::new(MemoryClient::new().with_file("docs/a.md", "A"));
        let config = download_config("github.com/o/r/tree/main/docs", out_dir.path());

        let mut out = Vec::new();
        execute(&config, client, &store, &CancellationToken::new(), None, &mut out)
            .await
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Downloading: docs\n"));
        assert!(printed.contains("Download Completed: 1 files, 1 bytes"));
        assert!(out_dir.path().join("docs").join("a.md").exists());
    }

    #[tokio::test]
    async fn test_execute_rejects_bad_url_before_any_call() {
        let store_dir = tempdir().unwrap();
        let store = FileCredentialStore::with_path(store_dir.path().join("token"));
        let client = Arc::new(MemoryClient::new());
        let config = download_config("https://gitlab.com/o/r/tree/main/docs", store_dir.path());

        let mut out = Vec::new();
        let result = execute(
            &config,
            client.clone(),
            &store,
            &CancellationToken::new(),
            None,
            &mut out,
        )
        .await;

        assert!(matches!(result, Err(Error::InvalidSource)));
        assert_eq!(client.list_calls(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_execute_token_actions() {
        let store_dir = tempdir().unwrap();
        let store = FileCredentialStore::with_path(store_dir.path().join("token"));
        let client: Arc<dyn RemoteClient> = Arc::new(MemoryClient::new());
        let token = CancellationToken::new();

        let set = ConfigBuilder::new().set_token("ghp_abc").build().unwrap();
        let mut out = Vec::new();
        execute(&set, client.clone(), &store, &token, None, &mut out)
            .await
            .unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("ghp_abc"));

        let unset = ConfigBuilder::new().unset_token(true).build().unwrap();
        execute(&unset, client, &store, &token, None, &mut out)
            .await
            .unwrap();
        assert_eq!(store.get().unwrap(), None);

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Specified token was saved.\nSpecified token was deleted.\n"
        );
    }

    #[tokio::test]
    async fn test_check_and_auth_lines() {
        let client = MemoryClient::new()
            .with_rate_limit(MemoryClient::rate_limit_in(5000, 4999, 30))
            .with_user("octocat");

        let status = check_status(&client, true).await.unwrap();
        assert!(status.starts_with("Status: Authorized | Remaining rate limit: 4999"));
        assert_eq!(
            authenticated_user(&client).await.unwrap(),
            "Authenticated as @octocat"
        );
    }
}
