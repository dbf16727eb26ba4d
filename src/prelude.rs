//! The `dirgrab` prelude for convenient library usage.
//!
//! This module re-exports the most commonly used types, traits, and functions
//! from the `dirgrab` library. By importing everything from this prelude, you can
//! easily get started with using `dirgrab` programmatically.
//!
//! # Example
//!
//! ```
//! use dirgrab::prelude::*;
//! use std::sync::Arc;
//! # #[tokio::main]
//! # async fn main() -> Result<()> {
//!
//! // Now you can use resolve, MemoryClient, download_tree, etc. without full paths.
//! let out = tempfile::tempdir().unwrap();
//! let repo = resolve("github.com/octo/widgets/blob/main/README.md")?;
//! let client = Arc::new(MemoryClient::new().with_file("README.md", "# Widgets"));
//!
//! let outcome = download_tree(
//!     &repo,
//!     client,
//!     DownloadOptions::new(out.path()),
//!     &CancellationToken::new(),
//! )
//! .await;
//! let summary = outcome.into_result()?;
//! assert_eq!(summary.files, 1);
//!
//! # Ok(())
//! # }
//! ```

pub use crate::cancellation::CancellationToken;
pub use crate::config::{Action, Config, ConfigBuilder};
pub use crate::core_types::{ByteStream, DownloadSummary, Listing, ListingEntry, RepoRef};
pub use crate::credentials::{CredentialStore, FileCredentialStore};
pub use crate::download::{download_tree, DownloadOptions, ErrorPolicy, Outcome};
pub use crate::errors::{Error, Result};
pub use crate::git::{resolve, GitHubClient, MemoryClient, RemoteClient};
pub use crate::output::{destination_path, FileWriter};
pub use crate::progress::{NoOpProgress, ProgressReporter};
pub use crate::status::{format_auth, format_status};
pub use crate::{authenticated_user, check_status, download, execute, run};
