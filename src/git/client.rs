//! The seam between the download engine and a remote repository host.

use crate::core_types::{ByteStream, Listing, RateLimit, RepoRef, UserIdentity};
use crate::errors::Result;
use async_trait::async_trait;

/// Operations the download engine and the status commands need from a
/// repository host.
///
/// Every call is independently fallible and never retried by the caller.
/// Implementations must be cheap to share between tasks (`Send + Sync`); the
/// engine holds them behind an `Arc<dyn RemoteClient>`.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Lists `path` at `repo.git_ref`.
    ///
    /// Returns `Listing::File` when the path is a file and
    /// `Listing::Directory` with the immediate children otherwise. Fails with
    /// [`Error::ContentsUnavailable`](crate::errors::Error::ContentsUnavailable).
    async fn list_path(&self, repo: &RepoRef, path: &str) -> Result<Listing>;

    /// Opens a stream over the raw bytes behind `download_url`.
    ///
    /// Fails with [`Error::FetchFailed`](crate::errors::Error::FetchFailed),
    /// either up front or from the stream itself.
    async fn fetch(&self, download_url: &str) -> Result<ByteStream>;

    /// Returns the core rate limit counters.
    async fn rate_limit(&self) -> Result<RateLimit>;

    /// Returns the identity the configured credential belongs to.
    async fn authenticated_user(&self) -> Result<UserIdentity>;
}
