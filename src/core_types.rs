//! Defines core data structures shared by the resolver, the remote client and
//! the download engine.

use crate::errors::Result;
use futures::stream::BoxStream;
use std::fmt;
use std::time::SystemTime;

/// A stream of byte chunks making up the content of a remote file.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>>>;

/// A resolved reference to a path inside a GitHub repository.
///
/// Produced by [`resolve`](crate::git::resolve). All fields are non-empty and
/// `root_path` never contains `..` segments.
///
/// # Examples
///
/// ```
/// use dirgrab::git::resolve;
///
/// let repo = resolve("https://github.com/rust-lang/cargo/tree/master/src/cargo").unwrap();
/// assert_eq!(repo.owner, "rust-lang");
/// assert_eq!(repo.repo, "cargo");
/// assert_eq!(repo.git_ref, "master");
/// assert_eq!(repo.root_path, "src/cargo");
/// assert_eq!(repo.to_string(), "rust-lang/cargo@master:src/cargo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    /// The user or organization owning the repository.
    pub owner: String,
    /// The repository name.
    pub repo: String,
    /// The branch, tag, or commit the tree is pinned to.
    pub git_ref: String,
    /// Forward-slash separated path of the file or directory to download.
    pub root_path: String,
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}@{}:{}",
            self.owner, self.repo, self.git_ref, self.root_path
        )
    }
}

/// One child of a remote directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingEntry {
    /// A regular file with the URL its raw content can be fetched from.
    File { path: String, download_url: String },
    /// A subdirectory that has to be listed on its own.
    Directory { path: String },
}

impl ListingEntry {
    /// The repository-relative path of the entry.
    pub fn path(&self) -> &str {
        match self {
            ListingEntry::File { path, .. } | ListingEntry::Directory { path } => path,
        }
    }
}

/// The result of listing a remote path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// The path points directly at a file.
    File { path: String, download_url: String },
    /// The path is a directory; holds its immediate children.
    Directory(Vec<ListingEntry>),
}

/// Rate limit counters of the core API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Requests allowed per window.
    pub limit: u64,
    /// Requests left in the current window.
    pub remaining: u64,
    /// When the current window resets.
    pub reset: SystemTime,
}

/// The user a credential belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub login: String,
}

/// Counters reported after a successful download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Number of files written.
    pub files: u64,
    /// Total number of bytes written.
    pub bytes: u64,
}
