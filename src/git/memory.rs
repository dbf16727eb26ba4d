//! An in-memory [`RemoteClient`], for tests and offline use of the engine.

use super::client::RemoteClient;
use crate::core_types::{ByteStream, Listing, ListingEntry, RateLimit, RepoRef, UserIdentity};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

const URL_SCHEME: &str = "memory://";

/// A repository tree held in memory.
///
/// Directories are implied by file paths. Listings and fetches can be slowed
/// down or made to fail per path, which makes it possible to exercise every
/// scheduling and failure path of the download engine deterministically.
///
/// # Examples
///
/// ```
/// use dirgrab::git::{MemoryClient, RemoteClient};
/// use dirgrab::core_types::{Listing, RepoRef};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let client = MemoryClient::new()
///     .with_file("docs/a.md", "A")
///     .with_file("docs/sub/b.md", "B");
/// let repo = RepoRef {
///     owner: "o".into(),
///     repo: "r".into(),
///     git_ref: "main".into(),
///     root_path: "docs".into(),
/// };
///
/// match client.list_path(&repo, "docs").await.unwrap() {
///     Listing::Directory(entries) => assert_eq!(entries.len(), 2),
///     Listing::File { .. } => unreachable!(),
/// }
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryClient {
    files: BTreeMap<String, Vec<u8>>,
    missing_urls: HashSet<String>,
    list_delays: HashMap<String, Duration>,
    fetch_delays: HashMap<String, Duration>,
    failing_lists: HashSet<String>,
    failing_fetches: HashSet<String>,
    rate: Option<RateLimit>,
    user: Option<String>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file; its parent directories exist implicitly.
    pub fn with_file(mut self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), content.into());
        self
    }

    /// Adds a file whose listing entry carries no download URL.
    pub fn with_unfetchable_file(mut self, path: &str) -> Self {
        self.files.insert(path.to_string(), Vec::new());
        self.missing_urls.insert(path.to_string());
        self
    }

    /// Delays every listing of `path`.
    pub fn with_list_delay(mut self, path: &str, delay: Duration) -> Self {
        self.list_delays.insert(path.to_string(), delay);
        self
    }

    /// Delays every fetch of the file at `path`.
    pub fn with_fetch_delay(mut self, path: &str, delay: Duration) -> Self {
        self.fetch_delays.insert(path.to_string(), delay);
        self
    }

    /// Makes listing `path` fail with `ContentsUnavailable`.
    pub fn with_failing_list(mut self, path: &str) -> Self {
        self.failing_lists.insert(path.to_string());
        self
    }

    /// Makes fetching the file at `path` fail with `FetchFailed`.
    pub fn with_failing_fetch(mut self, path: &str) -> Self {
        self.failing_fetches.insert(path.to_string());
        self
    }

    /// Sets the counters returned by `rate_limit`.
    pub fn with_rate_limit(mut self, rate: RateLimit) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Sets the login returned by `authenticated_user`.
    pub fn with_user(mut self, login: &str) -> Self {
        self.user = Some(login.to_string());
        self
    }

    /// Number of `list_path` calls made so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of `fetch` calls made so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// The download URL handed out for the file at `path`.
    pub fn download_url(path: &str) -> String {
        format!("{}{}", URL_SCHEME, path)
    }

    fn file_url(&self, path: &str) -> String {
        if self.missing_urls.contains(path) {
            String::new()
        } else {
            Self::download_url(path)
        }
    }

    fn file_entry(&self, path: &str) -> ListingEntry {
        ListingEntry::File {
            path: path.to_string(),
            download_url: self.file_url(path),
        }
    }

    /// Immediate children of the directory at `dir` ("" is the repository root).
    fn children(&self, dir: &str) -> Vec<ListingEntry> {
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{}/", dir)
        };

        let mut files = Vec::new();
        let mut dirs = BTreeSet::new();
        for path in self.files.keys() {
            let Some(rest) = path.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                Some((child_dir, _)) => {
                    dirs.insert(format!("{}{}", prefix, child_dir));
                }
                None => files.push(self.file_entry(path)),
            }
        }

        files
            .into_iter()
            .chain(dirs.into_iter().map(|path| ListingEntry::Directory { path }))
            .collect()
    }
}

#[async_trait]
impl RemoteClient for MemoryClient {
    async fn list_path(&self, _repo: &RepoRef, path: &str) -> Result<Listing> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing_lists.contains(path) {
            return Err(Error::ContentsUnavailable {
                path: path.to_string(),
                reason: "simulated failure".to_string(),
            });
        }
        if self.files.contains_key(path) {
            return Ok(Listing::File {
                path: path.to_string(),
                download_url: self.file_url(path),
            });
        }

        let children = self.children(path);
        if children.is_empty() {
            return Err(Error::ContentsUnavailable {
                path: path.to_string(),
                reason: "404 Not Found".to_string(),
            });
        }
        Ok(Listing::Directory(children))
    }

    async fn fetch(&self, download_url: &str) -> Result<ByteStream> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let failed = |reason: &str| Error::FetchFailed {
            url: download_url.to_string(),
            reason: reason.to_string(),
        };

        let path = download_url
            .strip_prefix(URL_SCHEME)
            .ok_or_else(|| failed("unknown url scheme"))?;
        if let Some(delay) = self.fetch_delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing_fetches.contains(path) {
            return Err(failed("simulated failure"));
        }
        let content = self.files.get(path).ok_or_else(|| failed("404 Not Found"))?;

        // Two chunks, so writers are exercised with a real multi-chunk stream.
        let (head, tail) = content.split_at(content.len() / 2);
        let chunks = vec![Ok(head.to_vec()), Ok(tail.to_vec())];
        Ok(futures::stream::iter(chunks).boxed())
    }

    async fn rate_limit(&self) -> Result<RateLimit> {
        self.rate
            .ok_or_else(|| Error::RateLimitUnavailable("no rate limit configured".to_string()))
    }

    async fn authenticated_user(&self) -> Result<UserIdentity> {
        self.user
            .clone()
            .map(|login| UserIdentity { login })
            .ok_or_else(|| Error::AuthUnavailable("401 Unauthorized".to_string()))
    }
}

impl MemoryClient {
    /// A rate limit resetting `minutes` from now, handy for status tests.
    pub fn rate_limit_in(limit: u64, remaining: u64, minutes: u64) -> RateLimit {
        RateLimit {
            limit,
            remaining,
            reset: SystemTime::now() + Duration::from_secs(minutes * 60),
        }
    }
}
