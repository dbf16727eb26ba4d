//! The concurrent tree download engine.
//!
//! The shape of the remote tree is unknown up front, so there is no fixed
//! worker pool: every listed directory and every discovered file becomes its
//! own tokio task. Completion is detected with a shared outstanding-work
//! counter. A directory task only stops counting itself once all of its
//! children have been registered, so the counter cannot reach zero while
//! unexpanded subtrees remain.
//!
//! The result of the whole operation is published once through a single-slot
//! signal. The caller waits for it, for the deadline, or for cancellation,
//! whichever comes first. When [`download_tree`] returns, every worker that is
//! still running is cancelled and abandons its in-flight request.

use crate::cancellation::CancellationToken;
use crate::constants::DEFAULT_DOWNLOAD_DEADLINE;
use crate::core_types::{DownloadSummary, Listing, ListingEntry, RepoRef};
use crate::errors::{Error, Result};
use crate::git::RemoteClient;
use crate::output::FileWriter;
use crate::progress::ProgressReporter;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

mod tracker;

use tracker::{CompletionTracker, WorkGuard};

/// What to do when more than one worker fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Report the first failure as soon as it happens; later failures are dropped.
    #[default]
    FirstError,
    /// Let every worker finish and report all failures together.
    CollectAll,
}

/// The terminal state of a tree download.
#[derive(Debug)]
pub enum Outcome {
    /// Every file under the root was written.
    Success(DownloadSummary),
    /// At least one listing, fetch, or write failed.
    Failed(Error),
    /// The cancellation token fired before the download finished.
    Cancelled,
    /// The download did not finish within the given deadline.
    DeadlineExceeded(Duration),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Converts the outcome into a `Result`, mapping every non-success state
    /// onto the matching [`Error`] variant.
    pub fn into_result(self) -> Result<DownloadSummary> {
        match self {
            Outcome::Success(summary) => Ok(summary),
            Outcome::Failed(err) => Err(err),
            Outcome::Cancelled => Err(Error::Cancelled),
            Outcome::DeadlineExceeded(deadline) => Err(Error::DeadlineExceeded(deadline)),
        }
    }
}

/// Settings for one [`download_tree`] call.
#[derive(Clone)]
pub struct DownloadOptions {
    /// Local directory the destination root is created in.
    pub output_dir: PathBuf,
    /// Upper bound for the whole operation.
    pub deadline: Duration,
    /// How concurrent failures are reported.
    pub error_policy: ErrorPolicy,
    /// Optional progress sink, updated as files are discovered and written.
    pub progress: Option<Arc<dyn ProgressReporter>>,
}

impl DownloadOptions {
    /// Options writing into `output_dir` with the default deadline and error policy.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            deadline: DEFAULT_DOWNLOAD_DEADLINE,
            error_policy: ErrorPolicy::default(),
            progress: None,
        }
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn progress(mut self, progress: Option<Arc<dyn ProgressReporter>>) -> Self {
        self.progress = progress;
        self
    }
}

// Custom Debug implementation, as dyn ProgressReporter does not implement Debug.
impl fmt::Debug for DownloadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadOptions")
            .field("output_dir", &self.output_dir)
            .field("deadline", &self.deadline)
            .field("error_policy", &self.error_policy)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// State shared by every worker of one download.
struct TreeJob {
    repo: RepoRef,
    client: Arc<dyn RemoteClient>,
    writer: FileWriter,
    token: CancellationToken,
    progress: Option<Arc<dyn ProgressReporter>>,
}

/// Downloads every file below `repo.root_path` into `options.output_dir`.
///
/// Files land under a directory named after the last segment of the root
/// path; a root path that points at a single file writes just that file.
/// Sibling files and directories are processed concurrently and in no
/// particular order.
///
/// Returns [`Outcome::Success`] once everything was written,
/// [`Outcome::Failed`] as soon as one listing, fetch, or write fails (or once
/// all workers finished, with [`ErrorPolicy::CollectAll`]),
/// [`Outcome::DeadlineExceeded`] when `options.deadline` elapses first, and
/// [`Outcome::Cancelled`] when `token` is cancelled first. Files written
/// before a failure stay on disk.
///
/// # Examples
///
/// ```
/// use dirgrab::download::{download_tree, DownloadOptions, Outcome};
/// use dirgrab::git::{resolve, MemoryClient};
/// use dirgrab::CancellationToken;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let out = tempfile::tempdir().unwrap();
/// let client = Arc::new(MemoryClient::new().with_file("docs/guide.md", "# Guide"));
/// let repo = resolve("https://github.com/octo/widgets/tree/main/docs").unwrap();
///
/// let outcome = download_tree(
///     &repo,
///     client,
///     DownloadOptions::new(out.path()),
///     &CancellationToken::new(),
/// )
/// .await;
///
/// assert!(outcome.is_success());
/// assert!(out.path().join("docs").join("guide.md").exists());
/// # }
/// ```
#[tracing::instrument(skip_all, fields(repo = %repo))]
pub async fn download_tree(
    repo: &RepoRef,
    client: Arc<dyn RemoteClient>,
    options: DownloadOptions,
    token: &CancellationToken,
) -> Outcome {
    let DownloadOptions {
        output_dir,
        deadline,
        error_policy,
        progress,
    } = options;

    // Cancelled when this function returns, so no worker outlives the call.
    let workers = token.child_token();
    let (root_guard, outcome_rx) = CompletionTracker::new(error_policy, workers.clone());

    let job = Arc::new(TreeJob {
        repo: repo.clone(),
        client,
        writer: FileWriter::new(output_dir, repo.root_path.clone()),
        token: workers.clone(),
        progress,
    });
    log::debug!("Starting download of {} (deadline {:?})", repo, deadline);
    job.spawn_listing(repo.root_path.clone(), root_guard);

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => Outcome::Cancelled,
        // The slot only drops unpublished when the runtime is shutting down.
        received = outcome_rx => received.unwrap_or(Outcome::Cancelled),
        _ = tokio::time::sleep(deadline) => Outcome::DeadlineExceeded(deadline),
    };
    workers.cancel();

    log::debug!("Download of {} finished: {:?}", repo, outcome);
    outcome
}

impl TreeJob {
    /// Spawns a worker that lists `path` and dispatches its children.
    fn spawn_listing(self: &Arc<Self>, path: String, guard: WorkGuard) {
        let job = Arc::clone(self);
        tokio::spawn(
            async move {
                job.expand(&path, &guard).await;
            }
            .in_current_span(),
        );
    }

    /// Spawns a worker that downloads and writes one file.
    fn spawn_file(self: &Arc<Self>, path: String, download_url: String, guard: WorkGuard) {
        let job = Arc::clone(self);
        tokio::spawn(
            async move {
                if let Err(e) = job.download_file(&path, &download_url, &guard).await {
                    guard.tracker().fail(e);
                }
            }
            .in_current_span(),
        );
    }

    async fn expand(self: &Arc<Self>, path: &str, guard: &WorkGuard) {
        let listing = match self.remote(self.client.list_path(&self.repo, path)).await {
            Ok(listing) => listing,
            Err(e) => return guard.tracker().fail(e),
        };

        match listing {
            // The root path pointed directly at a file.
            Listing::File { path, download_url } => {
                if let Err(e) = self.download_file(&path, &download_url, guard).await {
                    guard.tracker().fail(e);
                }
            }
            Listing::Directory(entries) => {
                tracing::debug!(path, entries = entries.len(), "listed directory");
                for entry in entries {
                    let child = guard.begin();
                    match entry {
                        ListingEntry::File { path, download_url } => {
                            self.spawn_file(path, download_url, child)
                        }
                        ListingEntry::Directory { path } => self.spawn_listing(path, child),
                    }
                }
            }
        }
    }

    async fn download_file(&self, path: &str, download_url: &str, guard: &WorkGuard) -> Result<()> {
        if path.is_empty() || download_url.is_empty() {
            return Err(Error::InvalidPathUrl {
                path: path.to_string(),
                url: download_url.to_string(),
            });
        }

        tracing::debug!(path, "downloading file");
        if let Some(progress) = &self.progress {
            progress.inc_length(1);
            progress.set_message(path.to_string());
            progress.println(format!("Downloading: {}", path));
        }

        let content = self.remote(self.client.fetch(download_url)).await?;
        if let Some(progress) = &self.progress {
            progress.println(format!("Saving: {}", self.writer.destination(path)?.display()));
        }
        let written = self.remote(self.writer.write(path, content)).await?;
        guard.tracker().record_file(written);

        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        Ok(())
    }

    /// Runs one remote call or write, abandoning it if the download is cancelled.
    async fn remote<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        self.token
            .run_until_cancelled(call)
            .await
            .unwrap_or(Err(Error::Cancelled))
    }
}
