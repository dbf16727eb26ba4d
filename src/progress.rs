// src/progress.rs

//! Defines a trait for reporting progress of a running download.
#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;

/// A trait for reporting progress, abstracting over specific implementations like `indicatif`.
///
/// The total is not known up front: it grows as directories are listed and
/// files are discovered.
///
/// # Examples
///
/// ```
/// use dirgrab::progress::ProgressReporter;
/// use std::sync::atomic::{AtomicU64, Ordering};
///
/// #[derive(Default)]
/// struct Counting {
///     total: AtomicU64,
///     done: AtomicU64,
/// }
/// impl ProgressReporter for Counting {
///     fn inc_length(&self, delta: u64) {
///         self.total.fetch_add(delta, Ordering::SeqCst);
///     }
///     fn inc(&self, delta: u64) {
///         self.done.fetch_add(delta, Ordering::SeqCst);
///     }
///     fn set_message(&self, _msg: String) {}
///     fn println(&self, _line: String) {}
///     fn finish_with_message(&self, _msg: String) {}
/// }
///
/// let reporter = Counting::default();
/// reporter.inc_length(3);
/// reporter.inc(1);
/// assert_eq!(reporter.done.load(Ordering::SeqCst), 1);
/// ```
pub trait ProgressReporter: Send + Sync {
    /// Adds newly discovered files to the total.
    fn inc_length(&self, delta: u64);
    /// Marks files as written.
    fn inc(&self, delta: u64);
    /// Sets a descriptive message for the current operation (e.g., the file being saved).
    fn set_message(&self, msg: String);
    /// Prints a user-facing line such as `Downloading: <path>` without
    /// corrupting the progress display.
    fn println(&self, line: String);
    /// Finishes the progress reporting with a final message.
    fn finish_with_message(&self, msg: String);
}

/// A `ProgressReporter` that does nothing.
///
/// This is used as a default or in non-interactive environments where a progress
/// bar is not desired.
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn inc_length(&self, _delta: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn println(&self, _line: String) {}
    fn finish_with_message(&self, _msg: String) {}
}

/// A `ProgressReporter` that only prints the per-file lines on stdout.
///
/// Used when stderr is not a terminal, or when the `progress` feature is off.
pub struct LineProgress;

impl ProgressReporter for LineProgress {
    fn inc_length(&self, _delta: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}

    fn println(&self, line: String) {
        // A closed stdout (e.g. `| head`) must not abort the download.
        let _ = writeln!(std::io::stdout().lock(), "{}", line);
    }

    fn finish_with_message(&self, _msg: String) {}
}

/// An implementation of `ProgressReporter` using the `indicatif` crate.
#[cfg(feature = "progress")]
#[derive(Clone)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

#[cfg(feature = "progress")]
impl IndicatifProgress {
    /// Creates a new progress bar with a default style.
    pub fn new() -> Self {
        let pb = ProgressBar::new(0);
        // Keeps the default style if the template fails to parse.
        if let Ok(style) = ProgressStyle::default_bar().template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Self { bar: pb }
    }
}

#[cfg(feature = "progress")]
impl Default for IndicatifProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "progress")]
impl ProgressReporter for IndicatifProgress {
    fn inc_length(&self, delta: u64) {
        self.bar.inc_length(delta);
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn println(&self, line: String) {
        self.bar.println(line);
    }

    fn finish_with_message(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}
