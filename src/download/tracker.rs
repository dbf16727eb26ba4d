//! Completion tracking shared by every worker of one download.
//!
//! The tracker counts tasks that have not finished dispatching their work and
//! owns the single-slot outcome signal. A task holds a [`WorkGuard`] for as
//! long as it is outstanding; dropping the last guard publishes the final
//! outcome.

use super::{ErrorPolicy, Outcome};
use crate::cancellation::CancellationToken;
use crate::core_types::DownloadSummary;
use crate::errors::Error;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// A result holder that accepts exactly one publish.
#[derive(Debug)]
pub(super) struct OutcomeSlot {
    sender: Mutex<Option<oneshot::Sender<Outcome>>>,
}

impl OutcomeSlot {
    pub(super) fn new() -> (Self, oneshot::Receiver<Outcome>) {
        let (tx, rx) = oneshot::channel();
        let slot = Self {
            sender: Mutex::new(Some(tx)),
        };
        (slot, rx)
    }

    /// Publishes `outcome` unless something was published before, in which
    /// case the outcome is handed back.
    pub(super) fn publish(&self, outcome: Outcome) -> Result<(), Outcome> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match sender {
            // A dropped receiver means nobody is waiting any more; that still counts as published.
            Some(tx) => {
                let _ = tx.send(outcome);
                Ok(())
            }
            None => Err(outcome),
        }
    }
}

#[derive(Debug)]
pub(super) struct CompletionTracker {
    outstanding: AtomicUsize,
    slot: OutcomeSlot,
    policy: ErrorPolicy,
    errors: Mutex<Vec<Error>>,
    files: AtomicU64,
    bytes: AtomicU64,
    token: CancellationToken,
}

/// Keeps one unit of work outstanding until dropped.
#[derive(Debug)]
pub(super) struct WorkGuard {
    tracker: Arc<CompletionTracker>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.tracker.finish_one();
    }
}

impl CompletionTracker {
    /// Creates a tracker with one outstanding unit (the root task), returning
    /// the guard for that unit and the receiving end of the outcome slot.
    pub(super) fn new(
        policy: ErrorPolicy,
        token: CancellationToken,
    ) -> (WorkGuard, oneshot::Receiver<Outcome>) {
        let (slot, rx) = OutcomeSlot::new();
        let tracker = Arc::new(Self {
            outstanding: AtomicUsize::new(1),
            slot,
            policy,
            errors: Mutex::new(Vec::new()),
            files: AtomicU64::new(0),
            bytes: AtomicU64::new(0),
            token,
        });
        (WorkGuard { tracker }, rx)
    }

    /// Number of units still outstanding.
    #[cfg(test)]
    pub(super) fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Records a written file.
    pub(super) fn record_file(&self, bytes: u64) {
        self.files.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(bytes, Ordering::SeqCst);
    }

    /// Reports a failed unit according to the error policy.
    pub(super) fn fail(&self, err: Error) {
        if err.is_cancelled() {
            let _ = self.slot.publish(Outcome::Cancelled);
            return;
        }
        match self.policy {
            ErrorPolicy::FirstError => {
                if let Err(Outcome::Failed(dropped)) = self.slot.publish(Outcome::Failed(err)) {
                    log::debug!("Dropping error after the outcome was published: {}", dropped);
                }
            }
            ErrorPolicy::CollectAll => {
                log::warn!("{}", err);
                self.errors
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(err);
            }
        }
    }

    fn finish_one(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.complete();
        }
    }

    /// Publishes the final outcome once nothing is outstanding. A no-op if a
    /// failure was already published.
    fn complete(&self) {
        let outcome = if self.token.is_cancelled() {
            Outcome::Cancelled
        } else {
            let mut errors = std::mem::take(
                &mut *self
                    .errors
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()),
            );
            match errors.len() {
                0 => Outcome::Success(DownloadSummary {
                    files: self.files.load(Ordering::SeqCst),
                    bytes: self.bytes.load(Ordering::SeqCst),
                }),
                1 => Outcome::Failed(errors.remove(0)),
                _ => Outcome::Failed(Error::Multiple(errors)),
            }
        };
        let _ = self.slot.publish(outcome);
    }
}

impl WorkGuard {
    /// Registers another outstanding unit and returns its guard.
    pub(super) fn begin(&self) -> WorkGuard {
        self.tracker.outstanding.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            tracker: Arc::clone(&self.tracker),
        }
    }

    pub(super) fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }
}
