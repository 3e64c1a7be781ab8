//! Phase tracking shared by the transfer and land submission workflows.
//!
//! A workflow moves through `Validating -> UploadingDocument -> Saving ->
//! Succeeded`, or ends in `Failed(reason)` from any active phase. At most one
//! submission per workflow instance runs at a time.

use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

/// Notification title for a submission attempted without a session.
pub const AUTHENTICATION_ERROR_TITLE: &str = "Authentication error";

/// Phase of the current or last submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Checking the form fields.
    Validating,
    /// Hosting the supporting or contract document.
    UploadingDocument,
    /// Writing the row that references the uploaded document.
    Saving,
    /// The row was written.
    Succeeded,
    /// The submission stopped with this user-facing reason.
    Failed(String),
}

impl SubmissionPhase {
    /// Whether a remote call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::UploadingDocument | Self::Saving)
    }
}

/// Held for the duration of one submission; releases the flag on drop.
struct SubmissionGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmissionGuard<'a> {
    /// Claim the flag, or `None` when another submission holds it.
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Publishes the phase of one workflow and keeps its submissions single-flight.
pub(crate) struct PhaseTracker {
    phase: watch::Sender<SubmissionPhase>,
    in_flight: AtomicBool,
}

impl PhaseTracker {
    pub(crate) fn new() -> Self {
        let (phase, _rx) = watch::channel(SubmissionPhase::Idle);
        Self {
            phase,
            in_flight: AtomicBool::new(false),
        }
    }

    pub(crate) fn state(&self) -> SubmissionPhase {
        self.phase.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<SubmissionPhase> {
        self.phase.subscribe()
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.phase.borrow().is_busy()
    }

    pub(crate) fn enter(&self, phase: SubmissionPhase) {
        self.phase.send_replace(phase);
    }

    /// Run `work` unless another submission holds the tracker, in which case
    /// `busy` is returned and the phase is left alone. The outcome settles
    /// the phase into `Succeeded` or `Failed`.
    pub(crate) async fn run<T, E, F>(&self, busy: E, work: F) -> Result<T, E>
    where
        E: Display,
        F: Future<Output = Result<T, E>>,
    {
        let Some(_guard) = SubmissionGuard::acquire(&self.in_flight) else {
            return Err(busy);
        };
        let outcome = work.await;
        self.enter(match &outcome {
            Ok(_) => SubmissionPhase::Succeeded,
            Err(err) => SubmissionPhase::Failed(err.to_string()),
        });
        outcome
    }
}
