//! Submission state machine.
//!
//! ```text
//! Idle -> Submitting -> Succeeded
//!                    -> Failed(kind)
//! Succeeded | Failed -> Idle
//! ```
//!
//! Only one submission may be `Submitting` at a time. A second `try_begin` while
//! one is pending is rejected without touching the pending one.

use super::errors::{ErrorKind, SubmitError};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed(ErrorKind),
}

impl SubmissionState {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// `Idle -> Submitting`; any other start state is refused.
    #[must_use]
    pub const fn begin(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Submitting),
            _ => None,
        }
    }

    /// `Submitting -> Succeeded | Failed(kind)`.
    #[must_use]
    pub const fn settle(self, outcome: Result<(), ErrorKind>) -> Option<Self> {
        match (self, outcome) {
            (Self::Submitting, Ok(())) => Some(Self::Succeeded),
            (Self::Submitting, Err(kind)) => Some(Self::Failed(kind)),
            _ => None,
        }
    }

    /// `Succeeded | Failed -> Idle`; `Idle` stays `Idle`.
    #[must_use]
    pub const fn reset(self) -> Option<Self> {
        match self {
            Self::Idle | Self::Succeeded | Self::Failed(_) => Some(Self::Idle),
            Self::Submitting => None,
        }
    }
}

/// Shared holder for the current `SubmissionState`.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    state: Mutex<SubmissionState>,
}

impl SubmissionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // The state is `Copy`; a poisoned lock still holds a valid value.
    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn current(&self) -> SubmissionState {
        *self.lock()
    }

    /// Settled outcomes go back to `Idle` first, so a resubmission after a
    /// failure needs no explicit `reset`.
    ///
    /// # Errors
    /// Returns `SubmitError::InProgress` while another submission is pending.
    pub fn try_begin(&self) -> Result<InFlight<'_>, SubmitError> {
        let mut state = self.lock();
        let next = state
            .reset()
            .and_then(SubmissionState::begin)
            .ok_or(SubmitError::InProgress)?;
        debug!(from = ?*state, to = ?next, "submission state transition");
        *state = next;
        Ok(InFlight {
            tracker: self,
            settled: false,
        })
    }

    /// Returns `false` if a submission is pending.
    pub fn reset(&self) -> bool {
        let mut state = self.lock();
        match state.reset() {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        }
    }

    fn settle(&self, outcome: Result<(), ErrorKind>) {
        let mut state = self.lock();
        if let Some(next) = state.settle(outcome) {
            debug!(from = ?*state, to = ?next, "submission state transition");
            *state = next;
        }
    }
}

/// Token for the pending submission. Dropping it unsettled (the submit future
/// was cancelled) returns the tracker to `Idle`.
#[derive(Debug)]
pub struct InFlight<'a> {
    tracker: &'a SubmissionTracker,
    settled: bool,
}

impl InFlight<'_> {
    pub fn succeed(mut self) {
        self.settled = true;
        self.tracker.settle(Ok(()));
    }

    pub fn fail(mut self, kind: ErrorKind) {
        self.settled = true;
        self.tracker.settle(Err(kind));
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            *self.tracker.lock() = SubmissionState::Idle;
        }
    }
}
