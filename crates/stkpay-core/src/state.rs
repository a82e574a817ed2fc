//! # Tracker State Machine
//!
//! ```text
//! Idle --initiate--> Initiated --first poll--> Polling
//! Polling --status=success--> Succeeded
//! Polling --status=failed|cancelled--> Failed
//! Polling --attempts exhausted--> TimedOut
//! Idle --initiate fails / no paymentId--> InitiationError
//! Idle|Initiated|Polling --caller cancels--> CancelledByCaller
//! ```
//!
//! `Initiated -> TimedOut` covers a zero-attempt budget or a deadline that
//! passes before the first poll. Terminal states accept no transitions;
//! retrying means a new session with a new payment identifier.

use serde::{Deserialize, Serialize};

use crate::error::TransitionError;
use crate::outcome::Outcome;

/// Lifecycle state of one tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackerState {
    /// Nothing sent yet.
    Idle,
    /// Initiation response received with a payment identifier.
    Initiated,
    /// At least one status query issued.
    Polling,
    /// Terminal: charge succeeded.
    Succeeded,
    /// Terminal: charge failed or was cancelled by the subscriber.
    Failed,
    /// Terminal: budget exhausted while pending.
    TimedOut,
    /// Terminal: charge never started.
    InitiationError,
    /// Terminal: caller stopped tracking.
    CancelledByCaller,
}

impl TrackerState {
    /// Whether this is a terminal state (no further transitions).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Succeeded
                | Self::Failed
                | Self::TimedOut
                | Self::InitiationError
                | Self::CancelledByCaller
        )
    }

    /// Move to `to`, rejecting transitions the lifecycle does not allow.
    ///
    /// `Polling -> Polling` is allowed: each further poll stays in the
    /// polling state.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] for any transition out of a terminal
    /// state or any edge not in the lifecycle diagram.
    pub fn transition(self, to: TrackerState) -> Result<TrackerState, TransitionError> {
        use TrackerState::*;
        let allowed = matches!(
            (self, to),
            (Idle, Initiated)
                | (Idle, InitiationError)
                | (Idle, CancelledByCaller)
                | (Initiated, Polling)
                | (Initiated, TimedOut)
                | (Initiated, CancelledByCaller)
                | (Polling, Polling)
                | (Polling, Succeeded)
                | (Polling, Failed)
                | (Polling, TimedOut)
                | (Polling, CancelledByCaller)
        );
        if allowed {
            Ok(to)
        } else {
            Err(TransitionError { from: self, to })
        }
    }

    /// The terminal state corresponding to an outcome.
    pub fn for_outcome(outcome: &Outcome) -> TrackerState {
        match outcome {
            Outcome::Success => Self::Succeeded,
            Outcome::Failed { .. } => Self::Failed,
            Outcome::Timeout => Self::TimedOut,
            Outcome::InitiationError { .. } => Self::InitiationError,
            Outcome::CancelledByCaller => Self::CancelledByCaller,
        }
    }
}

impl std::fmt::Display for TrackerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
