//! # Tracker Outcomes
//!
//! Every tracking session ends in exactly one [`Outcome`]. No error crosses
//! the tracker boundary; transport failures, malformed responses and
//! validation failures are all folded into an outcome value.

use serde::{Deserialize, Serialize};

/// Reason attached to [`Outcome::Failed`] when the gateway reports a failed
/// or cancelled charge.
pub const FAILED_REASON: &str = "Payment was cancelled or failed";

/// Final result of one tracking session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The gateway reported a successful charge.
    Success,
    /// The gateway reported a failed or cancelled charge.
    Failed {
        /// Human-readable reason.
        reason: String,
    },
    /// The attempt budget (or wall-clock deadline) ran out while the charge
    /// was still pending. The true state is unknown.
    Timeout,
    /// The charge never started: invalid number, gateway unreachable,
    /// rejected request, or no payment identifier in the response.
    InitiationError {
        /// Upstream message when available, else a generic one.
        reason: String,
    },
    /// The caller cancelled tracking before a terminal status was seen.
    CancelledByCaller,
}

impl Outcome {
    /// Shorthand for a gateway-reported failure.
    pub fn failed() -> Self {
        Self::Failed {
            reason: FAILED_REASON.to_string(),
        }
    }

    /// Shorthand for an initiation error.
    pub fn initiation_error(reason: impl Into<String>) -> Self {
        Self::InitiationError {
            reason: reason.into(),
        }
    }

    /// Whether the charge is known to have succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Whether re-invoking the tracker (with a brand-new charge) is a
    /// sensible next step for the user.
    pub fn is_retryable(&self) -> bool {
        !self.is_success()
    }

    /// Stable snake_case name of the outcome kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed { .. } => "failed",
            Self::Timeout => "timeout",
            Self::InitiationError { .. } => "initiation_error",
            Self::CancelledByCaller => "cancelled_by_caller",
        }
    }

    /// User-facing copy for this outcome.
    ///
    /// A timeout never claims failure: the charge may have completed
    /// out-of-band.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Success => "Payment received",
            Self::Failed { .. } => "Payment failed",
            Self::Timeout => "Payment is still pending. Check your messages",
            Self::InitiationError { .. } => "Payment failed to start",
            Self::CancelledByCaller => "Payment tracking was cancelled",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed { reason } | Self::InitiationError { reason } => {
                write!(f, "{}: {reason}", self.kind())
            }
            _ => f.write_str(self.kind()),
        }
    }
}
