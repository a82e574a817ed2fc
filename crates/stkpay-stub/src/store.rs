// SPDX-License-Identifier: BUSL-1.1
//! In-memory payment store using DashMap.
//!
//! Scripted behaviour is keyed on the last three digits of the charged
//! number:
//! - `...000`: fails after the pending window
//! - `...999`: cancelled by the subscriber after the pending window
//! - `...111`: never leaves `PENDING`
//! - anything else: succeeds after the pending window

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use stkpay_core::PaymentStatus;

/// Status queries answered with `PENDING` before a scripted terminal status.
pub const DEFAULT_PENDING_POLLS: u32 = 2;

/// Raw spelling the endpoint uses for a successful charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessSpelling {
    /// `COMPLETED`, used by the generic payments endpoint.
    Completed,
    /// `SUCCESS`, used by subscription product endpoints.
    Success,
}

impl SuccessSpelling {
    fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Success => "SUCCESS",
        }
    }
}

/// One stub charge.
#[derive(Debug, Clone)]
pub struct StubPayment {
    pub msisdn: String,
    pub product: Option<String>,
    pub spelling: SuccessSpelling,
    pub polls: u32,
    pub created_at: DateTime<Utc>,
}

impl StubPayment {
    fn scripted_terminal(&self) -> Option<PaymentStatus> {
        if self.msisdn.ends_with("000") {
            Some(PaymentStatus::Failed)
        } else if self.msisdn.ends_with("999") {
            Some(PaymentStatus::Cancelled)
        } else if self.msisdn.ends_with("111") {
            None
        } else {
            Some(PaymentStatus::Success)
        }
    }

    /// Raw status string for the current poll count.
    pub fn raw_status(&self, pending_polls: u32) -> &'static str {
        if self.polls <= pending_polls {
            return PaymentStatus::Pending.as_str();
        }
        match self.scripted_terminal() {
            Some(PaymentStatus::Success) => self.spelling.as_str(),
            Some(status) => status.as_str(),
            None => PaymentStatus::Pending.as_str(),
        }
    }
}

struct Inner {
    payments: DashMap<String, StubPayment>,
    pending_polls: u32,
}

/// Shared application state.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_pending_polls(DEFAULT_PENDING_POLLS)
    }

    pub fn with_pending_polls(pending_polls: u32) -> Self {
        Self {
            inner: Arc::new(Inner {
                payments: DashMap::new(),
                pending_polls,
            }),
        }
    }

    pub fn payments(&self) -> &DashMap<String, StubPayment> {
        &self.inner.payments
    }

    pub fn pending_polls(&self) -> u32 {
        self.inner.pending_polls
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(msisdn: &str, spelling: SuccessSpelling, polls: u32) -> StubPayment {
        StubPayment {
            msisdn: msisdn.into(),
            product: None,
            spelling,
            polls,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn pending_window_then_spelled_success() {
        assert_eq!(payment("254712345678", SuccessSpelling::Completed, 2).raw_status(2), "PENDING");
        assert_eq!(payment("254712345678", SuccessSpelling::Completed, 3).raw_status(2), "COMPLETED");
        assert_eq!(payment("254712345678", SuccessSpelling::Success, 1).raw_status(0), "SUCCESS");
    }

    #[test]
    fn suffix_scripts() {
        assert_eq!(payment("254712345000", SuccessSpelling::Completed, 1).raw_status(0), "FAILED");
        assert_eq!(payment("254712345999", SuccessSpelling::Completed, 1).raw_status(0), "CANCELLED");
        assert_eq!(payment("254712345111", SuccessSpelling::Completed, 99).raw_status(0), "PENDING");
    }
}
