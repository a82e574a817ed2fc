//! # Payment Completion Tracker
//!
//! Initiates one STK push charge and polls its status to a single final
//! [`Outcome`].
//!
//! ## Loop
//!
//! Each iteration increments the attempt counter, queries status, reports
//! [`Progress`], and stops on a terminal status. A failed status query is
//! treated as `PENDING`: one network blip must not fail the whole flow.
//! Between iterations the task suspends for `poll_interval` with
//! `tokio::time::sleep`, never blocking the runtime thread. There is no
//! wait after the final attempt.
//!
//! ## Budget
//!
//! `max_attempts` bounds the number of status queries. Under slow networks
//! the wall-clock time can exceed `poll_interval * max_attempts` by the
//! query latency; set [`TrackerOptions::deadline`] for a strict bound.
//!
//! ## Lifecycle
//!
//! Every step moves through [`TrackerState::transition`]. Initiation happens
//! once per call; retrying after any non-success outcome means calling the
//! tracker again, which issues a new charge with a new payment identifier.

use std::time::Duration;

use stkpay_core::{Msisdn, MsisdnRules, Outcome, PaymentId, PaymentStatus, TrackerState};
use tokio::time::Instant;

use crate::cancel::CancelToken;
use crate::config::ConfigError;
use crate::gateway::PaymentGateway;

/// Reason reported when initiation fails without an upstream message.
pub const GENERIC_INITIATION_REASON: &str = "Failed to initiate payment";

/// Polling parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Wait between status queries (default 2s).
    pub poll_interval: Duration,
    /// Maximum number of status queries (default 30).
    pub max_attempts: u32,
    /// Optional wall-clock bound measured from the end of initiation.
    pub deadline: Option<Duration>,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            max_attempts: 30,
            deadline: None,
        }
    }
}

impl TrackerOptions {
    /// Load overrides from `STKPAY_POLL_INTERVAL_MS`, `STKPAY_MAX_ATTEMPTS`
    /// and `STKPAY_DEADLINE_SECS`; unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but is
    /// not a non-negative integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();
        if let Some(ms) = env_u64("STKPAY_POLL_INTERVAL_MS")? {
            options.poll_interval = Duration::from_millis(ms);
        }
        if let Some(n) = env_u64("STKPAY_MAX_ATTEMPTS")? {
            options.max_attempts = u32::try_from(n).map_err(|_| ConfigError::InvalidValue {
                var: "STKPAY_MAX_ATTEMPTS".into(),
                reason: format!("{n} exceeds u32"),
            })?;
        }
        if let Some(secs) = env_u64("STKPAY_DEADLINE_SECS")? {
            options.deadline = Some(Duration::from_secs(secs));
        }
        Ok(options)
    }

    /// Set the wait between status queries.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set the maximum number of status queries.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set a wall-clock deadline.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Nominal time budget: `poll_interval * max_attempts`, capped by the
    /// deadline when one is set.
    pub fn effective_timeout(&self) -> Duration {
        let nominal = self.poll_interval.saturating_mul(self.max_attempts);
        match self.deadline {
            Some(deadline) => nominal.min(deadline),
            None => nominal,
        }
    }
}

fn env_u64(var: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                var: var.to_string(),
                reason: format!("'{raw}': {e}"),
            }),
        Err(_) => Ok(None),
    }
}

/// One observation reported after each status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Normalized status; `Pending` when the query itself failed.
    pub status: PaymentStatus,
}

/// Detailed result of a tracking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackReport {
    /// Final outcome.
    pub outcome: Outcome,
    /// Identifier of the charge, if initiation succeeded.
    pub payment_id: Option<PaymentId>,
    /// Number of status queries issued.
    pub attempts: u32,
    /// Terminal lifecycle state.
    pub state: TrackerState,
}

/// Drives one charge per call from initiation to a terminal outcome.
#[derive(Debug, Clone)]
pub struct PaymentTracker<G> {
    gateway: G,
    options: TrackerOptions,
    rules: MsisdnRules,
}

impl<G: PaymentGateway> PaymentTracker<G> {
    /// Tracker with default options and Kenyan numbering rules.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            options: TrackerOptions::default(),
            rules: MsisdnRules::kenya(),
        }
    }

    /// Replace polling options.
    pub fn with_options(mut self, options: TrackerOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace numbering rules.
    pub fn with_rules(mut self, rules: MsisdnRules) -> Self {
        self.rules = rules;
        self
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Current polling options.
    pub fn options(&self) -> &TrackerOptions {
        &self.options
    }

    /// Initiate a charge and track it to completion.
    pub async fn initiate_and_track(&self, phone: &str) -> Outcome {
        self.initiate_and_track_with(phone, |_| {}, &CancelToken::never())
            .await
            .outcome
    }

    /// Initiate a charge and track it, reporting progress after every poll
    /// and stopping early when `cancel` fires.
    pub async fn initiate_and_track_with<F>(
        &self,
        phone: &str,
        mut on_progress: F,
        cancel: &CancelToken,
    ) -> TrackReport
    where
        F: FnMut(Progress) + Send,
    {
        let mut session = Session::default();

        let msisdn = match Msisdn::parse_with(phone, &self.rules) {
            Ok(msisdn) => msisdn,
            Err(e) => {
                tracing::warn!(error = %e, "rejecting charge before initiation");
                return session.finish(Outcome::initiation_error(e.to_string()));
            }
        };

        if cancel.is_cancelled() {
            return session.finish(Outcome::CancelledByCaller);
        }

        let handle = match self.gateway.initiate_charge(&msisdn).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::warn!(
                    gateway = self.gateway.gateway_name(),
                    error = %e,
                    "STK push initiation failed"
                );
                let reason = e
                    .upstream_message()
                    .unwrap_or_else(|| GENERIC_INITIATION_REASON.to_string());
                return session.finish(Outcome::initiation_error(reason));
            }
        };

        let payment_id = handle.payment_id;
        session.advance(TrackerState::Initiated);
        session.payment_id = Some(payment_id.clone());
        tracing::info!(payment_id = %payment_id, msisdn = %msisdn, "STK push initiated");

        let deadline = self.options.deadline.map(|d| Instant::now() + d);

        loop {
            if session.attempts >= self.options.max_attempts
                || deadline.is_some_and(|d| Instant::now() >= d)
            {
                return session.finish(Outcome::Timeout);
            }
            if cancel.is_cancelled() {
                return session.finish(Outcome::CancelledByCaller);
            }

            session.attempts += 1;
            session.advance(TrackerState::Polling);
            let attempt = session.attempts;

            let queried = tokio::select! {
                result = self.gateway.payment_status(&payment_id) => result,
                _ = cancel.cancelled() => return session.finish(Outcome::CancelledByCaller),
            };
            let status = match queried {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(
                        payment_id = %payment_id,
                        attempt,
                        error = %e,
                        "status query failed, treating as pending"
                    );
                    PaymentStatus::Pending
                }
            };
            if status == PaymentStatus::Unknown {
                tracing::warn!(payment_id = %payment_id, attempt, "unrecognized payment status");
            }
            tracing::debug!(payment_id = %payment_id, attempt, status = %status, "polled");

            on_progress(Progress { attempt, status });

            match status {
                PaymentStatus::Success => return session.finish(Outcome::Success),
                PaymentStatus::Failed | PaymentStatus::Cancelled => {
                    return session.finish(Outcome::failed())
                }
                PaymentStatus::Pending | PaymentStatus::Unknown => {}
            }

            if session.attempts >= self.options.max_attempts {
                return session.finish(Outcome::Timeout);
            }

            let wait = match deadline {
                Some(d) => self
                    .options
                    .poll_interval
                    .min(d.saturating_duration_since(Instant::now())),
                None => self.options.poll_interval,
            };
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = cancel.cancelled() => return session.finish(Outcome::CancelledByCaller),
            }
        }
    }
}

/// Mutable bookkeeping for one call.
#[derive(Debug)]
struct Session {
    state: TrackerState,
    attempts: u32,
    payment_id: Option<PaymentId>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            state: TrackerState::Idle,
            attempts: 0,
            payment_id: None,
        }
    }
}

impl Session {
    fn advance(&mut self, to: TrackerState) {
        match self.state.transition(to) {
            Ok(next) => self.state = next,
            Err(e) => {
                // The report must still name the state the outcome implies.
                tracing::error!(error = %e, "tracker lifecycle violation");
                self.state = to;
            }
        }
    }

    fn finish(mut self, outcome: Outcome) -> TrackReport {
        self.advance(TrackerState::for_outcome(&outcome));
        tracing::info!(
            payment_id = ?self.payment_id.as_ref().map(PaymentId::as_str),
            attempts = self.attempts,
            outcome = outcome.kind(),
            "payment tracking finished"
        );
        TrackReport {
            outcome,
            payment_id: self.payment_id,
            attempts: self.attempts,
            state: self.state,
        }
    }
}
