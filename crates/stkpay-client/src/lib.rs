//! # stkpay-client -- Payment completion tracking for STK push charges
//!
//! Drives a mobile-money charge from initiation to a single final
//! [`Outcome`](stkpay_core::Outcome):
//!
//! 1. Normalize and validate the phone number (no network call on failure).
//! 2. Initiate the charge once through a [`PaymentGateway`].
//! 3. Poll the payment status until success, failure/cancellation, the
//!    attempt budget runs out, or the caller cancels.
//!
//! ## Architecture
//!
//! [`PaymentTracker`] is generic over the [`PaymentGateway`] seam.
//! [`HttpGateway`] talks to the live gateway over `reqwest`; [`MockGateway`]
//! replays a script in-process for tests and dry runs. Each call site
//! (signup wizard, subscription page) supplies its own initiate path via a
//! [`CheckoutFlow`](stkpay_core::CheckoutFlow).
//!
//! ## Response Envelopes
//!
//! The gateway wraps payloads inconsistently (`{data:{data:{..}}}` or
//! `{data:{..}}`). See [`envelope`].

pub mod cancel;
pub mod config;
pub mod envelope;
pub mod error;
pub mod gateway;
pub mod http;
pub mod mock;
pub mod tracker;

pub use cancel::CancelToken;
pub use config::{ConfigError, GatewayConfig};
pub use error::GatewayError;
pub use gateway::PaymentGateway;
pub use http::HttpGateway;
pub use mock::MockGateway;
pub use tracker::{PaymentTracker, Progress, TrackReport, TrackerOptions};
