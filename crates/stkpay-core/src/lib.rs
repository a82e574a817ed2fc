#![deny(missing_docs)]

//! # stkpay-core: Domain Primitives for STK Push Checkout
//!
//! This crate defines the types every other crate in the workspace depends
//! on. It performs no I/O and has no internal crate dependencies.
//!
//! ## Design Principles
//!
//! 1. **Validated newtypes.** A [`Msisdn`] can only be constructed through
//!    normalization plus validation, so a malformed number never reaches the
//!    gateway. A [`PaymentId`] is never blank.
//!
//! 2. **One status normalizer.** The gateway emits raw strings; every raw
//!    status flows through [`PaymentStatus::from_raw`]. `SUCCESS` and
//!    `COMPLETED` collapse to the same variant.
//!
//! 3. **Explicit state machine.** [`TrackerState`] enforces the tracker
//!    lifecycle. Terminal states reject every transition.
//!
//! 4. **Single outcome type.** Callers branch on [`Outcome`]; the
//!    [`CheckoutFlow`] adapter turns it into a [`FlowAction`].

pub mod error;
pub mod flow;
pub mod msisdn;
pub mod outcome;
pub mod payment;
pub mod state;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{FlowError, TransitionError, ValidationError};
pub use flow::{CheckoutFlow, FlowAction, FlowCatalog};
pub use msisdn::{normalize, Msisdn, MsisdnRules};
pub use outcome::{Outcome, FAILED_REASON};
pub use payment::{PaymentHandle, PaymentId, PaymentStatus};
pub use state::TrackerState;
