//! # stkpay-cli
//!
//! Operator-facing command-line interface over `stkpay-core` and
//! `stkpay-client`.
//!
//! ## Subcommands
//!
//! - `normalize`: canonicalize a phone number the way the tracker does
//! - `flows`: list the checkout flow catalog
//! - `pay`: initiate a charge and track it to a terminal outcome
//!
//! Handlers return the process exit code; argument parsing lives in
//! `main.rs`.

pub mod flows;
pub mod normalize;
pub mod pay;
