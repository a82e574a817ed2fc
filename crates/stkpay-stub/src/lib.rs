// SPDX-License-Identifier: BUSL-1.1
//! In-memory STK push gateway stub.
//!
//! Implements the endpoints that `stkpay-client` calls, with the same
//! envelope inconsistencies the live gateway shows: the generic payments
//! endpoint double-wraps its response and reports success as `COMPLETED`,
//! while subscription product endpoints single-wrap and report `SUCCESS`.
//!
//! Storage is in-memory (DashMap) with no persistence; data is lost on
//! restart.

pub mod routes;
pub mod store;

pub use routes::router;
pub use store::AppState;
