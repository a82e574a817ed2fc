//! # Error Hierarchy
//!
//! Structured error types for the domain primitives, built with `thiserror`.
//! Each variant carries the offending input so that operators can see what
//! was rejected without reproducing the call.

use thiserror::Error;

use crate::state::TrackerState;

/// Domain primitive validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Phone number does not match the market's MSISDN pattern after
    /// normalization.
    #[error("invalid MSISDN '{raw}' (normalized '{normalized}'): expected {expected}")]
    InvalidMsisdn {
        /// Input as supplied by the caller.
        raw: String,
        /// Input after whitespace stripping and trunk-prefix rewriting.
        normalized: String,
        /// Human-readable shape of a valid number.
        expected: String,
    },

    /// Payment identifier is empty or whitespace.
    #[error("payment identifier must not be empty")]
    EmptyPaymentId,
}

/// Rejected tracker state transition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid tracker transition from {from} to {to}")]
pub struct TransitionError {
    /// State the tracker was in.
    pub from: TrackerState,
    /// State that was requested.
    pub to: TrackerState,
}

/// Errors loading or querying a checkout flow catalog.
#[derive(Error, Debug)]
pub enum FlowError {
    /// The catalog document could not be parsed.
    #[error("failed to parse flow catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Two flows share the same name.
    #[error("duplicate flow name '{0}' in catalog")]
    DuplicateName(String),

    /// A flow's initiate path is not an absolute path.
    #[error("flow '{name}' has initiate_path '{path}'; it must start with '/'")]
    RelativePath {
        /// Flow name.
        name: String,
        /// Offending path.
        path: String,
    },

    /// No flow with the requested name exists.
    #[error("unknown flow '{0}'")]
    UnknownFlow(String),
}
